//! Decision-function capability
//!
//! The trainer that produces policies is an external collaborator; the sim
//! only depends on `observation -> output`. A policy may keep internal
//! state between ticks. The first output element is compared against
//! `FLAP_THRESHOLD`; anything else a policy returns is ignored.

use rand::Rng;

use crate::consts::*;
use crate::sim::body::Body;
use crate::sim::obstacle::Obstacle;

/// What an agent sees each tick: its own height plus the vertical distances
/// to the leading gap's anchor and bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub y: f32,
    pub gap_distance: f32,
    pub floor_distance: f32,
}

impl Observation {
    pub fn new(body: &Body, leading: &Obstacle) -> Self {
        Self {
            y: body.y,
            gap_distance: (body.y - leading.gap_anchor as f32).abs(),
            floor_distance: (body.y - leading.bottom_y as f32).abs(),
        }
    }

    pub fn as_array(&self) -> [f32; 3] {
        [self.y, self.gap_distance, self.floor_distance]
    }
}

/// External decision function steering one agent
pub trait Policy {
    /// Expected to return at least one finite element; a malformed response
    /// is a reportable fault that culls the agent, not a crash
    fn decide(&mut self, observation: &Observation) -> Vec<f32>;
}

/// Always returns the same activation; handy for tests and baselines
#[derive(Debug, Clone, Copy)]
pub struct ConstantPolicy(pub f32);

impl Policy for ConstantPolicy {
    fn decide(&mut self, _observation: &Observation) -> Vec<f32> {
        vec![self.0]
    }
}

/// Single sigmoid neuron over the normalized observation vector. Serves as
/// a stand-in genome for demo drivers; a real neuro-evolution driver would
/// supply its own `Policy` implementations.
#[derive(Debug, Clone, Copy)]
pub struct LinearPolicy {
    pub weights: [f32; 3],
    pub bias: f32,
}

impl LinearPolicy {
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut weights = [0.0f32; 3];
        for w in &mut weights {
            *w = rng.random_range(-1.0..1.0);
        }
        Self {
            weights,
            bias: rng.random_range(-1.0..1.0),
        }
    }
}

impl Policy for LinearPolicy {
    fn decide(&mut self, observation: &Observation) -> Vec<f32> {
        let inputs = observation.as_array();
        let mut activation = self.bias;
        for (w, v) in self.weights.iter().zip(inputs) {
            activation += w * (v / PLAY_HEIGHT as f32);
        }
        vec![sigmoid(activation)]
    }
}

/// Flaps whenever the body is close to the bottom pipe edge; the built-in
/// pilot for demo play, in lieu of a trained network
#[derive(Debug, Clone, Copy)]
pub struct GapSeekPolicy {
    /// Flap once the bottom edge is nearer than this
    pub margin: f32,
}

impl Default for GapSeekPolicy {
    fn default() -> Self {
        Self {
            margin: GAP_HEIGHT as f32 * 0.4,
        }
    }
}

impl Policy for GapSeekPolicy {
    fn decide(&mut self, observation: &Observation) -> Vec<f32> {
        let activation = if observation.floor_distance < self.margin {
            1.0
        } else {
            0.0
        };
        vec![activation]
    }
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn observation_uses_absolute_distances() {
        let body = Body::new(BODY_LANE_X, 350.0);
        let obstacle = Obstacle::new(SPAWN_X, 400, GAP_HEIGHT);
        let observation = Observation::new(&body, &obstacle);
        assert_eq!(observation.y, 350.0);
        assert_eq!(observation.gap_distance, 50.0);
        assert_eq!(observation.floor_distance, 250.0);
    }

    #[test]
    fn linear_policy_output_is_a_probability() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut policy = LinearPolicy::random(&mut rng);
        let body = Body::new(BODY_LANE_X, 350.0);
        let obstacle = Obstacle::new(SPAWN_X, 300, GAP_HEIGHT);
        let output = policy.decide(&Observation::new(&body, &obstacle));
        assert_eq!(output.len(), 1);
        assert!(output[0] > 0.0 && output[0] < 1.0);
    }

    #[test]
    fn linear_policy_is_deterministic() {
        let mut a = LinearPolicy {
            weights: [0.5, -0.25, 0.1],
            bias: 0.0,
        };
        let mut b = a;
        let body = Body::new(BODY_LANE_X, 200.0);
        let obstacle = Obstacle::new(SPAWN_X, 300, GAP_HEIGHT);
        let observation = Observation::new(&body, &obstacle);
        assert_eq!(a.decide(&observation), b.decide(&observation));
    }

    #[test]
    fn gap_seek_flaps_near_bottom_edge() {
        let mut policy = GapSeekPolicy::default();
        let obstacle = Obstacle::new(SPAWN_X, 300, GAP_HEIGHT);
        // Far above the bottom edge at 500: glide
        let high = Body::new(BODY_LANE_X, 320.0);
        assert!(policy.decide(&Observation::new(&high, &obstacle))[0] <= FLAP_THRESHOLD);
        // Close to the bottom edge: flap
        let low = Body::new(BODY_LANE_X, 470.0);
        assert!(policy.decide(&Observation::new(&low, &obstacle))[0] > FLAP_THRESHOLD);
    }
}
