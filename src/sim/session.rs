//! Population session for externally trained agents
//!
//! One session is one generation: every supplied policy steers one body,
//! accumulating fitness until its body fails. The three parallel vectors
//! (bodies, policies, fitness) stay index-aligned at all times; removal
//! marks agents during the scan and compacts all three in a single pass
//! afterward, so multiple failures in one tick can never skip an agent.

use crate::consts::*;
use crate::policy::{Observation, Policy};
use crate::render::{BodyView, Frame, ObstacleView, RenderSink};
use crate::settings::{ConfigError, SimConfig};
use crate::sim::body::Body;
use crate::sim::ground::Ground;
use crate::sim::mask::collides;
use crate::sim::obstacle::{Obstacle, Spawner};
use crate::sim::sprites::SpriteSet;

/// Per-generation state owned by the outer training driver, not ambient
/// process state
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext {
    pub generation: u32,
    /// Seeds the obstacle stream for this generation
    pub seed: u64,
}

/// Feedback returned to the training driver for one agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentResult {
    pub fitness: f32,
    /// Tick at which the agent was removed (or the session ended)
    pub ticks: u64,
}

/// Why an agent left the live set; logged, not returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    Keep,
    Collision,
    OutOfBounds,
    PolicyFault,
}

/// One generation of the multi-agent simulation
pub struct Session<'a> {
    sprites: &'a SpriteSet,
    context: GenerationContext,
    lane_x: i32,
    bodies: Vec<Body>,
    policies: Vec<Box<dyn Policy>>,
    fitness: Vec<f32>,
    /// Index of each live agent in the originally supplied batch
    ids: Vec<usize>,
    results: Vec<Option<AgentResult>>,
    obstacles: Vec<Obstacle>,
    spawner: Spawner,
    ground: Ground,
    score: u32,
    tick: u64,
}

impl<'a> Session<'a> {
    pub fn new(
        config: &SimConfig,
        context: GenerationContext,
        sprites: &'a SpriteSet,
        policies: Vec<Box<dyn Policy>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let population = policies.len();
        let mut spawner = Spawner::new(config, context.seed);
        let first = spawner.spawn(SPAWN_X);
        Ok(Self {
            sprites,
            context,
            lane_x: BODY_LANE_X,
            bodies: vec![Body::new(BODY_LANE_X, BODY_START_Y); population],
            policies,
            fitness: vec![0.0; population],
            ids: (0..population).collect(),
            results: vec![None; population],
            obstacles: vec![first],
            spawner,
            ground: Ground::new(GROUND_Y),
            score: 0,
            tick: 0,
        })
    }

    /// Advance one fixed timestep; returns false once the live set is empty.
    pub fn tick(&mut self, sink: &mut dyn RenderSink) -> bool {
        if self.bodies.is_empty() {
            return false;
        }
        self.tick += 1;

        let leading = self.leading_index();
        let mut removal = vec![Removal::Keep; self.bodies.len()];

        // Move, reward survival, then let each policy steer
        for i in 0..self.bodies.len() {
            self.bodies[i].advance();
            self.bodies[i].step_animation();
            self.fitness[i] += TICK_REWARD;

            let observation = Observation::new(&self.bodies[i], &self.obstacles[leading]);
            let output = self.policies[i].decide(&observation);
            match output.first() {
                Some(v) if v.is_finite() => {
                    if *v > FLAP_THRESHOLD {
                        self.bodies[i].impulse();
                    }
                }
                _ => {
                    log::warn!(
                        "agent {} returned a malformed decision ({} outputs); culling",
                        self.ids[i],
                        output.len()
                    );
                    removal[i] = Removal::PolicyFault;
                }
            }
        }

        // Obstacle scan: collisions first, then the pass transition, then
        // the scroll step, per obstacle
        let mut passed = false;
        for obstacle in &mut self.obstacles {
            for i in 0..self.bodies.len() {
                if removal[i] != Removal::Keep {
                    continue;
                }
                if collides(&self.bodies[i], obstacle, self.sprites) {
                    self.fitness[i] -= COLLISION_PENALTY;
                    removal[i] = Removal::Collision;
                }
            }
            if !obstacle.passed && obstacle.x < self.lane_x {
                obstacle.passed = true;
                passed = true;
            }
            obstacle.advance();
        }

        // Pass bonus goes to every agent still live at this point in the
        // tick; agents doomed above are already excluded
        if passed {
            self.score += 1;
            for i in 0..self.bodies.len() {
                if removal[i] == Removal::Keep {
                    self.fitness[i] += PASS_BONUS;
                }
            }
            let next = self.spawner.spawn(SPAWN_X);
            self.obstacles.push(next);
        }
        self.obstacles.retain(|o| !o.off_screen());

        // Bounds exits carry no penalty
        for i in 0..self.bodies.len() {
            if removal[i] == Removal::Keep && self.bodies[i].out_of_bounds(self.ground.y) {
                removal[i] = Removal::OutOfBounds;
            }
        }

        self.compact(&removal);
        self.ground.advance();
        self.emit_frame(sink);

        !self.bodies.is_empty()
    }

    /// Run until the live set is empty; callers enforcing a generation time
    /// cap should drive `tick` themselves and call `into_results`.
    pub fn run(mut self, sink: &mut dyn RenderSink) -> Vec<AgentResult> {
        while self.tick(sink) {}
        self.into_results()
    }

    /// Final fitness per agent, in the order the policies were supplied.
    /// Agents still live are scored with their current accumulator.
    pub fn into_results(self) -> Vec<AgentResult> {
        let mut results = self.results;
        for (slot, fitness) in self.ids.into_iter().zip(self.fitness) {
            results[slot] = Some(AgentResult {
                fitness,
                ticks: self.tick,
            });
        }
        results
            .into_iter()
            .map(|r| r.unwrap_or(AgentResult {
                fitness: 0.0,
                ticks: 0,
            }))
            .collect()
    }

    /// Remove every marked agent from all three parallel vectors in one
    /// pass, recording its result slot
    fn compact(&mut self, removal: &[Removal]) {
        let mut write = 0;
        for read in 0..removal.len() {
            if removal[read] == Removal::Keep {
                if write != read {
                    self.bodies.swap(write, read);
                    self.policies.swap(write, read);
                    self.fitness.swap(write, read);
                    self.ids.swap(write, read);
                }
                write += 1;
            } else {
                log::debug!(
                    "agent {} removed at tick {} ({:?}, fitness {:.1})",
                    self.ids[read],
                    self.tick,
                    removal[read],
                    self.fitness[read]
                );
                self.results[self.ids[read]] = Some(AgentResult {
                    fitness: self.fitness[read],
                    ticks: self.tick,
                });
            }
        }
        self.bodies.truncate(write);
        self.policies.truncate(write);
        self.fitness.truncate(write);
        self.ids.truncate(write);
    }

    /// The obstacle agents are steering toward: the first one, or the
    /// second once the lane has cleared the first one's right edge
    fn leading_index(&self) -> usize {
        if self.obstacles.len() > 1 && self.lane_x > self.obstacles[0].right_edge() {
            1
        } else {
            0
        }
    }

    fn emit_frame(&self, sink: &mut dyn RenderSink) {
        let bodies: Vec<BodyView> = self
            .bodies
            .iter()
            .map(|b| BodyView {
                x: b.x,
                y: b.y,
                tilt: b.tilt,
                frame: b.frame(),
            })
            .collect();
        let obstacles: Vec<ObstacleView> = self
            .obstacles
            .iter()
            .map(|o| ObstacleView {
                x: o.x,
                top_y: o.top_y,
                bottom_y: o.bottom_y,
            })
            .collect();
        sink.frame(&Frame {
            tick: self.tick,
            score: self.score,
            generation: self.context.generation,
            bodies: &bodies,
            obstacles: &obstacles,
            ground_y: self.ground.y,
            ground_offsets: self.ground.offsets,
        });
    }

    pub fn live_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn generation(&self) -> u32 {
        self.context.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ConstantPolicy;
    use crate::render::NullSink;

    fn never_flap(population: usize) -> Vec<Box<dyn Policy>> {
        (0..population)
            .map(|_| Box::new(ConstantPolicy(0.0)) as Box<dyn Policy>)
            .collect()
    }

    fn context(seed: u64) -> GenerationContext {
        GenerationContext {
            generation: 1,
            seed,
        }
    }

    fn new_session<'a>(
        sprites: &'a SpriteSet,
        policies: Vec<Box<dyn Policy>>,
    ) -> Session<'a> {
        Session::new(&SimConfig::default(), context(7), sprites, policies).unwrap()
    }

    #[test]
    fn parallel_vectors_stay_aligned() {
        let sprites = SpriteSet::builtin();
        let mut session = new_session(&sprites, never_flap(5));
        while session.tick(&mut NullSink) {
            assert_eq!(session.bodies.len(), session.policies.len());
            assert_eq!(session.bodies.len(), session.fitness.len());
            assert_eq!(session.bodies.len(), session.ids.len());
        }
        assert_eq!(session.live_count(), 0);
    }

    #[test]
    fn never_flap_agents_all_ground_out_at_tick_23() {
        let sprites = SpriteSet::builtin();
        let session = new_session(&sprites, never_flap(3));
        let results = session.run(&mut NullSink);
        assert_eq!(results.len(), 3);
        for result in results {
            assert_eq!(result.ticks, 23);
            // 23 survival rewards, no collision penalty: no obstacle gets
            // near the lane in 23 ticks
            assert!((result.fitness - 2.3).abs() < 1e-4);
        }
    }

    #[test]
    fn pass_bonus_goes_to_survivors_only() {
        let sprites = SpriteSet::builtin();
        let mut session = new_session(&sprites, never_flap(3));
        // Park the obstacle one unit past the lane so this tick marks it
        // passed; agent 0 sits inside the bottom pipe and collides first
        session.obstacles[0] = Obstacle::new(BODY_LANE_X - 1, 100, GAP_HEIGHT);
        session.bodies[1].y = 150.0;
        session.bodies[2].y = 150.0;
        session.tick(&mut NullSink);

        assert_eq!(session.score(), 1);
        assert_eq!(session.live_count(), 2);
        // Survivors: 0.1 survival + 5 bonus
        for fitness in &session.fitness {
            assert!((fitness - 5.1).abs() < 1e-4);
        }
        // The collided agent got the penalty and no bonus
        let fallen = session.results[0].unwrap();
        assert!((fallen.fitness - (0.1 - 1.0)).abs() < 1e-4);
        assert_eq!(fallen.ticks, 1);
    }

    #[test]
    fn pass_bonus_is_granted_once_per_obstacle() {
        let sprites = SpriteSet::builtin();
        let mut session = new_session(&sprites, never_flap(1));
        session.obstacles[0] = Obstacle::new(BODY_LANE_X - 1, 100, GAP_HEIGHT);
        // Keep the agent clear of both pipes: gap spans 100..300
        session.bodies[0].y = 180.0;
        session.tick(&mut NullSink);
        let after_first = session.fitness[0];
        assert_eq!(session.score(), 1);
        session.tick(&mut NullSink);
        // Second tick: survival reward only, no repeat bonus
        assert!((session.fitness[0] - after_first - TICK_REWARD).abs() < 1e-4);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn malformed_policy_culls_that_agent_alone() {
        struct Broken;
        impl Policy for Broken {
            fn decide(&mut self, _observation: &Observation) -> Vec<f32> {
                Vec::new()
            }
        }

        let sprites = SpriteSet::builtin();
        let policies: Vec<Box<dyn Policy>> = vec![
            Box::new(ConstantPolicy(0.0)),
            Box::new(Broken),
            Box::new(ConstantPolicy(f32::NAN)),
        ];
        let mut session = new_session(&sprites, policies);
        session.tick(&mut NullSink);
        assert_eq!(session.live_count(), 1);
        // Faulted agents keep their survival reward, no penalty
        let faulted = session.results[1].unwrap();
        assert!((faulted.fitness - TICK_REWARD).abs() < 1e-4);
        assert_eq!(session.results[2].unwrap().ticks, 1);
        assert!(session.results[0].is_none());
    }

    #[test]
    fn multiple_removals_in_one_tick_skip_nobody() {
        let sprites = SpriteSet::builtin();
        let mut session = new_session(&sprites, never_flap(4));
        // Agents 0 and 2 inside the bottom pipe, 1 and 3 safe in the gap
        session.obstacles[0] = Obstacle::new(BODY_LANE_X, 100, GAP_HEIGHT);
        session.bodies[1].y = 150.0;
        session.bodies[3].y = 150.0;
        session.tick(&mut NullSink);
        assert_eq!(session.live_count(), 2);
        assert_eq!(session.ids, vec![1, 3]);
        assert!(session.results[0].is_some());
        assert!(session.results[2].is_some());
    }

    #[test]
    fn results_arrive_in_supplied_order() {
        let sprites = SpriteSet::builtin();
        let session = new_session(&sprites, never_flap(3));
        let results = session.run(&mut NullSink);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn same_seed_same_outcome() {
        let sprites = SpriteSet::builtin();
        let run = |seed: u64| {
            let policies: Vec<Box<dyn Policy>> = (0..4)
                .map(|i| Box::new(ConstantPolicy(if i % 2 == 0 { 0.9 } else { 0.0 })) as _)
                .collect();
            let session =
                Session::new(&SimConfig::default(), context(seed), &sprites, policies).unwrap();
            session.run(&mut NullSink)
        };
        let a = run(42);
        let b = run(42);
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_invalid_config() {
        let sprites = SpriteSet::builtin();
        let config = SimConfig {
            gap_anchor_min: 500,
            gap_anchor_max: 100,
            ..Default::default()
        };
        let result = Session::new(&config, context(1), &sprites, never_flap(1));
        assert!(result.is_err());
    }
}
