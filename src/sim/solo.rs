//! Single-agent simulation loop
//!
//! A per-tick state machine over {Running, Terminated}. The caller owns
//! pacing and input polling; this type owns every entity. Obstacle and
//! bounds contact follow the configured `CollisionPolicy`: `Observe` keeps
//! the run alive and only records the contact, `EndRun` terminates.

use crate::consts::*;
use crate::render::{BodyView, Frame, ObstacleView, RenderSink};
use crate::settings::{CollisionPolicy, ConfigError, SimConfig};
use crate::sim::body::Body;
use crate::sim::ground::Ground;
use crate::sim::mask::collides;
use crate::sim::obstacle::{Obstacle, Spawner};
use crate::sim::sprites::SpriteSet;

/// Input sampled once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Impulse request
    pub flap: bool,
    /// External quit signal; always terminates
    pub quit: bool,
}

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Terminated,
}

/// One manual-play run
pub struct SoloRun<'a> {
    config: SimConfig,
    sprites: &'a SpriteSet,
    body: Body,
    obstacles: Vec<Obstacle>,
    spawner: Spawner,
    ground: Ground,
    score: u32,
    tick: u64,
    phase: RunPhase,
    collision_observed: bool,
}

impl<'a> SoloRun<'a> {
    pub fn new(config: SimConfig, seed: u64, sprites: &'a SpriteSet) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut spawner = Spawner::new(&config, seed);
        let first = spawner.spawn(SPAWN_X);
        Ok(Self {
            config,
            sprites,
            body: Body::new(BODY_LANE_X, BODY_START_Y),
            obstacles: vec![first],
            spawner,
            ground: Ground::new(GROUND_Y),
            score: 0,
            tick: 0,
            phase: RunPhase::Running,
            collision_observed: false,
        })
    }

    /// Advance one fixed timestep
    pub fn tick(&mut self, input: &TickInput, sink: &mut dyn RenderSink) {
        if input.quit {
            self.phase = RunPhase::Terminated;
            return;
        }
        if self.phase == RunPhase::Terminated {
            return;
        }
        self.tick += 1;

        if input.flap {
            self.body.impulse();
        }
        self.body.advance();
        self.body.step_animation();

        let mut passed = false;
        let mut hit = false;
        for obstacle in &mut self.obstacles {
            if collides(&self.body, obstacle, self.sprites) {
                hit = true;
            }
            if !obstacle.passed && obstacle.x < self.body.x {
                obstacle.passed = true;
                passed = true;
            }
            obstacle.advance();
        }

        if hit {
            self.collision_observed = true;
            log::debug!("obstacle contact at tick {}", self.tick);
        }
        let out_of_bounds = self.body.out_of_bounds(self.ground.y);
        if (hit || out_of_bounds) && self.config.collision_policy == CollisionPolicy::EndRun {
            self.phase = RunPhase::Terminated;
            return;
        }

        if passed {
            self.score += 1;
            let next = self.spawner.spawn(SPAWN_X);
            self.obstacles.push(next);
        }
        self.obstacles.retain(|o| !o.off_screen());

        self.ground.advance();
        self.emit_frame(sink);
    }

    fn emit_frame(&self, sink: &mut dyn RenderSink) {
        let bodies = [BodyView {
            x: self.body.x,
            y: self.body.y,
            tilt: self.body.tilt,
            frame: self.body.frame(),
        }];
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
            generation: 0,
            bodies: &bodies,
            obstacles: &obstacles,
            ground_y: self.ground.y,
            ground_offsets: self.ground.offsets,
        });
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// The obstacle the body must clear next: the first one, or the second
    /// once the lane has cleared the first one's right edge
    pub fn leading(&self) -> &Obstacle {
        let index = if self.obstacles.len() > 1 && self.body.x > self.obstacles[0].right_edge() {
            1
        } else {
            0
        };
        &self.obstacles[index]
    }

    /// Whether any obstacle contact has been recorded this run
    pub fn collision_observed(&self) -> bool {
        self.collision_observed
    }
}
