//! Body kinematics and animation state
//!
//! The body never moves horizontally; obstacles and ground scroll past it.
//! Vertical motion is parametric in ticks since the last impulse, and tilt
//! follows displacement. Both only change inside `advance`; the silhouette
//! frame only changes inside `step_animation`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::sprites::{self, FrameId, DIVE_COUNTER, FLAP_CYCLE};

/// The controlled falling/jumping entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Fixed horizontal lane
    pub x: i32,
    /// Vertical position (down is positive)
    pub y: f32,
    /// Visual tilt in degrees, bounded to [MIN_TILT, MAX_TILT]
    pub tilt: f32,
    /// Impulse velocity in effect; zero until the first impulse
    velocity: f32,
    /// Ticks elapsed since the last impulse
    ticks_since_impulse: u32,
    /// Height recorded at the last impulse, anchors the nose-up window
    reference_height: f32,
    /// Flap animation counter
    anim_counter: u32,
}

impl Body {
    pub fn new(x: i32, y: f32) -> Self {
        Self {
            x,
            y,
            tilt: 0.0,
            velocity: 0.0,
            ticks_since_impulse: 0,
            reference_height: y,
            anim_counter: 0,
        }
    }

    /// Kick upward: resets the parametric clock and the reference height.
    /// This is the only way velocity and tilt state reset.
    pub fn impulse(&mut self) {
        self.velocity = IMPULSE_VELOCITY;
        self.ticks_since_impulse = 0;
        self.reference_height = self.y;
    }

    /// Advance one tick of vertical motion; returns the applied displacement.
    ///
    /// The terminal-velocity ceiling applies before the rising trim, and
    /// both are evaluated every tick.
    pub fn advance(&mut self) -> f32 {
        self.ticks_since_impulse += 1;
        let t = self.ticks_since_impulse as f32;

        let mut d = self.velocity * t + 1.5 * t * t;
        if d >= TERMINAL_DISPLACEMENT {
            d = TERMINAL_DISPLACEMENT;
        }
        if d < 0.0 {
            d -= RISE_TRIM;
        }

        self.y += d;

        if d < 0.0 || self.y < self.reference_height + RISE_WINDOW {
            if self.tilt < MAX_TILT {
                self.tilt = MAX_TILT;
            }
        } else if self.tilt > MIN_TILT {
            self.tilt = (self.tilt - TILT_RATE).max(MIN_TILT);
        }

        d
    }

    /// Advance the flap animation one tick. A nose-dive pins the counter at
    /// the level-wing window so the cycle resumes from there.
    pub fn step_animation(&mut self) {
        if self.tilt <= DIVE_TILT {
            self.anim_counter = DIVE_COUNTER;
        } else {
            self.anim_counter = (self.anim_counter + 1) % FLAP_CYCLE;
        }
    }

    /// Current silhouette frame
    pub fn frame(&self) -> FrameId {
        sprites::frame_index(self.anim_counter, self.tilt)
    }

    /// True once the body has left the vertical play bounds [0, ground_y)
    pub fn out_of_bounds(&self, ground_y: i32) -> bool {
        self.y + BODY_HEIGHT as f32 >= ground_y as f32 || self.y < 0.0
    }
}
