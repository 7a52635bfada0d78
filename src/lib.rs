//! Wingbeat - a side-scrolling flap game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, obstacles, pixel collision, sessions)
//! - `policy`: Decision-function capability for externally trained agents
//! - `render`: Render sink collaborator contract
//! - `settings`: Data-driven simulation configuration

pub mod policy;
pub mod render;
pub mod settings;
pub mod sim;

pub use policy::{Observation, Policy};
pub use settings::{CollisionPolicy, ConfigError, SimConfig};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (30 ticks per second)
    pub const TICK_HZ: u32 = 30;

    /// Playfield dimensions
    pub const PLAY_WIDTH: i32 = 500;
    pub const PLAY_HEIGHT: i32 = 800;
    /// Top edge of the ground strip; vertical play bounds are [0, GROUND_Y)
    pub const GROUND_Y: i32 = 730;

    /// Body defaults - the lane x never changes, the world scrolls instead
    pub const BODY_LANE_X: i32 = 230;
    pub const BODY_START_Y: f32 = 350.0;
    pub const BODY_WIDTH: i32 = 68;
    pub const BODY_HEIGHT: i32 = 48;

    /// Vertical velocity applied by an impulse (units per tick, negative = up)
    pub const IMPULSE_VELOCITY: f32 = -10.5;
    /// Terminal downward displacement per tick
    pub const TERMINAL_DISPLACEMENT: f32 = 16.0;
    /// Extra upward displacement applied while still rising
    pub const RISE_TRIM: f32 = 2.0;
    /// Height window above the last impulse point that keeps the nose up
    pub const RISE_WINDOW: f32 = 50.0;

    /// Tilt bounds (degrees) and angular speed (degrees per tick)
    pub const MAX_TILT: f32 = 25.0;
    pub const MIN_TILT: f32 = -90.0;
    pub const TILT_RATE: f32 = 20.0;
    /// At or below this tilt the wings stop flapping (mid frame forced)
    pub const DIVE_TILT: f32 = -80.0;

    /// Horizontal scroll speed shared by obstacles and ground (units per tick)
    pub const SCROLL_SPEED: i32 = 5;

    /// Obstacle geometry
    pub const GAP_HEIGHT: i32 = 200;
    pub const GAP_ANCHOR_MIN: i32 = 50;
    /// Exclusive upper bound of the gap anchor range
    pub const GAP_ANCHOR_MAX: i32 = 450;
    /// New obstacles spawn this far from the play origin
    pub const SPAWN_X: i32 = 600;
    pub const PIPE_WIDTH: i32 = 104;
    pub const PIPE_HEIGHT: i32 = 640;

    /// Ground tile width (two tiles form the conveyor)
    pub const GROUND_TILE_WIDTH: i32 = 672;

    /// Ticks per flap animation frame step
    pub const FLAP_INTERVAL: u32 = 5;

    /// Population session rewards
    pub const TICK_REWARD: f32 = 0.1;
    pub const PASS_BONUS: f32 = 5.0;
    pub const COLLISION_PENALTY: f32 = 1.0;
    /// Policy output above this requests an impulse
    pub const FLAP_THRESHOLD: f32 = 0.5;
}
