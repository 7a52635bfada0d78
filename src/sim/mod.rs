//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod body;
pub mod ground;
pub mod mask;
pub mod obstacle;
pub mod session;
pub mod solo;
pub mod sprites;

pub use body::Body;
pub use ground::Ground;
pub use mask::{SpriteMask, collides};
pub use obstacle::{Obstacle, Spawner};
pub use session::{AgentResult, GenerationContext, Session};
pub use solo::{RunPhase, SoloRun, TickInput};
pub use sprites::{FrameId, SpriteSet, frame_index};
