//! Built-in sprite silhouettes and the flap animation function
//!
//! Asset loading is an external concern; the sim only needs opaque
//! footprints. The built-in masks are procedural stand-ins matching the
//! footprint dimensions of the classic 2x-scaled art: three 68x48 body
//! frames and a 104x640 pipe. A render sink is free to draw richer art for
//! the same frame ids.

use crate::consts::*;
use crate::sim::mask::SpriteMask;

/// Index into the body frame set (0 = wings up, 1 = level, 2 = down)
pub type FrameId = usize;

/// Number of distinct body frames
pub const BODY_FRAME_COUNT: usize = 3;

/// Pure mapping from animation counter and tilt to the current frame.
///
/// The counter steps through up/level/down/level, one frame per
/// `FLAP_INTERVAL` ticks. A nose-dive (tilt at or below `DIVE_TILT`) holds
/// the wings level. Collision and rendering both call this, so the
/// silhouette never depends on draw order.
pub fn frame_index(anim_counter: u32, tilt: f32) -> FrameId {
    if tilt <= DIVE_TILT {
        return 1;
    }
    match (anim_counter / FLAP_INTERVAL) % 4 {
        0 => 0,
        1 => 1,
        2 => 2,
        _ => 1,
    }
}

/// Animation counter length of one full flap cycle
pub const FLAP_CYCLE: u32 = 4 * FLAP_INTERVAL;

/// Counter value that pins the animation at the start of the level-wing
/// window, used when a dive interrupts the flap cycle
pub const DIVE_COUNTER: u32 = 2 * FLAP_INTERVAL;

/// Shared silhouettes, built once per process and passed into sessions
#[derive(Debug, Clone)]
pub struct SpriteSet {
    body_frames: [SpriteMask; BODY_FRAME_COUNT],
    pipe: SpriteMask,
}

impl SpriteSet {
    /// Procedural silhouettes: an elliptical torso with a wing lobe whose
    /// vertical position differs per frame, and a solid pipe rectangle.
    pub fn builtin() -> Self {
        let body_frames = [body_frame(-10), body_frame(0), body_frame(10)];
        Self {
            body_frames,
            pipe: SpriteMask::filled(PIPE_WIDTH, PIPE_HEIGHT),
        }
    }

    /// Custom silhouettes (e.g. masks derived from real art)
    pub fn new(body_frames: [SpriteMask; BODY_FRAME_COUNT], pipe: SpriteMask) -> Self {
        Self { body_frames, pipe }
    }

    pub fn body_frame(&self, frame: FrameId) -> &SpriteMask {
        &self.body_frames[frame.min(BODY_FRAME_COUNT - 1)]
    }

    pub fn pipe(&self) -> &SpriteMask {
        &self.pipe
    }
}

/// One 68x48 body frame; `wing_drop` shifts the wing lobe down (positive)
/// or up (negative) relative to the torso midline.
fn body_frame(wing_drop: i32) -> SpriteMask {
    let (cx, cy) = (BODY_WIDTH as f32 / 2.0, BODY_HEIGHT as f32 / 2.0);
    SpriteMask::from_fn(BODY_WIDTH, BODY_HEIGHT, move |x, y| {
        let torso = ellipse(x as f32, y as f32, cx, cy, 30.0, 16.0);
        let wing = ellipse(
            x as f32,
            (y - wing_drop) as f32,
            cx - 12.0,
            cy,
            12.0,
            7.0,
        );
        torso || wing
    })
}

#[inline]
fn ellipse(x: f32, y: f32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    let dx = (x - cx) / rx;
    let dy = (y - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_cycle_is_up_level_down_level() {
        let frames: Vec<FrameId> = (0..FLAP_CYCLE).map(|t| frame_index(t, 0.0)).collect();
        for (t, frame) in frames.iter().enumerate() {
            let expected = match (t as u32 / FLAP_INTERVAL) % 4 {
                0 => 0,
                1 => 1,
                2 => 2,
                _ => 1,
            };
            assert_eq!(*frame, expected, "tick {t}");
        }
        // Cycle wraps
        assert_eq!(frame_index(FLAP_CYCLE, 0.0), frame_index(0, 0.0));
    }

    #[test]
    fn dive_forces_level_wings() {
        assert_eq!(frame_index(0, -80.0), 1);
        assert_eq!(frame_index(12, -90.0), 1);
        // Just above the dive threshold the cycle is unaffected
        assert_eq!(frame_index(0, -79.0), 0);
    }

    #[test]
    fn builtin_masks_have_expected_dimensions() {
        let sprites = SpriteSet::builtin();
        for frame in 0..BODY_FRAME_COUNT {
            let mask = sprites.body_frame(frame);
            assert_eq!(mask.width(), BODY_WIDTH);
            assert_eq!(mask.height(), BODY_HEIGHT);
            assert!(mask.solid_pixels() > 0);
        }
        assert_eq!(sprites.pipe().width(), PIPE_WIDTH);
        assert_eq!(sprites.pipe().height(), PIPE_HEIGHT);
    }

    #[test]
    fn frames_have_distinct_footprints() {
        let sprites = SpriteSet::builtin();
        assert_ne!(sprites.body_frame(0), sprites.body_frame(2));
    }
}
