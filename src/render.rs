//! Render sink collaborator contract
//!
//! The loops push one frame description per tick; sinks draw it however
//! they like. Draw calls are synchronous and assumed to always succeed, so
//! the trait is infallible. Headless runs use `NullSink` or `LogSink`.

use crate::sim::sprites::FrameId;

/// One body to draw
#[derive(Debug, Clone, Copy)]
pub struct BodyView {
    pub x: i32,
    pub y: f32,
    pub tilt: f32,
    pub frame: FrameId,
}

/// One obstacle pair to draw
#[derive(Debug, Clone, Copy)]
pub struct ObstacleView {
    pub x: i32,
    pub top_y: i32,
    pub bottom_y: i32,
}

/// Everything a sink needs to draw one tick
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub tick: u64,
    pub score: u32,
    /// Zero in solo runs
    pub generation: u32,
    pub bodies: &'a [BodyView],
    pub obstacles: &'a [ObstacleView],
    pub ground_y: i32,
    pub ground_offsets: [i32; 2],
}

/// Accepts draw calls for background, obstacles, ground, bodies and the
/// score/generation overlay
pub trait RenderSink {
    fn frame(&mut self, frame: &Frame<'_>);
}

/// Discards every frame
pub struct NullSink;

impl RenderSink for NullSink {
    fn frame(&mut self, _frame: &Frame<'_>) {}
}

/// Logs a one-line summary at a fixed tick cadence; stands in for a real
/// renderer during headless runs
pub struct LogSink {
    every: u64,
}

impl LogSink {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl RenderSink for LogSink {
    fn frame(&mut self, frame: &Frame<'_>) {
        if frame.tick % self.every == 0 {
            log::debug!(
                "gen {} tick {} score {} alive {}",
                frame.generation,
                frame.tick,
                frame.score,
                frame.bodies.len()
            );
        }
    }
}
