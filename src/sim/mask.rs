//! Pixel-mask silhouettes and exact overlap testing
//!
//! Collision fidelity comes from the actual opaque footprint of the current
//! animation frame, not a bounding box. A mask stores one bit per pixel; the
//! overlap test walks only the intersection rectangle of the two masks at a
//! given relative offset.

use glam::IVec2;

use crate::consts::*;
use crate::sim::body::Body;
use crate::sim::obstacle::Obstacle;
use crate::sim::sprites::SpriteSet;

/// The opaque-pixel footprint of a sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteMask {
    width: i32,
    height: i32,
    bits: Vec<bool>,
}

impl SpriteMask {
    /// Build a mask by sampling a predicate over every pixel
    pub fn from_fn(width: i32, height: i32, opaque: impl Fn(i32, i32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Build a mask from rows of `'#'` (opaque) and `'.'` (transparent)
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as i32;
        let mut bits = Vec::with_capacity((width * height) as usize);
        for row in rows {
            for ch in row.chars() {
                bits.push(ch == '#');
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Fully opaque rectangle
    pub fn filled(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether the pixel at (x, y) is opaque; out-of-bounds reads are transparent
    #[inline]
    pub fn opaque(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    /// Count of opaque pixels
    pub fn solid_pixels(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// True if any opaque pixel of `self` coincides with an opaque pixel of
    /// `other` when `other`'s origin sits at `offset` relative to `self`'s.
    pub fn overlaps(&self, other: &SpriteMask, offset: IVec2) -> bool {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width).min(self.width);
        let y1 = (offset.y + other.height).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                if self.opaque(x, y) && other.opaque(x - offset.x, y - offset.y) {
                    return true;
                }
            }
        }
        false
    }
}

/// Exact collision test between a body and an obstacle's two silhouettes.
///
/// The body mask is the one for the current animation frame; each pipe mask
/// is tested at the offset between the two sprite origins. Either overlap
/// counts as a collision.
pub fn collides(body: &Body, obstacle: &Obstacle, sprites: &SpriteSet) -> bool {
    let mask = sprites.body_frame(body.frame());
    let dx = obstacle.x - body.x;
    let body_y = body.y.round() as i32;
    let top = IVec2::new(dx, obstacle.top_y - body_y);
    let bottom = IVec2::new(dx, obstacle.bottom_y - body_y);
    mask.overlaps(sprites.pipe(), top) || mask.overlaps(sprites.pipe(), bottom)
}
