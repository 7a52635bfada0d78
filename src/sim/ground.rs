//! Scrolling ground conveyor
//!
//! Two tiles of equal width leapfrog each other to form an endless strip.
//! Both wrap checks run independently every tick; they are not mutually
//! exclusive, which keeps the strip seamless even after large scroll steps.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Two-tile horizontal conveyor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ground {
    /// Top edge of the strip
    pub y: i32,
    /// Left edges of the two tiles
    pub offsets: [i32; 2],
}

impl Ground {
    pub fn new(y: i32) -> Self {
        Self {
            y,
            offsets: [0, GROUND_TILE_WIDTH],
        }
    }

    /// Scroll left one tick, teleporting any tile whose right edge crossed
    /// the left boundary to sit immediately after the other tile
    pub fn advance(&mut self) {
        self.offsets[0] -= SCROLL_SPEED;
        self.offsets[1] -= SCROLL_SPEED;

        if self.offsets[0] + GROUND_TILE_WIDTH < 0 {
            self.offsets[0] = self.offsets[1] + GROUND_TILE_WIDTH;
        }
        if self.offsets[1] + GROUND_TILE_WIDTH < 0 {
            self.offsets[1] = self.offsets[0] + GROUND_TILE_WIDTH;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tiles_start_adjacent() {
        let ground = Ground::new(GROUND_Y);
        assert_eq!(ground.offsets[1] - ground.offsets[0], GROUND_TILE_WIDTH);
    }

    #[test]
    fn wrap_preserves_adjacency() {
        let mut ground = Ground::new(GROUND_Y);
        // Scroll far enough for several wraps
        for _ in 0..1_000 {
            ground.advance();
            let gap = (ground.offsets[0] - ground.offsets[1]).abs();
            assert_eq!(gap, GROUND_TILE_WIDTH);
        }
    }

    proptest! {
        /// At every tick the strip covers the whole playfield: one tile
        /// starts at or left of the origin and the pair extends past the
        /// right edge.
        #[test]
        fn strip_covers_playfield(ticks in 0usize..20_000) {
            let mut ground = Ground::new(GROUND_Y);
            for _ in 0..ticks {
                ground.advance();
            }
            let left = ground.offsets[0].min(ground.offsets[1]);
            let right = ground.offsets[0].max(ground.offsets[1]) + GROUND_TILE_WIDTH;
            prop_assert!(left <= 0);
            prop_assert!(right >= PLAY_WIDTH);
            prop_assert_eq!(
                (ground.offsets[0] - ground.offsets[1]).abs(),
                GROUND_TILE_WIDTH
            );
        }
    }
}
