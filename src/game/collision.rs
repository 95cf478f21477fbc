//! Collision detection between the bird and the play area.
//!
//! The bird is drawn as an ellipse but collides as its `BIRD_SIZE` square
//! bounding box. Pipes are axis-aligned rectangles.

use super::types::{Bird, Pipe};
use crate::core::constants::*;

/// Bird touches the ceiling or the top of the ground strip.
pub fn hits_bounds(bird: &Bird) -> bool {
    bird.bottom() >= GROUND_LINE || bird.top() <= 0.0
}

/// Bird overlaps the solid part of one pipe pair.
pub fn hits_pipe(bird: &Bird, pipe: &Pipe) -> bool {
    let overlaps_horizontally = bird.right() > pipe.x && bird.left() < pipe.right();
    if !overlaps_horizontally {
        return false;
    }
    bird.top() < pipe.gap_top || bird.bottom() > pipe.gap_bottom()
}

/// Check the bird against bounds and every pipe.
pub fn check_collision(bird: &Bird, pipes: &[Pipe]) -> bool {
    hits_bounds(bird) || pipes.iter().any(|pipe| hits_pipe(bird, pipe))
}
