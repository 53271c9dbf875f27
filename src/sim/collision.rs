//! Wall bounces and paddle catches
//!
//! Walls are the faces of the active zone's box. Each axis is tested on its
//! own, so a corner hit reflects two or three components in the same tick.

use serde::{Deserialize, Serialize};

use super::paddle::Paddle;
use super::state::Ball;
use super::zone::{Axis, AxisBox};
use crate::Vector3;

/// Which velocity components were reflected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reflection {
    flipped: [bool; 3],
}

impl Reflection {
    /// At least one axis bounced
    pub fn any(&self) -> bool {
        self.flipped.iter().any(|f| *f)
    }

    pub fn on(&self, axis: Axis) -> bool {
        self.flipped[axis as usize]
    }
}

/// Result of the ball reaching an escape face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchOutcome {
    /// Active paddle was in place; carries the hit count after this catch
    Hit(u32),
    /// Ball got past the paddle
    Miss,
}

/// Reflect velocity components of a ball touching the walls of `bounds`.
///
/// A component is only reversed when the ball is moving into the wall, so
/// a ball already heading back inside is left alone.
pub fn resolve_bounce(bounds: &AxisBox, ball: &mut Ball) -> Reflection {
    let mut reflection = Reflection::default();

    for axis in Axis::ALL {
        let p = axis.of(ball.pos);
        let v = axis.of(ball.vel);
        let into_min = bounds.min_on(axis) + ball.radius >= p && v < 0.0;
        let into_max = p >= bounds.max_on(axis) - ball.radius && v > 0.0;

        if into_min || into_max {
            let component = axis.of_mut(&mut ball.vel);
            *component = -*component;
            reflection.flipped[axis as usize] = true;
        }
    }

    reflection
}

/// True when the active paddle covers the ball's x/y position
pub fn paddle_catches(paddle: &Paddle, ball_pos: Vector3) -> bool {
    paddle.active && paddle.contains(ball_pos)
}
