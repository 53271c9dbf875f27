//! Square paddle guarding an escape face

use serde::{Deserialize, Serialize};

use super::zone::AxisBox;
use crate::Vector3;

/// A flat square paddle that slides in its x/y plane.
///
/// The z extent is fixed at its rest position and only the thickness
/// (one fifth of the half size) changes when the paddle is resized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Back face centre at zero offset
    rest: Vector3,
    /// Current centre
    pub centre: Vector3,
    /// Half the edge length
    pub half_size: f32,
    /// Only the active paddle can catch the ball
    pub active: bool,
    bounds: AxisBox,
}

impl Paddle {
    pub fn new(rest: Vector3, half_size: f32) -> Self {
        let mut paddle = Self {
            rest,
            centre: rest,
            half_size,
            active: false,
            bounds: AxisBox::around(rest, Vector3::ONE),
        };
        paddle.move_to(0.0, 0.0);
        paddle
    }

    #[inline]
    pub fn thickness(&self) -> f32 {
        self.half_size / 5.0
    }

    /// Place the centre at the rest position plus an x/y offset
    pub fn move_to(&mut self, offset_x: f32, offset_y: f32) {
        self.centre = Vector3::new(
            self.rest.x + offset_x,
            self.rest.y + offset_y,
            self.rest.z + self.thickness() / 2.0,
        );
        self.update_bounds();
    }

    pub fn resize(&mut self, half_size: f32) {
        self.half_size = half_size;
        self.centre.z = self.rest.z + self.thickness() / 2.0;
        self.update_bounds();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn bounds(&self) -> &AxisBox {
        &self.bounds
    }

    /// True when the point's x and y lie on the paddle face
    pub fn contains(&self, point: Vector3) -> bool {
        point.x >= self.bounds.min.x
            && point.x <= self.bounds.max.x
            && point.y >= self.bounds.min.y
            && point.y <= self.bounds.max.y
    }

    fn update_bounds(&mut self) {
        let h = self.half_size;
        self.bounds = AxisBox::new(
            Vector3::new(self.centre.x - h, self.centre.y - h, self.rest.z),
            Vector3::new(self.centre.x + h, self.centre.y + h, self.rest.z + self.thickness()),
        );
    }
}
