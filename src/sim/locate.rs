//! Zone location for a moving sphere
//!
//! A ball near a seam between two rooms overlaps both. The overlap test is
//! deliberately loose (either edge of the sphere inside the interval counts)
//! so that the room being entered is picked up early, and a small table of
//! tie-break rules then chooses the room the ball is travelling toward.

use super::state::Ball;
use super::zone::{Axis, AxisBox, ZoneId, ZoneRegistry};
use crate::Vector3;

/// Disambiguates a ball overlapping two adjacent zones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieBreak {
    /// Chosen when velocity along `axis` is positive
    pub positive: ZoneId,
    /// Chosen when velocity along `axis` is negative
    pub negative: ZoneId,
    pub axis: Axis,
}

impl TieBreak {
    const fn new(positive: ZoneId, negative: ZoneId, axis: Axis) -> Self {
        Self {
            positive,
            negative,
            axis,
        }
    }

    /// Zone selected for velocity `vel`, or None when not moving along the axis
    pub fn pick(&self, vel: Vector3) -> Option<ZoneId> {
        let v = self.axis.of(vel);
        if v > 0.0 {
            Some(self.positive)
        } else if v < 0.0 {
            Some(self.negative)
        } else {
            None
        }
    }
}

/// Applied in order; later rules override earlier ones.
pub const TIE_BREAKS: [TieBreak; 6] = [
    TieBreak::new(1, 2, Axis::Z),
    TieBreak::new(2, 3, Axis::Z),
    TieBreak::new(7, 3, Axis::X),
    TieBreak::new(4, 5, Axis::Z),
    TieBreak::new(5, 6, Axis::Z),
    TieBreak::new(6, 7, Axis::X),
];

/// Where the ball is heading this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    /// All zones the sphere overlaps at its next position, ascending id
    pub overlapping: Vec<ZoneId>,
    /// Zone used as the bounce reference; None when no zone overlaps
    pub active: Option<ZoneId>,
    /// Leading edge has reached an escape face
    pub escaping: bool,
}

impl Location {
    /// LED value for this location (0 = no zone)
    pub fn zone_or_zero(&self) -> ZoneId {
        self.active.unwrap_or(0)
    }
}

/// True if, on every axis, either edge of the sphere lies inside the box.
pub fn sphere_overlaps_box(centre: Vector3, radius: f32, bounds: &AxisBox) -> bool {
    Axis::ALL.iter().all(|&axis| {
        let c = axis.of(centre);
        bounds.spans(axis, c + radius) || bounds.spans(axis, c - radius)
    })
}

/// Locate the ball using its prospective position `pos + vel`.
pub fn locate(zones: &ZoneRegistry, ball: &Ball) -> Location {
    let next = ball.pos + ball.vel;

    let overlapping: Vec<ZoneId> = zones
        .iter()
        .filter(|zone| sphere_overlaps_box(next, ball.radius, &zone.bounds))
        .map(|zone| zone.id)
        .collect();

    // Highest id wins unless a tie-break applies.
    let mut active = overlapping.last().copied();
    for rule in &TIE_BREAKS {
        if overlapping.contains(&rule.positive) && overlapping.contains(&rule.negative) {
            if let Some(id) = rule.pick(ball.vel) {
                active = Some(id);
            }
        }
    }

    Location {
        overlapping,
        active,
        escaping: is_escaping(zones, ball),
    }
}

/// Leading z edge of the next position has reached an escape zone's open front.
pub fn is_escaping(zones: &ZoneRegistry, ball: &Ball) -> bool {
    let lead = ball.pos.z + ball.radius + ball.vel.z;
    zones.escape_zones().any(|zone| lead >= zone.bounds.max.z)
}
