//! Zone geometry and the fixed seven-room topology
//!
//! Rooms are axis-aligned cubes laid out in a U around the player:
//! ```text
//!   z-   3 - 7 - 6
//!        |       |
//!        2       5
//!        |       |
//!   z+   1       4     <- open towards the player (escape faces)
//! ```
//! Each cube has walls on some faces and openings on the rest. The playable
//! bounds of a zone are the cube minus half a wall thickness on walled faces.

use serde::{Deserialize, Serialize};

use crate::Vector3;
use crate::consts::WALL_THICKNESS_RATIO;

/// Zone identifier (1..=7); 0 is reserved for "no zone"
pub type ZoneId = u8;

/// Zones with an opening toward the player
pub const ESCAPE_ZONES: [ZoneId; 2] = [1, 4];

/// Adjacent zone pairs sharing an open face
pub const LINKS: [(ZoneId, ZoneId); 6] = [(1, 2), (2, 3), (3, 7), (7, 6), (6, 5), (5, 4)];

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component of `v` along this axis
    #[inline]
    pub fn of(&self, v: Vector3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Mutable component of `v` along this axis
    #[inline]
    pub fn of_mut<'a>(&self, v: &'a mut Vector3) -> &'a mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
            Axis::Z => &mut v.z,
        }
    }
}

/// A cube face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    /// -x
    Left,
    /// +x
    Right,
    /// -y
    Bottom,
    /// +y
    Top,
    /// -z
    Back,
    /// +z (toward the player)
    Front,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Left,
        Face::Right,
        Face::Bottom,
        Face::Top,
        Face::Back,
        Face::Front,
    ];

    pub fn axis(&self) -> Axis {
        match self {
            Face::Left | Face::Right => Axis::X,
            Face::Bottom | Face::Top => Axis::Y,
            Face::Back | Face::Front => Axis::Z,
        }
    }

    /// True for the face on the positive side of its axis
    pub fn is_positive(&self) -> bool {
        matches!(self, Face::Right | Face::Top | Face::Front)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Set of cube faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaceSet {
    faces: [bool; 6],
}

impl FaceSet {
    pub fn of(faces: &[Face]) -> Self {
        let mut set = Self::default();
        for face in faces {
            set.faces[face.index()] = true;
        }
        set
    }

    #[inline]
    pub fn contains(&self, face: Face) -> bool {
        self.faces[face.index()]
    }

    /// Faces not in this set
    pub fn complement(&self) -> Self {
        Self {
            faces: self.faces.map(|present| !present),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Face> + '_ {
        Face::ALL.into_iter().filter(|face| self.contains(*face))
    }
}

/// Axis-aligned box `[x_min, x_max] x [y_min, y_max] x [z_min, z_max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl AxisBox {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        debug_assert!(min.x < max.x && min.y < max.y && min.z < max.z, "degenerate box");
        Self { min, max }
    }

    /// Box spanning `centre ± half` on every axis
    pub fn around(centre: Vector3, half: Vector3) -> Self {
        Self::new(centre - half, centre + half)
    }

    #[inline]
    pub fn min_on(&self, axis: Axis) -> f32 {
        axis.of(self.min)
    }

    #[inline]
    pub fn max_on(&self, axis: Axis) -> f32 {
        axis.of(self.max)
    }

    /// Inclusive interval test on one axis
    #[inline]
    pub fn spans(&self, axis: Axis, value: f32) -> bool {
        self.min_on(axis) <= value && value <= self.max_on(axis)
    }

    /// `[x_min, x_max, y_min, y_max, z_min, z_max]`
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z,
        ]
    }
}

/// One room of the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub centre: Vector3,
    pub size: f32,
    /// Faces without a wall
    pub open: FaceSet,
    /// Playable interior
    pub bounds: AxisBox,
}

impl Zone {
    pub fn new(id: ZoneId, centre: Vector3, size: f32, open: FaceSet) -> Self {
        let inset = size * WALL_THICKNESS_RATIO / 2.0;
        let half = size / 2.0;

        let mut min = centre - Vector3::splat(half);
        let mut max = centre + Vector3::splat(half);
        for face in open.complement().iter() {
            if face.is_positive() {
                *face.axis().of_mut(&mut max) -= inset;
            } else {
                *face.axis().of_mut(&mut min) += inset;
            }
        }

        Self {
            id,
            centre,
            size,
            open,
            bounds: AxisBox::new(min, max),
        }
    }

    pub fn is_escape_zone(&self) -> bool {
        ESCAPE_ZONES.contains(&self.id)
    }
}

/// The immutable set of zones making up the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRegistry {
    zone_size: f32,
    /// Sorted by id
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    /// Build the seven-room layout for cubes of edge `zone_size`
    pub fn standard(zone_size: f32) -> Self {
        use Face::*;

        let s = zone_size;
        let layout: [(ZoneId, Vector3, &[Face]); 7] = [
            (1, Vector3::new(-s, 0.0, s), &[Back, Front]),
            (2, Vector3::new(-s, 0.0, 0.0), &[Back, Front]),
            (3, Vector3::new(-s, 0.0, -s), &[Right, Front]),
            (4, Vector3::new(s, 0.0, s), &[Back, Front]),
            (5, Vector3::new(s, 0.0, 0.0), &[Back, Front]),
            (6, Vector3::new(s, 0.0, -s), &[Left, Front]),
            (7, Vector3::new(0.0, 0.0, -s), &[Left, Right]),
        ];

        let zones = layout
            .into_iter()
            .map(|(id, centre, open)| Zone::new(id, centre, zone_size, FaceSet::of(open)))
            .collect();

        Self { zone_size, zones }
    }

    pub fn zone_size(&self) -> f32 {
        self.zone_size
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Zones in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Terminal zones whose front face is open to the player
    pub fn escape_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(|z| z.is_escape_zone())
    }

    /// Whether two zones share an open face
    pub fn linked(a: ZoneId, b: ZoneId) -> bool {
        LINKS.iter().any(|&(p, q)| (p, q) == (a, b) || (q, p) == (a, b))
    }
}
