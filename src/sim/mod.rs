//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (zones by id)
//! - No I/O, rendering or transport dependencies

pub mod collision;
pub mod locate;
pub mod paddle;
pub mod state;
pub mod tick;
pub mod zone;

pub use collision::{CatchOutcome, Reflection, paddle_catches, resolve_bounce};
pub use locate::{Location, TIE_BREAKS, TieBreak, is_escaping, locate, sphere_overlaps_box};
pub use paddle::Paddle;
pub use state::{Ball, BeepDurations, GameSession, START_ZONE, SessionConfig, SessionState};
pub use tick::{TickInput, TickReport, tick};
pub use zone::{Axis, AxisBox, ESCAPE_ZONES, Face, FaceSet, LINKS, Zone, ZoneId, ZoneRegistry};
