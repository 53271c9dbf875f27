//! Zone Pong - a ball bouncing through seven connected rooms
//!
//! Core modules:
//! - `sim`: Deterministic simulation (zones, paddles, collisions, session state)
//! - `crc8`: Dallas/Maxim CRC-8 checksum
//! - `protocol`: Line-oriented serial frames exchanged with the microcontroller
//! - `transport`: Serial line transport
//! - `scene`: Rendering/pacing collaborator
//! - `runner`: Per-tick orchestration of input, simulation and output
//! - `settings`: JSON configuration

pub mod crc8;
pub mod error;
pub mod protocol;
pub mod runner;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod transport;

pub use error::{FrameError, SettingsError, TransportError};
pub use protocol::{Command, OutboundCommand, SensorFrame, SensorLink, Tone, Trust};
pub use runner::Game;
pub use settings::Settings;

/// 3-component vector used for positions and velocities
pub type Vector3 = glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Default edge length of every zone cube
    pub const ZONE_SIZE: f32 = 10.0;
    /// Wall thickness as a fraction of the zone size
    pub const WALL_THICKNESS_RATIO: f32 = 1.0 / 50.0;

    /// Ball radius as a fraction of the zone size
    pub const BALL_RADIUS_RATIO: f32 = 0.05;

    /// Paddle full width as a fraction of the zone size (a big bat, but it won't stay big)
    pub const PADDLE_WIDTH_RATIO: f32 = 0.5;
    /// Full-width reduction per hit as a fraction of the zone size
    pub const PADDLE_SHRINK_RATIO: f32 = 1.0 / 20.0;
    /// Hits at or beyond this count no longer shrink the paddles
    pub const PADDLE_SHRINK_LIMIT: u32 = 10;

    /// Joystick ADC full scale
    pub const JOYSTICK_SCALE: f32 = 1024.0;
    /// Largest joystick reading
    pub const JOYSTICK_MAX: u16 = 1023;
    /// Centred joystick reading
    pub const JOYSTICK_CENTRE: u16 = 512;

    /// Low beep on entering a new zone (milliseconds)
    pub const NEW_ZONE_BEEP_MS: u32 = 150;
    /// High beep on a wall bounce (milliseconds)
    pub const WALL_BOUNCE_BEEP_MS: u32 = 20;
    /// Long low beep when the ball is lost (milliseconds)
    pub const GAME_OVER_BEEP_MS: u32 = 750;

    /// Default logical tick rate (Hz)
    pub const TICK_RATE_HZ: u32 = 100;
    /// Default serial speed
    pub const BAUD_RATE: u32 = 115_200;
}
