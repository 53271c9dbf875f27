//! Session state and core simulation types
//!
//! Everything mutable during a game lives in [`GameSession`]; nothing is
//! global. Subsystems receive the pieces they need by reference.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CatchOutcome;
use super::paddle::Paddle;
use super::zone::{ZoneId, ZoneRegistry};
use crate::Vector3;
use crate::consts::*;
use crate::protocol::{Command, OutboundCommand, SensorFrame, Tone};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Ball in play
    Playing,
    /// Ball escaped past the paddle; waiting for a restart
    GameOver,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vector3,
    /// Displacement per tick
    pub vel: Vector3,
    pub radius: f32,
    /// Shown as lost (red) after a miss
    pub lost: bool,
}

/// Buzzer durations (ms) for each event; all zero when the buzzer is off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeepDurations {
    pub new_zone: u32,
    pub wall_bounce: u32,
    pub game_over: u32,
}

impl BeepDurations {
    pub fn new(buzzer_enabled: bool) -> Self {
        if buzzer_enabled {
            Self {
                new_zone: NEW_ZONE_BEEP_MS,
                wall_bounce: WALL_BOUNCE_BEEP_MS,
                game_over: GAME_OVER_BEEP_MS,
            }
        } else {
            Self {
                new_zone: 0,
                wall_bounce: 0,
                game_over: 0,
            }
        }
    }
}

/// Parameters fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub zone_size: f32,
    pub seed: u64,
    pub beeps: BeepDurations,
}

impl SessionConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            zone_size: ZONE_SIZE,
            seed,
            beeps: BeepDurations::new(true),
        }
    }
}

/// A complete game: arena, ball, both paddles, counters and RNG
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: SessionConfig,
    pub zones: ZoneRegistry,
    pub ball: Ball,
    /// Paddle 0 guards zone 1, paddle 1 guards zone 4
    pub paddles: [Paddle; 2],
    /// Index into `paddles` of the paddle that can catch
    pub active_paddle: usize,
    pub state: SessionState,
    /// Successful catches this game
    pub hits: u32,
    /// Ticks played this game
    pub ticks: u64,
    /// Zone whose walls the ball bounces against
    pub(crate) bounce_zone: ZoneId,
    /// Zone currently shown on the LEDs
    pub(crate) leds_shown: ZoneId,
    /// Button reading from the previous tick (edge detection)
    pub(crate) last_button: u8,
    rng: Pcg32,
}

impl GameSession {
    /// Start a new game
    pub fn new(config: SessionConfig) -> Self {
        let zones = ZoneRegistry::standard(config.zone_size);
        let size = config.zone_size;
        let half = Self::full_half_size(size);

        let mut session = Self {
            config,
            zones,
            ball: Ball {
                pos: Vector3::ZERO,
                vel: Vector3::ZERO,
                radius: BALL_RADIUS_RATIO * size,
                lost: false,
            },
            paddles: [
                Paddle::new(Vector3::new(-size, 0.0, 1.5 * size), half),
                Paddle::new(Vector3::new(size, 0.0, 1.5 * size), half),
            ],
            active_paddle: 0,
            state: SessionState::Playing,
            hits: 0,
            ticks: 0,
            bounce_zone: START_ZONE,
            leds_shown: 0,
            last_button: 1,
            rng: Pcg32::seed_from_u64(config.seed),
        };
        session.reset_play();
        session
    }

    /// Begin another game after a miss. The button history is kept so a
    /// held button does not count as a fresh press.
    pub fn restart(&mut self) {
        log::info!("New game (previous: {} hits in {} ticks)", self.hits, self.ticks);
        self.reset_play();
    }

    fn reset_play(&mut self) {
        let size = self.config.zone_size;
        let half = Self::full_half_size(size);

        for paddle in &mut self.paddles {
            paddle.resize(half);
            paddle.move_to(0.0, 0.0);
            paddle.set_active(false);
        }
        self.active_paddle = 0;
        self.paddles[0].set_active(true);

        self.ball.pos = self.start_position();
        self.ball.vel = self.random_velocity();
        self.ball.lost = false;

        self.state = SessionState::Playing;
        self.hits = 0;
        self.ticks = 0;
        self.bounce_zone = START_ZONE;
        self.leds_shown = 0;
    }

    fn start_position(&self) -> Vector3 {
        self.zones
            .get(START_ZONE)
            .map(|zone| zone.centre)
            .unwrap_or(Vector3::ZERO)
    }

    /// Each component uniform in `[-0.5, 0.5) / (zone_size / 2)`
    fn random_velocity(&mut self) -> Vector3 {
        let scale = self.config.zone_size / 2.0;
        let mut component = || (self.rng.random::<f32>() - 0.5) / scale;
        Vector3::new(component(), component(), component())
    }

    fn full_half_size(zone_size: f32) -> f32 {
        zone_size * PADDLE_WIDTH_RATIO / 2.0
    }

    pub fn active_paddle(&self) -> &Paddle {
        &self.paddles[self.active_paddle]
    }

    /// Zone currently used as the bounce reference
    pub fn bounce_zone(&self) -> ZoneId {
        self.bounce_zone
    }

    /// Range of paddle travel on each axis: zone size minus paddle width
    pub fn paddle_travel(&self) -> f32 {
        self.config.zone_size - 2.0 * self.paddles[0].half_size
    }

    /// Make the other paddle the active one
    pub fn swap_paddles(&mut self) {
        self.paddles[self.active_paddle].set_active(false);
        self.active_paddle = 1 - self.active_paddle;
        self.paddles[self.active_paddle].set_active(true);
        log::debug!("Active paddle: {}", self.active_paddle + 1);
    }

    /// Toggle the active paddle on a released -> pressed transition
    pub(crate) fn handle_button(&mut self, button: u8) -> bool {
        let pressed = button == 0 && self.last_button != 0;
        self.last_button = button;
        if pressed {
            self.swap_paddles();
        }
        pressed
    }

    /// Position the active paddle from a joystick reading
    pub(crate) fn steer(&mut self, sensor: &SensorFrame) {
        let travel = self.paddle_travel();
        let offset = |raw: u16| (f32::from(raw) / JOYSTICK_SCALE - 0.5) * travel;
        let (x, y) = (offset(sensor.joystick_x), offset(sensor.joystick_y));
        self.paddles[self.active_paddle].move_to(x, y);
    }

    /// Count a catch; the first hits shrink both paddles
    pub fn record_hit(&mut self) -> CatchOutcome {
        self.hits += 1;
        log::info!("Hit! ({})", self.hits);

        if self.hits < PADDLE_SHRINK_LIMIT {
            let step = self.config.zone_size * PADDLE_SHRINK_RATIO / 2.0;
            for paddle in &mut self.paddles {
                paddle.resize(paddle.half_size - step);
            }
        }
        CatchOutcome::Hit(self.hits)
    }

    /// End the game
    pub fn record_miss(&mut self) -> CatchOutcome {
        log::info!("Miss! Game over after {} hits", self.hits);
        self.state = SessionState::GameOver;
        self.ball.lost = true;
        CatchOutcome::Miss
    }

    /// Commands for this tick: at most one LED update and one beep.
    ///
    /// A zone change sends the LEDs with a low beep; a wall bounce only
    /// beeps when the LEDs did not change.
    pub(crate) fn compose_command(&mut self, zone: ZoneId, wall_bounce: bool) -> Option<OutboundCommand> {
        let beeps = self.config.beeps;

        if self.state == SessionState::GameOver {
            return Some(OutboundCommand::new(vec![
                Command::Leds(0),
                Command::Beep { tone: Tone::Low, duration_ms: beeps.game_over },
            ]));
        }

        if zone != self.leds_shown {
            self.leds_shown = zone;
            return Some(OutboundCommand::new(vec![
                Command::Leds(zone),
                Command::Beep { tone: Tone::Low, duration_ms: beeps.new_zone },
            ]));
        }

        if wall_bounce {
            return Some(OutboundCommand::new(vec![Command::Beep {
                tone: Tone::High,
                duration_ms: beeps.wall_bounce,
            }]));
        }

        None
    }
}

/// The ball starts each game at the centre of this zone
pub const START_ZONE: ZoneId = 7;
