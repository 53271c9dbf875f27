//! Fixed-step simulation tick
//!
//! Order within a tick: locate the ball from its prospective position,
//! apply the button and joystick, integrate the ball, test the paddle if it
//! is escaping, bounce off the bounce zone's walls, then compose the
//! outbound command.

use super::collision::{CatchOutcome, paddle_catches, resolve_bounce};
use super::locate::locate;
use super::state::{GameSession, SessionState};
use super::zone::ZoneId;
use crate::protocol::{OutboundCommand, SensorFrame};

/// Inputs for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Latest joystick/button reading (last-known when no new frame arrived)
    pub sensor: SensorFrame,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Zone the ball is in or entering; 0 when none
    pub zone: ZoneId,
    pub wall_bounce: bool,
    pub paddle_swapped: bool,
    pub catch: Option<CatchOutcome>,
    /// Line to send to the microcontroller, if anything changed
    pub command: Option<OutboundCommand>,
}

/// Advance the session by one tick. Does nothing once the game is over.
pub fn tick(session: &mut GameSession, input: &TickInput) -> TickReport {
    if session.state == SessionState::GameOver {
        return TickReport::default();
    }
    session.ticks += 1;

    let location = locate(&session.zones, &session.ball);
    if let Some(id) = location.active {
        session.bounce_zone = id;
    }

    let paddle_swapped = session.handle_button(input.sensor.button);
    session.steer(&input.sensor);

    session.ball.pos += session.ball.vel;

    let catch = if location.escaping {
        if paddle_catches(session.active_paddle(), session.ball.pos) {
            Some(session.record_hit())
        } else {
            Some(session.record_miss())
        }
    } else {
        None
    };

    let wall_bounce = match session.zones.get(session.bounce_zone) {
        Some(zone) => {
            let bounds = zone.bounds;
            resolve_bounce(&bounds, &mut session.ball).any()
        }
        None => false,
    };

    let zone = location.zone_or_zero();
    log::trace!(
        "tick {}: zone {} pos {:?} vel {:?}",
        session.ticks,
        zone,
        session.ball.pos,
        session.ball.vel
    );

    TickReport {
        zone,
        wall_bounce,
        paddle_swapped,
        catch,
        command: session.compose_command(zone, wall_bounce),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector3;
    use crate::sim::state::SessionConfig;

    fn session_with_ball(pos: Vector3, vel: Vector3) -> GameSession {
        let mut session = GameSession::new(SessionConfig::new(42));
        session.ball.pos = pos;
        session.ball.vel = vel;
        session
    }

    fn input(x: u16, y: u16, button: u8) -> TickInput {
        TickInput {
            sensor: SensorFrame {
                joystick_x: x,
                joystick_y: y,
                button,
            },
        }
    }

    #[test]
    fn ball_integrates_before_bouncing() {
        let mut session = session_with_ball(Vector3::new(0.0, 0.0, -10.0), Vector3::new(0.05, -0.02, 0.01));
        let report = tick(&mut session, &TickInput::default());

        assert!((session.ball.pos - Vector3::new(0.05, -0.02, -9.99)).length() < 1e-5);
        assert_eq!(report.zone, 7);
        assert!(!report.wall_bounce);
        assert_eq!(report.command.unwrap().payload(), "LEDs=7,Beep=L150");
    }

    #[test]
    fn catch_at_escape_face_keeps_playing() {
        let mut session = session_with_ball(Vector3::new(-10.0, 0.0, 14.6), Vector3::new(0.0, 0.0, 0.1));

        let report = tick(&mut session, &input(512, 512, 1));

        assert_eq!(report.catch, Some(CatchOutcome::Hit(1)));
        assert_eq!(session.hits, 1);
        assert_eq!(session.state, SessionState::Playing);
        // Reflected back into zone 1.
        assert!(report.wall_bounce);
        assert!(session.ball.vel.z < 0.0);
    }

    #[test]
    fn miss_at_escape_face_ends_game() {
        let mut session = session_with_ball(Vector3::new(-13.0, 0.0, 14.6), Vector3::new(0.0, 0.0, 0.1));

        let report = tick(&mut session, &input(1023, 512, 1));

        assert_eq!(report.catch, Some(CatchOutcome::Miss));
        assert_eq!(session.state, SessionState::GameOver);
        assert!(session.ball.lost);
        assert_eq!(report.command.unwrap().payload(), "LEDs=0,Beep=L750");

        // Further ticks are inert.
        let pos = session.ball.pos;
        let after = tick(&mut session, &input(512, 512, 1));
        assert_eq!(after, TickReport::default());
        assert_eq!(session.ball.pos, pos);
    }

    #[test]
    fn inactive_paddle_cannot_catch() {
        // Escaping zone 4 while paddle 1 (zone 1) is active.
        let mut session = session_with_ball(Vector3::new(10.0, 0.0, 14.6), Vector3::new(0.0, 0.0, 0.1));

        let report = tick(&mut session, &input(512, 512, 1));
        assert_eq!(report.catch, Some(CatchOutcome::Miss));
    }

    #[test]
    fn button_press_hands_catch_to_other_paddle() {
        let mut session = session_with_ball(Vector3::new(10.0, 0.0, 14.6), Vector3::new(0.0, 0.0, 0.1));

        let report = tick(&mut session, &input(512, 512, 0));
        assert!(report.paddle_swapped);
        assert_eq!(report.catch, Some(CatchOutcome::Hit(1)));
    }

    #[test]
    fn wall_bounce_beeps_high_when_zone_unchanged() {
        let mut session = session_with_ball(Vector3::new(0.0, 0.0, -10.0), Vector3::new(0.0, 0.0, 0.0));
        tick(&mut session, &TickInput::default());

        // Touching the top wall of zone 7 while moving up.
        session.ball.pos = Vector3::new(0.0, 4.35, -10.0);
        session.ball.vel = Vector3::new(0.0, 0.1, 0.0);
        let report = tick(&mut session, &TickInput::default());

        assert!(report.wall_bounce);
        assert_eq!(report.zone, 7);
        assert_eq!(report.command.unwrap().payload(), "Beep=H20");
        assert!(session.ball.vel.y < 0.0);
    }

    #[test]
    fn crossing_into_zone_three_switches_bounce_reference() {
        let mut session = session_with_ball(Vector3::new(-5.3, 0.0, -10.0), Vector3::new(-0.1, 0.0, 0.0));
        let report = tick(&mut session, &TickInput::default());
        assert_eq!(report.zone, 3);
        assert_eq!(session.bounce_zone(), 3);
        assert!(!report.wall_bounce);
    }

    #[test]
    fn long_run_stays_inside_the_arena_until_game_over() {
        let mut session = GameSession::new(SessionConfig::new(2024));
        for _ in 0..20_000 {
            if session.state == SessionState::GameOver {
                break;
            }
            tick(&mut session, &TickInput::default());
            let p = session.ball.pos;
            assert!(p.x.abs() < 16.0 && p.y.abs() < 6.0, "ball left arena at {p:?}");
            assert!(p.z > -16.0 && p.z < 17.0, "ball left arena at {p:?}");
        }
    }
}
