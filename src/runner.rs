//! Per-tick orchestration
//!
//! Each step waits for one sensor line (when a serial link is present),
//! advances the simulation, pushes visuals to the scene and sends the
//! resulting command. A failing link drops the game into degraded mode:
//! default input, no output.

use crate::error::TransportError;
use crate::protocol::{OutboundCommand, SensorFrame, SensorLink};
use crate::scene::Scene;
use crate::sim::{CatchOutcome, GameSession, SessionConfig, SessionState, TickInput, TickReport, tick};
use crate::transport::Transport;

/// A running game bound to its I/O collaborators
pub struct Game<S: Scene> {
    session: GameSession,
    link: SensorLink,
    transport: Option<Box<dyn Transport>>,
    scene: S,
    lines_sent: u64,
}

impl<S: Scene> Game<S> {
    /// Set up a session. `transport` is None when no serial port could be
    /// opened (the opener reports why); the game then runs with a centred
    /// joystick and no output.
    pub fn new(config: SessionConfig, transport: Option<Box<dyn Transport>>, scene: S) -> Self {
        let mut game = Self {
            session: GameSession::new(config),
            link: SensorLink::new(),
            transport,
            scene,
            lines_sent: 0,
        };
        for zone in game.session.zones.iter() {
            game.scene.draw_zone(zone);
        }
        game.render();
        game
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn sensor_link(&self) -> &SensorLink {
        &self.link
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// True when running without a serial link
    pub fn is_degraded(&self) -> bool {
        self.transport.is_none()
    }

    pub fn lines_sent(&self) -> u64 {
        self.lines_sent
    }

    pub fn is_game_over(&self) -> bool {
        self.session.state == SessionState::GameOver
    }

    /// Run one tick
    pub fn step(&mut self) -> TickReport {
        self.scene.pace();

        let sensor = self.acquire_frame();
        let report = tick(&mut self.session, &TickInput { sensor });

        self.render();
        if report.catch == Some(CatchOutcome::Miss) {
            self.scene.show_game_over(true);
        }
        if let Some(command) = &report.command {
            self.send(command);
        }
        report
    }

    /// Step until the ball is lost; returns the number of hits
    pub fn run_until_game_over(&mut self) -> u32 {
        while !self.is_game_over() {
            self.step();
        }
        self.session.hits
    }

    /// Start another game, discarding any input that queued up meanwhile
    pub fn restart(&mut self) {
        self.session.restart();
        if let Some(transport) = self.transport.as_mut()
            && let Err(e) = transport.reset_input_buffer()
        {
            self.drop_link("flush", &e);
        }
        self.scene.show_game_over(false);
        self.render();
    }

    /// Wait for the next sensor line and fold it into the held frame.
    fn acquire_frame(&mut self) -> SensorFrame {
        if let Some(transport) = self.transport.as_mut() {
            match Self::next_line(transport.as_mut(), &mut self.scene) {
                Ok(line) => {
                    if let Err(e) = self.link.ingest(&line) {
                        log::warn!("Dropped sensor line {:?}: {e}", String::from_utf8_lossy(&line));
                    }
                }
                Err(e) => self.drop_link("read", &e),
            }
        }
        self.link.current()
    }

    fn next_line(transport: &mut dyn Transport, scene: &mut S) -> Result<Vec<u8>, TransportError> {
        while transport.bytes_available()? == 0 {
            scene.pace();
        }
        transport.read_line()
    }

    fn send(&mut self, command: &OutboundCommand) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        let line = command.encode();
        match transport.write_line(line.as_bytes()) {
            Ok(()) => {
                self.lines_sent += 1;
                log::debug!("Sent {}", line.trim_end());
            }
            Err(e) => self.drop_link("write", &e),
        }
    }

    fn drop_link(&mut self, op: &str, error: &TransportError) {
        log::error!("Serial {op} failed: {error}; continuing without serial link");
        self.transport = None;
    }

    fn render(&mut self) {
        for (index, paddle) in self.session.paddles.iter().enumerate() {
            self.scene.update_paddle(index, paddle);
        }
        self.scene.update_ball(&self.session.ball);
    }
}
