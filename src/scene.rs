//! Rendering collaborator
//!
//! The simulation never draws anything itself. It reports zones, paddles and
//! the ball to a [`Scene`], and the scene provides frame pacing.

use std::time::{Duration, Instant};

use crate::sim::{Ball, Paddle, Zone};

/// Receives visual state and paces the tick loop.
pub trait Scene {
    /// Called once per zone when a game is set up
    fn draw_zone(&mut self, zone: &Zone);

    /// Paddle moved, resized or changed active state
    fn update_paddle(&mut self, index: usize, paddle: &Paddle);

    fn update_ball(&mut self, ball: &Ball);

    /// Show or hide the "Game Over" / "Play Again" prompts
    fn show_game_over(&mut self, visible: bool);

    /// Wait for the next frame slot
    fn pace(&mut self);
}

/// Scene without a display: logs state changes and paces with sleeps.
pub struct HeadlessScene {
    period: Duration,
    next_frame: Instant,
    /// Last reported (active, half size) per paddle, to log changes only
    paddles: [(bool, f32); 2],
}

impl HeadlessScene {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / tick_rate_hz.max(1),
            next_frame: Instant::now(),
            paddles: [(false, 0.0); 2],
        }
    }
}

impl Scene for HeadlessScene {
    fn draw_zone(&mut self, zone: &Zone) {
        log::debug!(
            "Zone {} at {:?}: open {:?}, bounds {:?}",
            zone.id,
            zone.centre,
            zone.open.iter().collect::<Vec<_>>(),
            zone.bounds.to_array()
        );
    }

    fn update_paddle(&mut self, index: usize, paddle: &Paddle) {
        let Some(last) = self.paddles.get_mut(index) else {
            return;
        };
        let now = (paddle.active, paddle.half_size);
        if *last != now {
            log::debug!(
                "Paddle {} {} (half size {:.2})",
                index + 1,
                if paddle.active { "active" } else { "inactive" },
                paddle.half_size
            );
            *last = now;
        }
    }

    fn update_ball(&mut self, ball: &Ball) {
        log::trace!("Ball at {:?}{}", ball.pos, if ball.lost { " (lost)" } else { "" });
    }

    fn show_game_over(&mut self, visible: bool) {
        if visible {
            log::info!("Game Over!");
        }
    }

    fn pace(&mut self) {
        let now = Instant::now();
        if self.next_frame > now {
            std::thread::sleep(self.next_frame - now);
            self.next_frame += self.period;
        } else {
            // Fell behind; don't try to catch up with a burst of ticks.
            self.next_frame = now + self.period;
        }
    }
}

/// Scene that records nothing and never waits
#[derive(Debug, Default)]
pub struct NullScene {
    /// Number of `pace` calls
    pub frames: u64,
    pub game_over_visible: bool,
}

impl Scene for NullScene {
    fn draw_zone(&mut self, _zone: &Zone) {}

    fn update_paddle(&mut self, _index: usize, _paddle: &Paddle) {}

    fn update_ball(&mut self, _ball: &Ball) {}

    fn show_game_over(&mut self, visible: bool) {
        self.game_over_visible = visible;
    }

    fn pace(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_pacing_holds_tick_rate() {
        let mut scene = HeadlessScene::new(200);
        let start = Instant::now();
        for _ in 0..5 {
            scene.pace();
        }
        // First call is immediate, the remaining four wait 5 ms each.
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn null_scene_counts_frames() {
        let mut scene = NullScene::default();
        scene.pace();
        scene.pace();
        scene.show_game_over(true);
        assert_eq!(scene.frames, 2);
        assert!(scene.game_over_visible);
    }
}
