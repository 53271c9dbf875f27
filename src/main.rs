//! Zone Pong entry point
//!
//! Opens the serial link (if present) and runs games until stdin closes.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use zone_pong::Settings;
use zone_pong::runner::Game;
use zone_pong::scene::HeadlessScene;
use zone_pong::transport::{SerialLink, Transport};

#[derive(Parser)]
#[command(name = "zone-pong")]
#[command(about = "Seven-room 3D pong played with a joystick on a serial microcontroller")]
struct Args {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial device (overrides settings)
    #[arg(long)]
    port: Option<String>,

    /// Serial speed (overrides settings)
    #[arg(long)]
    baud: Option<u32>,

    /// RNG seed for a reproducible first serve
    #[arg(long)]
    seed: Option<u64>,

    /// Send zero-length beeps
    #[arg(long)]
    no_buzzer: bool,

    /// Write the effective settings to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => {
            Settings::load(path).with_context(|| format!("loading settings from {}", path.display()))?
        }
        None => Settings::default(),
    };
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(baud) = args.baud {
        settings.baud_rate = baud;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if args.no_buzzer {
        settings.buzzer_enabled = false;
    }
    settings.validate().context("invalid settings")?;

    if let Some(path) = args.write_config {
        settings
            .save(&path)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        return Ok(());
    }

    log::info!("Zone Pong starting...");
    let transport = SerialLink::try_open(&settings.port, settings.baud_rate)
        .map(|link| Box::new(link) as Box<dyn Transport>);
    let scene = HeadlessScene::new(settings.tick_rate_hz);
    let mut game = Game::new(settings.session_config(), transport, scene);

    let stdin = io::stdin();
    loop {
        let hits = game.run_until_game_over();
        println!("Game Over! {hits} hits");
        print!("Press RETURN to play again...");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        game.restart();
    }

    println!();
    Ok(())
}
