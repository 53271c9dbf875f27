//! Game settings
//!
//! Stored as a JSON file. Missing fields take their defaults so that older
//! files keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{BAUD_RATE, TICK_RATE_HZ, ZONE_SIZE};
use crate::error::SettingsError;
use crate::sim::{BeepDurations, SessionConfig};

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Serial device of the microcontroller
    pub port: String,
    pub baud_rate: u32,
    /// Simulation ticks per second
    pub tick_rate_hz: u32,
    /// When off, beep commands are still sent but with zero duration
    pub buzzer_enabled: bool,
    /// Edge length of each zone cube
    pub zone_size: f32,
    /// Fixed RNG seed (random per run if unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: BAUD_RATE,
            tick_rate_hz: TICK_RATE_HZ,
            buzzer_enabled: true,
            zone_size: ZONE_SIZE,
            seed: None,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_rate_hz",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.zone_size.is_finite() && self.zone_size > 0.0) {
            return Err(SettingsError::Invalid {
                field: "zone_size",
                reason: format!("{} is not a positive size", self.zone_size),
            });
        }
        Ok(())
    }

    /// Simulation parameters for a new session
    pub fn session_config(&self) -> SessionConfig {
        let seed = self.seed.unwrap_or_else(rand::random);
        log::debug!("Session seed: {seed}");
        SessionConfig {
            zone_size: self.zone_size,
            seed,
            beeps: BeepDurations::new(self.buzzer_enabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("zone-pong-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"port": "/dev/ttyUSB1", "seed": 9}"#).unwrap();
        assert_eq!(settings.port, "/dev/ttyUSB1");
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.tick_rate_hz, 100);
        assert!(settings.buzzer_enabled);
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save");
        let settings = Settings {
            buzzer_enabled: false,
            seed: Some(3),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(Settings::load(&temp_path("missing")), Err(SettingsError::Io(_))));
    }

    #[test]
    fn rejects_bad_values() {
        let path = temp_path("bad");
        fs::write(&path, r#"{"zone_size": -1.0}"#).unwrap();
        let result = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(SettingsError::Invalid { field: "zone_size", .. })));

        let zero_rate = Settings {
            tick_rate_hz: 0,
            ..Settings::default()
        };
        assert!(zero_rate.validate().is_err());
    }

    #[test]
    fn session_config_carries_seed_and_buzzer() {
        let settings = Settings {
            seed: Some(77),
            buzzer_enabled: false,
            zone_size: 20.0,
            ..Settings::default()
        };
        let config = settings.session_config();
        assert_eq!(config.seed, 77);
        assert_eq!(config.zone_size, 20.0);
        assert_eq!(config.beeps.new_zone, 0);
        assert_eq!(config.beeps.game_over, 0);
    }
}
