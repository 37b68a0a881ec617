//! Keyboard shortcuts.
//!
//! | Key | Command |
//! |-----|---------|
//! | Space | Toggle one-at-a-time emission |
//! | R | Reset the session |
//! | F | Freeze / resume the simulation |
//! | P | Next particle type |
//! | M | Next detection mode |
//! | 1 / 2 | Toggle top / bottom slit |
//! | Up / Down | Emission rate ±5 |
//! | [ / ] | Slit width ∓2 |
//! | - / = | Slit distance ∓5 |
//! | T | Toggle particle paths |
//! | S | Save the current frame as PNG |

use egui::Key;
use slitwave::Config;

pub const RATE_STEP: f64 = 5.0;
pub const WIDTH_STEP: f64 = 2.0;
pub const DISTANCE_STEP: f64 = 5.0;

pub const MAX_SLIT_WIDTH: f64 = 50.0;
pub const MAX_SLIT_DISTANCE: f64 = 200.0;

/// A user command bound to a key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    ToggleOneAtATime,
    Reset,
    TogglePause,
    NextParticleType,
    NextDetectionMode,
    ToggleTopSlit,
    ToggleBottomSlit,
    /// Change the emission rate by this many percent.
    EmissionRate(f64),
    SlitWidth(f64),
    SlitDistance(f64),
    TogglePaths,
    SaveFrame,
}

/// Every key binding, in help-text order.
pub const BINDINGS: &[(Key, Command)] = &[
    (Key::Space, Command::ToggleOneAtATime),
    (Key::R, Command::Reset),
    (Key::F, Command::TogglePause),
    (Key::P, Command::NextParticleType),
    (Key::M, Command::NextDetectionMode),
    (Key::Num1, Command::ToggleTopSlit),
    (Key::Num2, Command::ToggleBottomSlit),
    (Key::ArrowUp, Command::EmissionRate(RATE_STEP)),
    (Key::ArrowDown, Command::EmissionRate(-RATE_STEP)),
    (Key::OpenBracket, Command::SlitWidth(-WIDTH_STEP)),
    (Key::CloseBracket, Command::SlitWidth(WIDTH_STEP)),
    (Key::Minus, Command::SlitDistance(-DISTANCE_STEP)),
    (Key::Equals, Command::SlitDistance(DISTANCE_STEP)),
    (Key::T, Command::TogglePaths),
    (Key::S, Command::SaveFrame),
];

impl Command {
    pub fn from_key(key: Key) -> Option<Self> {
        BINDINGS.iter().find(|(k, _)| *k == key).map(|&(_, command)| command)
    }

    /// Apply the config side of this command.
    ///
    /// Returns `false` for commands that act on the session or the host
    /// or the host instead: reset, pause, one-at-a-time and frame saving.
    pub fn apply(self, config: &mut Config) -> bool {
        match self {
            Command::NextParticleType => config.particle_type = config.particle_type.next(),
            Command::NextDetectionMode => config.detection_mode = config.detection_mode.next(),
            Command::ToggleTopSlit => config.top_slit_open = !config.top_slit_open,
            Command::ToggleBottomSlit => config.bottom_slit_open = !config.bottom_slit_open,
            Command::EmissionRate(step) => {
                config.emission_rate = (config.emission_rate + step).clamp(0.0, 100.0);
            }
            Command::SlitWidth(step) => {
                config.slit_width = (config.slit_width + step).clamp(0.0, MAX_SLIT_WIDTH);
            }
            Command::SlitDistance(step) => {
                config.slit_distance = (config.slit_distance + step).clamp(0.0, MAX_SLIT_DISTANCE);
            }
            Command::TogglePaths => config.show_paths = !config.show_paths,
            Command::ToggleOneAtATime | Command::Reset | Command::TogglePause | Command::SaveFrame => return false,
        }
        true
    }
}

/// One help line per binding, for the status panel.
pub fn help_lines() -> impl Iterator<Item = String> {
    BINDINGS.iter().map(|(key, command)| format!("{:<10} {:?}", key.name(), command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slitwave::{DetectionMode, ParticleType};

    #[test]
    fn test_every_key_maps_back_to_its_command() {
        for &(key, command) in BINDINGS {
            assert_eq!(Command::from_key(key), Some(command));
        }
        assert_eq!(Command::from_key(Key::Z), None);
    }

    #[test]
    fn test_keys_are_bound_once() {
        for (i, (key, _)) in BINDINGS.iter().enumerate() {
            assert!(BINDINGS[i + 1..].iter().all(|(other, _)| other != key), "{:?} bound twice", key);
            // H is taken by the help window.
            assert_ne!(*key, Key::H);
        }
    }

    #[test]
    fn test_cycling_commands() {
        let mut config = Config::default();
        assert!(Command::NextParticleType.apply(&mut config));
        assert_eq!(config.particle_type, ParticleType::Electron);
        assert!(Command::NextDetectionMode.apply(&mut config));
        assert_eq!(config.detection_mode, DetectionMode::Particle);
    }

    #[test]
    fn test_steps_clamp() {
        let mut config = Config { emission_rate: 98.0, slit_width: 1.0, ..Config::default() };
        Command::EmissionRate(RATE_STEP).apply(&mut config);
        assert_eq!(config.emission_rate, 100.0);
        Command::SlitWidth(-WIDTH_STEP).apply(&mut config);
        assert_eq!(config.slit_width, 0.0);
        for _ in 0..100 {
            Command::SlitDistance(DISTANCE_STEP).apply(&mut config);
        }
        assert_eq!(config.slit_distance, MAX_SLIT_DISTANCE);
    }

    #[test]
    fn test_slit_toggles() {
        let mut config = Config::default();
        Command::ToggleTopSlit.apply(&mut config);
        Command::ToggleBottomSlit.apply(&mut config);
        assert_eq!(config.open_slits(), 0);
        Command::ToggleBottomSlit.apply(&mut config);
        assert!(config.bottom_slit_open);
    }

    #[test]
    fn test_session_commands_leave_config_alone() {
        let mut config = Config::default();
        for command in [Command::Reset, Command::TogglePause, Command::ToggleOneAtATime, Command::SaveFrame] {
            assert!(!command.apply(&mut config));
        }
        assert_eq!(config, Config::default());
    }
}
