//! Runner configuration management.
//!
//! Consolidates all environment variable reads, applies command-line
//! overrides and provides validated configuration.

use card_table::{SettingsError, SimulationSettings};
use std::{path::PathBuf, str::FromStr};

/// Complete runner configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Table and game settings handed to the simulation
    pub simulation: SimulationSettings,
    /// Host loop settings
    pub run: RunConfig,
}

/// Host loop configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Length of one fixed step in milliseconds
    pub tick_ms: u64,
    /// Stop after this many ticks even without a game over
    pub max_ticks: u64,
    /// Directory for the CSV telemetry files; telemetry is off when unset
    pub telemetry_dir: Option<PathBuf>,
    /// Sleep one step between ticks
    pub realtime: bool,
    /// Print the final summary as JSON
    pub json: bool,
}

/// Values taken from the command line, which win over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub players: Option<usize>,
    pub rounds: Option<u32>,
    pub seed: Option<u64>,
    pub tick_ms: Option<u64>,
    pub max_ticks: Option<u64>,
    pub telemetry_dir: Option<PathBuf>,
    pub manual: bool,
    pub diagnostics: bool,
    pub realtime: bool,
    pub json: bool,
}

pub const DEFAULT_TICK_MS: u64 = 16;
pub const DEFAULT_MAX_TICKS: u64 = 1_000_000;

impl SimConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F, overrides: Overrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SimulationSettings::default();

        let simulation = SimulationSettings {
            players: match overrides.players {
                Some(players) => players,
                None => parse_env_or(&lookup, "SIM_PLAYERS", defaults.players)?,
            },
            coins_per_player: parse_env_or(
                &lookup,
                "SIM_COINS_PER_PLAYER",
                defaults.coins_per_player,
            )?,
            cards_per_player: parse_env_or(
                &lookup,
                "SIM_CARDS_PER_PLAYER",
                defaults.cards_per_player,
            )?,
            total_rounds: match overrides.rounds {
                Some(rounds) => rounds,
                None => parse_env_or(&lookup, "SIM_TOTAL_ROUNDS", defaults.total_rounds)?,
            },
            game_speed: parse_env_or(&lookup, "SIM_GAME_SPEED", defaults.game_speed)?,
            seed: match overrides.seed {
                Some(seed) => Some(seed),
                None => parse_env(&lookup, "SIM_SEED")?,
            },
            auto_mode: !overrides.manual,
            diagnostics: overrides.diagnostics || parse_env_or(&lookup, "SIM_DIAGNOSTICS", false)?,
        };

        let run = RunConfig {
            tick_ms: match overrides.tick_ms {
                Some(tick_ms) => tick_ms,
                None => parse_env_or(&lookup, "SIM_TICK_MS", DEFAULT_TICK_MS)?,
            },
            max_ticks: match overrides.max_ticks {
                Some(max_ticks) => max_ticks,
                None => parse_env_or(&lookup, "SIM_MAX_TICKS", DEFAULT_MAX_TICKS)?,
            },
            telemetry_dir: overrides
                .telemetry_dir
                .or_else(|| lookup("SIM_TELEMETRY_DIR").map(PathBuf::from)),
            realtime: overrides.realtime,
            json: overrides.json,
        };

        Ok(SimConfig { simulation, run })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.tick_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "SIM_TICK_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.run.max_ticks == 0 {
            return Err(ConfigError::Invalid {
                var: "SIM_MAX_TICKS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        self.simulation.validate()?;
        Ok(())
    }

    /// Fixed step in seconds
    #[must_use]
    pub fn step_seconds(&self) -> f32 {
        self.run.tick_ms as f32 / 1000.0
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Invalid simulation settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Parse an optional variable, rejecting values that do not parse
fn parse_env<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("Cannot parse {raw:?}"),
            })
        })
        .transpose()
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_env(lookup, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = SimConfig::from_lookup(lookup(&[]), Overrides::default()).unwrap();
        assert_eq!(config.simulation.players, 4);
        assert_eq!(config.simulation.total_rounds, 10);
        assert!(config.simulation.auto_mode);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.run.tick_ms, DEFAULT_TICK_MS);
        assert_eq!(config.run.telemetry_dir, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_values() {
        let config = SimConfig::from_lookup(
            lookup(&[
                ("SIM_PLAYERS", "6"),
                ("SIM_COINS_PER_PLAYER", "8"),
                ("SIM_SEED", " 42 "),
                ("SIM_GAME_SPEED", "2.5"),
                ("SIM_TELEMETRY_DIR", "/tmp/ct"),
            ]),
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.simulation.players, 6);
        assert_eq!(config.simulation.coins_per_player, 8);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.game_speed, 2.5);
        assert_eq!(config.run.telemetry_dir, Some(PathBuf::from("/tmp/ct")));
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let overrides = Overrides {
            players: Some(2),
            seed: Some(7),
            tick_ms: Some(33),
            manual: true,
            diagnostics: true,
            ..Overrides::default()
        };
        let config = SimConfig::from_lookup(
            lookup(&[("SIM_PLAYERS", "5"), ("SIM_SEED", "1"), ("SIM_TICK_MS", "10")]),
            overrides,
        )
        .unwrap();
        assert_eq!(config.simulation.players, 2);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.run.tick_ms, 33);
        assert!(!config.simulation.auto_mode);
        assert!(config.simulation.diagnostics);
    }

    #[test]
    fn test_unparsable_variable_is_rejected() {
        let err = SimConfig::from_lookup(lookup(&[("SIM_PLAYERS", "four")]), Overrides::default())
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SIM_PLAYERS"));
        assert!(msg.contains("four"));
    }

    #[test]
    fn test_validation_zero_tick() {
        let overrides = Overrides {
            tick_ms: Some(0),
            ..Overrides::default()
        };
        let config = SimConfig::from_lookup(lookup(&[]), overrides).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_validation_defers_to_settings() {
        let config =
            SimConfig::from_lookup(lookup(&[("SIM_PLAYERS", "9")]), Overrides::default()).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Settings(SettingsError::PlayerCount(9))));
    }

    #[test]
    fn test_step_seconds() {
        let overrides = Overrides {
            tick_ms: Some(250),
            ..Overrides::default()
        };
        let config = SimConfig::from_lookup(lookup(&[]), overrides).unwrap();
        assert_eq!(config.step_seconds(), 0.25);
    }
}
