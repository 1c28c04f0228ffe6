//! Simulation Configuration
//!
//! Every tunable number of the simulation lives here instead of inline.

use std::time::Duration;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Default ticks per second.
pub const DEFAULT_FRAME_RATE: f64 = 20.0;

/// Default number of rising frames before the hang frame.
pub const DEFAULT_JUMPING_MAX_FRAME: u32 = 4;

/// Default menu keypress debounce in milliseconds.
pub const DEFAULT_MENU_DEBOUNCE_MS: u64 = 100;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// An environment override could not be parsed.
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Raw value found
        value: String,
    },
}

/// Configuration for the simulation and its fixed-step loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Ticks per second. A tick runs once `1 / frame_rate` seconds elapsed.
    pub frame_rate: f64,

    /// Frame at which a jump stops rising and hangs for one tick.
    pub jumping_max_frame: u32,

    /// Delay after a discrete menu keypress. Used by front-ends only.
    #[serde(with = "millis")]
    pub menu_debounce: Duration,

    /// Symbol a collected gold cell turns into when its trigger names none.
    pub trigger_replacement: char,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            jumping_max_frame: DEFAULT_JUMPING_MAX_FRAME,
            menu_debounce: Duration::from_millis(DEFAULT_MENU_DEBOUNCE_MS),
            trigger_replacement: ' ',
        }
    }
}

impl GameConfig {
    /// Create config from defaults overlaid with environment variables.
    ///
    /// Reads `PLATFORMER_FRAME_RATE`, `PLATFORMER_JUMP_FRAMES` and
    /// `PLATFORMER_MENU_DEBOUNCE_MS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("PLATFORMER_FRAME_RATE") {
            config.frame_rate = parse_value("PLATFORMER_FRAME_RATE", &raw)
                .filter(|rate: &f64| interval_for(*rate).is_some())
                .ok_or(ConfigError::InvalidValue { key: "PLATFORMER_FRAME_RATE", value: raw })?;
        }

        if let Some(raw) = lookup("PLATFORMER_JUMP_FRAMES") {
            config.jumping_max_frame = parse_value("PLATFORMER_JUMP_FRAMES", &raw)
                .ok_or(ConfigError::InvalidValue { key: "PLATFORMER_JUMP_FRAMES", value: raw })?;
        }

        if let Some(raw) = lookup("PLATFORMER_MENU_DEBOUNCE_MS") {
            let ms: u64 = parse_value("PLATFORMER_MENU_DEBOUNCE_MS", &raw)
                .ok_or(ConfigError::InvalidValue { key: "PLATFORMER_MENU_DEBOUNCE_MS", value: raw })?;
            config.menu_debounce = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Wall-clock time between ticks.
    ///
    /// Rates with no representable interval fall back to one tick per second.
    pub fn tick_interval(&self) -> Duration {
        interval_for(self.frame_rate).unwrap_or(Duration::from_secs(1))
    }
}

/// Interval of one tick at `frame_rate`, if it fits in a `Duration`.
fn interval_for(frame_rate: f64) -> Option<Duration> {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Duration::try_from_secs_f64(1.0 / frame_rate).ok()
    } else {
        None
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!("Unparsable {}={:?}", key, raw);
    }
    parsed
}

mod millis {
    use std::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
