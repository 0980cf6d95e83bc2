//! Game constants, overridable from a JSON object passed in by the page.

use crate::error::ConfigError;

pub const DEFAULT_ROUND_COUNT: usize = 4;
pub const DEFAULT_COUNTDOWN_SECS: u32 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct GameConfig {
    /// Rounds per session (truncated to the catalog size).
    pub round_count: usize,
    /// Seconds the player gets per drawing.
    pub countdown_secs: u32,
    /// Speak hints and results through speech synthesis.
    pub narrate: bool,
    /// Fixed shuffle seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_count: DEFAULT_ROUND_COUNT,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            narrate: true,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_count == 0 {
            return Err(ConfigError::Invalid("round_count must be at least 1"));
        }
        if self.countdown_secs == 0 {
            return Err(ConfigError::Invalid("countdown_secs must be at least 1"));
        }
        Ok(())
    }

    /// Parse and validate; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_game_constants() {
        let c = GameConfig::default();
        assert_eq!(c.round_count, 4);
        assert_eq!(c.countdown_secs, 30);
        assert!(c.narrate);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_values_are_rejected() {
        let c = GameConfig {
            round_count: 0,
            ..GameConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));
        let c = GameConfig {
            countdown_secs: 0,
            ..GameConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_overrides_only_given_fields() {
        let c = GameConfig::from_json(r#"{ "countdown_secs": 10, "seed": 9 }"#).unwrap();
        assert_eq!(c.countdown_secs, 10);
        assert_eq!(c.seed, Some(9));
        assert_eq!(c.round_count, 4);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_errors_surface() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "round_count": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(GameConfig::from_json(r#"{ "rounds": 3 }"#).is_err());
    }
}
