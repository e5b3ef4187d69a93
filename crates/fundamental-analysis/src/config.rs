use screener_core::ScreenerError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_SCORE: i32 = 60;

/// Engine knobs, validated once and passed into the engine by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum total score (0-100) for a passing verdict
    pub min_score: i32,
    /// Fail tickers with 3 or more undeterminable hard filters
    pub strict: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            strict: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ScreenerError> {
        if !(0..=100).contains(&self.min_score) {
            return Err(ScreenerError::InvalidConfig(format!(
                "min_score must be within 0..=100, got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.min_score, 60);
        assert!(!config.strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_min_score() {
        let negative = EngineConfig { min_score: -1, strict: false };
        assert!(matches!(negative.validate(), Err(ScreenerError::InvalidConfig(_))));

        let too_high = EngineConfig { min_score: 101, strict: true };
        assert!(too_high.validate().is_err());

        let edge = EngineConfig { min_score: 100, strict: false };
        assert!(edge.validate().is_ok());
    }
}
