use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Hard ceiling on how many suggestions a response may carry.
pub const MAX_RESULTS_CEILING: usize = 6;
/// Smallest minimum a response may be topped up to.
pub const MIN_RESULTS_FLOOR: usize = 3;

/// History limits and result sizing for the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecommendationConfig {
    /// Most recent journal entries scored per request
    pub journal_limit: usize,

    /// Approximate cap on conversation messages scored per request
    pub message_cap: usize,

    /// Messages taken from the end of each conversation
    pub messages_per_conversation: usize,

    /// Most recent mood samples averaged per request
    pub mood_limit: usize,

    /// Results are topped up from the fallback pool to this many
    pub min_results: usize,
    pub max_results: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            journal_limit: 20,
            message_cap: 300,
            messages_per_conversation: 10,
            mood_limit: 30,
            min_results: 6,
            max_results: MAX_RESULTS_CEILING,
        }
    }
}

impl RecommendationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.journal_limit == 0
            || self.message_cap == 0
            || self.messages_per_conversation == 0
            || self.mood_limit == 0
        {
            bail!("history limits must be greater than zero");
        }
        if self.max_results > MAX_RESULTS_CEILING {
            bail!("max_results cannot exceed {MAX_RESULTS_CEILING}");
        }
        if self.min_results < MIN_RESULTS_FLOOR || self.min_results > self.max_results {
            bail!(
                "min_results must be between {MIN_RESULTS_FLOOR} and max_results ({})",
                self.max_results
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RecommendationConfig::default().validate().is_ok());
    }

    #[test]
    fn conservative_variant_is_valid() {
        let config = RecommendationConfig {
            min_results: 3,
            ..RecommendationConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_sizes() {
        let too_small = RecommendationConfig {
            min_results: 2,
            ..RecommendationConfig::default()
        };
        assert!(too_small.validate().is_err());

        let inverted = RecommendationConfig {
            min_results: 6,
            max_results: 5,
            ..RecommendationConfig::default()
        };
        assert!(inverted.validate().is_err());

        let no_moods = RecommendationConfig {
            mood_limit: 0,
            ..RecommendationConfig::default()
        };
        assert!(no_moods.validate().is_err());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: RecommendationConfig = serde_json::from_str(r#"{"moodLimit": 10}"#).unwrap();
        assert_eq!(config.mood_limit, 10);
        assert_eq!(config.journal_limit, 20);
    }
}
