use serde::Serialize;

/// Stress score at which the high tier applies regardless of mood.
const HIGH_STRESS_SCORE: u32 = 6;
/// Average mood at or below which the high tier applies.
const HIGH_STRESS_MOOD: f64 = 2.2;
const MEDIUM_STRESS_SCORE: u32 = 3;
/// Average mood strictly below which the medium tier applies.
const MEDIUM_STRESS_MOOD: f64 = 3.2;
/// Positivity strictly below this asks for a motivational nudge.
const ENCOURAGEMENT_POSITIVITY: u32 = 2;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StressTier {
    High,
    Medium,
    Low,
}

impl StressTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            StressTier::High => "high",
            StressTier::Medium => "medium",
            StressTier::Low => "low",
        }
    }
}

pub fn classify(stress_score: u32, average_mood: f64) -> StressTier {
    if stress_score >= HIGH_STRESS_SCORE || average_mood <= HIGH_STRESS_MOOD {
        StressTier::High
    } else if stress_score >= MEDIUM_STRESS_SCORE || average_mood < MEDIUM_STRESS_MOOD {
        StressTier::Medium
    } else {
        StressTier::Low
    }
}

pub fn needs_encouragement(positivity_score: u32) -> bool {
    positivity_score < ENCOURAGEMENT_POSITIVITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stress_score_alone_reaches_high() {
        assert_eq!(classify(6, 5.0), StressTier::High);
        assert_eq!(classify(5, 5.0), StressTier::Medium);
    }

    #[test]
    fn low_mood_alone_reaches_high() {
        assert_eq!(classify(5, 2.2), StressTier::High);
        assert_eq!(classify(0, 2.21), StressTier::Medium);
    }

    #[test]
    fn medium_boundaries() {
        assert_eq!(classify(3, 2.5), StressTier::Medium);
        assert_eq!(classify(3, 4.0), StressTier::Medium);
        assert_eq!(classify(2, 3.19), StressTier::Medium);
        assert_eq!(classify(2, 3.2), StressTier::Low);
    }

    #[test]
    fn calm_history_is_low() {
        assert_eq!(classify(2, 3.5), StressTier::Low);
        assert_eq!(classify(0, 5.0), StressTier::Low);
    }

    #[test]
    fn neutral_default_mood_is_medium() {
        // A user with no mood history averages exactly 3.0.
        assert_eq!(classify(0, 3.0), StressTier::Medium);
    }

    #[test]
    fn encouragement_is_independent_of_tier() {
        assert!(needs_encouragement(0));
        assert!(needs_encouragement(1));
        assert!(!needs_encouragement(2));
    }
}
