use std::ops::AddAssign;

use serde::Serialize;

use crate::db::MoodLabel;
use crate::recommendations::lexicon::{NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS};

/// Mood used when there are no samples or a label is not recognized.
pub const NEUTRAL_MOOD: f64 = 3.0;

/// Keyword hits for one piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextScore {
    pub stress: u32,
    pub positivity: u32,
}

impl AddAssign for TextScore {
    fn add_assign(&mut self, other: Self) {
        self.stress += other.stress;
        self.positivity += other.positivity;
    }
}

/// Count how many lexicon keywords appear in `text`. Each keyword scores at
/// most once, however often it occurs.
pub fn score_text(text: &str) -> TextScore {
    if text.trim().is_empty() {
        return TextScore::default();
    }

    let lowered = text.to_lowercase();
    TextScore {
        stress: count_present(&lowered, NEGATIVE_KEYWORDS),
        positivity: count_present(&lowered, POSITIVE_KEYWORDS),
    }
}

fn count_present(text: &str, keywords: &[&str]) -> u32 {
    keywords.iter().filter(|k| text.contains(*k)).count() as u32
}

/// Map a stored mood label onto the 1-5 scale; unknown labels are neutral.
pub fn mood_value(label: &str) -> f64 {
    label
        .parse::<MoodLabel>()
        .map(|m| f64::from(m.ordinal()))
        .unwrap_or(NEUTRAL_MOOD)
}

/// Mean mood over at most the first `limit` labels (callers pass them newest
/// first). Exactly [`NEUTRAL_MOOD`] when there are none.
pub fn average_mood<S: AsRef<str>>(labels: &[S], limit: usize) -> f64 {
    let window = &labels[..labels.len().min(limit)];
    if window.is_empty() {
        return NEUTRAL_MOOD;
    }

    let sum: f64 = window.iter().map(|l| mood_value(l.as_ref())).sum();
    sum / window.len() as f64
}
