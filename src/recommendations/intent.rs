use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ENTERTAINMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"movie|film|watch|series|anime").unwrap());
static MUSIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"music|song|listen|playlist|lofi|lo-?fi").unwrap());
static OUTDOOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"walk|outside|fresh air|sunlight|stroll|stretch").unwrap());
static GAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"game|play|mini-?game|fun").unwrap());
static EXAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"exam|test|study|assignment|deadline").unwrap());
static SLEEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"sleep|insomnia|bed|night|rest").unwrap());
static FOCUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"focus|concentrat|distract|procrastinat").unwrap());
static LONELINESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"alone|lonely|isolat|no one").unwrap());
static BURNOUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"burnout|burned out|exhaust|tired|drained").unwrap());

/// Topics and activity requests found in the student's live input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentFlags {
    pub entertainment: bool,
    pub music: bool,
    pub outdoor: bool,
    pub game: bool,
    pub exam: bool,
    pub sleep: bool,
    pub focus: bool,
    pub loneliness: bool,
    pub burnout: bool,
}

impl IntentFlags {
    pub fn any(&self) -> bool {
        *self != IntentFlags::default()
    }
}

/// Only live input carries intent; history never does.
pub fn detect_intents(live_text: Option<&str>) -> IntentFlags {
    let Some(text) = live_text else {
        return IntentFlags::default();
    };

    let text = text.to_lowercase();
    IntentFlags {
        entertainment: ENTERTAINMENT.is_match(&text),
        music: MUSIC.is_match(&text),
        outdoor: OUTDOOR.is_match(&text),
        game: GAME.is_match(&text),
        exam: EXAM.is_match(&text),
        sleep: SLEEP.is_match(&text),
        focus: FOCUS.is_match(&text),
        loneliness: LONELINESS.is_match(&text),
        burnout: BURNOUT.is_match(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_live_text_means_no_intent() {
        assert!(!detect_intents(None).any());
        assert!(!detect_intents(Some("")).any());
    }

    #[test]
    fn exam_and_sleep_fire_together() {
        let flags = detect_intents(Some("I'm so stressed about my exam and can't sleep"));
        assert!(flags.exam);
        assert!(flags.sleep);
        assert!(!flags.music);
        assert!(!flags.entertainment);
        assert!(!flags.game);
        assert!(!flags.burnout);
        assert!(flags.any());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let flags = detect_intents(Some("Want to WATCH an Anime"));
        assert!(flags.entertainment);
    }

    #[test]
    fn hyphenated_spellings_match() {
        assert!(detect_intents(Some("some lo-fi beats")).music);
        assert!(detect_intents(Some("a quick mini-game")).game);
    }

    #[test]
    fn topic_stems_match_inflections() {
        let flags = detect_intents(Some("I keep procrastinating and feel isolated and drained"));
        assert!(flags.focus);
        assert!(flags.loneliness);
        assert!(flags.burnout);
    }

    #[test]
    fn outdoor_request() {
        let flags = detect_intents(Some("maybe a stroll for some fresh air"));
        assert!(flags.outdoor);
        assert!(!flags.exam);
    }
}
