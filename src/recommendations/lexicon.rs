//! Keyword tables for the text scorer. Matching is by lower-case substring,
//! so every entry must itself be lower-case.

/// Words that signal stress or low mood.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "stress",
    "stressed",
    "anxious",
    "anxiety",
    "overwhelm",
    "overwhelmed",
    "burnout",
    "burned out",
    "tired",
    "exhausted",
    "panic",
    "worried",
    "pressure",
    "fear",
    "nervous",
    "sad",
    "low",
    "down",
];

/// Words that signal positive momentum.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "grateful",
    "gratitude",
    "calm",
    "focus",
    "focused",
    "happy",
    "good",
    "win",
    "progress",
    "energy",
    "motivated",
];
