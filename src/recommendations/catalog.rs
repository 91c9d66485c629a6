//! Fixed recommendation pools. Every pool is non-empty and has no duplicate
//! titles; titles may repeat across pools with different wording, and the
//! assembler keeps whichever copy it sees first.

use serde::Serialize;

use crate::recommendations::{intent::IntentFlags, tier::StressTier};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Breathing,
    Meditation,
    Journaling,
    Mindfulness,
    Music,
    Reflection,
    Grounding,
    Motivational,
    Film,
    Walk,
    Game,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: &'static str,
    pub description: &'static str,
    pub duration_minutes: u32,
    pub category: Category,
}

const fn rec(
    title: &'static str,
    description: &'static str,
    duration_minutes: u32,
    category: Category,
) -> Recommendation {
    Recommendation {
        title,
        description,
        duration_minutes,
        category,
    }
}

#[derive(Debug)]
pub struct RecommendationPool {
    pub name: &'static str,
    pub items: &'static [Recommendation],
}

pub static HIGH_STRESS: RecommendationPool = RecommendationPool {
    name: "high_stress",
    items: &[
        rec(
            "Grounding: 5-4-3-2-1",
            "Anchor in the present using senses: 5 see, 4 feel, 3 hear, 2 smell, 1 taste. Quick reset under pressure.",
            3,
            Category::Grounding,
        ),
        rec(
            "Box Breathing 60s",
            "Inhale 4, hold 4, exhale 4, hold 4. 4 cycles to downshift your nervous system.",
            1,
            Category::Breathing,
        ),
        rec(
            "Micro-Meditation (2 min)",
            "Close eyes, follow the breath gently. When distracted, kindly return attention.",
            2,
            Category::Meditation,
        ),
    ],
};

pub static MEDIUM_STRESS: RecommendationPool = RecommendationPool {
    name: "medium_stress",
    items: &[
        rec(
            "Positive Reframe",
            "Write one worry, then reframe it kindly. Focus on a tiny, doable next step.",
            3,
            Category::Reflection,
        ),
        rec(
            "3-2-1 Study Starter",
            "3 breaths, 2 minutes mindful pause, 1 intention. Start lighter and steadier.",
            3,
            Category::Mindfulness,
        ),
        rec(
            "Gentle Focus Music",
            "Low-stimulus soundscape to ease into a calm, productive state.",
            3,
            Category::Music,
        ),
    ],
};

pub static LOW_STRESS: RecommendationPool = RecommendationPool {
    name: "low_stress",
    items: &[
        rec(
            "Gratitude Trio",
            "Note three small wins or comforts today. Builds momentum and resilience.",
            2,
            Category::Journaling,
        ),
        rec(
            "Single-Task Sprint (15m)",
            "Pick one small, finishable task. Short, focused burst to keep your rhythm.",
            15,
            Category::Mindfulness,
        ),
        rec(
            "Breathing Pause (60s)",
            "One minute of paced breathing to maintain your steady state.",
            1,
            Category::Breathing,
        ),
    ],
};

pub static MOTIVATIONAL_NUDGE: Recommendation = rec(
    "Motivational Nudge",
    "Progress over perfection. One tiny, kind step is enough right now.",
    1,
    Category::Motivational,
);

pub static FILM: RecommendationPool = RecommendationPool {
    name: "film",
    items: &[
        rec(
            "Feel-Good Film Break",
            "Pick a gentle, uplifting movie (e.g., Paddington 2, Soul, The Secret Life of Walter Mitty). Set a 90-120m window max.",
            100,
            Category::Film,
        ),
        rec(
            "Short Series Reset",
            "Watch one light episode (20-30m) then return. Keeps it restorative, not avoidant.",
            25,
            Category::Film,
        ),
    ],
};

/// Serves both music requests and focus trouble.
pub static MUSIC: RecommendationPool = RecommendationPool {
    name: "music",
    items: &[
        rec(
            "Lofi Focus Mix (15m)",
            "Low-stimulus playlist to settle attention. Headphones, moderate volume, one small task.",
            15,
            Category::Music,
        ),
        rec(
            "Mood Uplift Tracks (5-10m)",
            "Play 2-3 upbeat songs you associate with small wins to nudge momentum.",
            8,
            Category::Music,
        ),
    ],
};

/// Serves both outdoor requests and burnout.
pub static WALK: RecommendationPool = RecommendationPool {
    name: "walk",
    items: &[
        rec(
            "Sunlight Walk (10m)",
            "Go outside for fresh air and gentle sunlight. Look far, relax shoulders, breathe slowly.",
            10,
            Category::Walk,
        ),
        rec(
            "Stretch & Sip (5m)",
            "Light stretches plus a hydration break. Calm the body before the next step.",
            5,
            Category::Walk,
        ),
    ],
};

pub static GAME: RecommendationPool = RecommendationPool {
    name: "game",
    items: &[
        rec(
            "Quick Breathing Game (60s)",
            "Follow a paced inhale/exhale rhythm like a mini game. Aim for 4 calm cycles.",
            1,
            Category::Game,
        ),
        rec(
            "5-4-3-2-1 Senses Challenge",
            "Name 5 see, 4 feel, 3 hear, 2 smell, 1 taste. Turn grounding into a quick win.",
            3,
            Category::Game,
        ),
    ],
};

pub static EXAM: RecommendationPool = RecommendationPool {
    name: "exam",
    items: &[rec(
        "3-2-1 Study Starter",
        "3 breaths, 2 minutes mindful pause, 1 clear intention. Start lighter and steadier.",
        3,
        Category::Mindfulness,
    )],
};

pub static SLEEP: RecommendationPool = RecommendationPool {
    name: "sleep",
    items: &[rec(
        "Sleep Wind-Down (10m)",
        "Dim lights, stretch 2m, hydrate, jot a 3-item plan for tomorrow. Signal your brain it's bedtime.",
        10,
        Category::Mindfulness,
    )],
};

pub static LONELINESS: RecommendationPool = RecommendationPool {
    name: "loneliness",
    items: &[rec(
        "Micro-Connection (3m)",
        "Send a supportive note or thank someone specifically. A small social dose reduces stress.",
        3,
        Category::Reflection,
    )],
};

/// Used to top up short results.
pub static FALLBACK: RecommendationPool = RecommendationPool {
    name: "fallback",
    items: &[
        rec(
            "Calm Reset (2 min)",
            "Sit comfortably, soften shoulders, follow the breath. Let thoughts pass.",
            2,
            Category::Meditation,
        ),
        rec(
            "Gratitude Trio",
            "Note 3 small wins or comforts today to gently lift mood.",
            2,
            Category::Journaling,
        ),
        rec(
            "Breathing Pause (60s)",
            "Inhale 4, hold 4, exhale 6. Repeat to downshift tension quickly.",
            1,
            Category::Breathing,
        ),
    ],
};

/// Returned when the caller has no identity at all.
pub static ANONYMOUS: RecommendationPool = RecommendationPool {
    name: "anonymous",
    items: &[
        rec(
            "60s Box Breathing",
            "A short-paced breath to reset tension: inhale 4, hold 4, exhale 4, hold 4. Repeat for 60s.",
            1,
            Category::Breathing,
        ),
        rec(
            "3-2-1 Pre-Study Calm",
            "3 deep breaths, 2 minutes of mindful pause, 1 intention for your next task.",
            3,
            Category::Mindfulness,
        ),
        rec(
            "Gratitude Trio",
            "List 3 small things you appreciated today to nudge your mood upward.",
            2,
            Category::Journaling,
        ),
    ],
};

/// Returned when the identity carries no contact key to look a profile up by.
pub static NO_CONTACT_KEY: RecommendationPool = RecommendationPool {
    name: "no_contact_key",
    items: &[
        rec(
            "Grounding: 5-4-3-2-1",
            "Use your senses to anchor in the present: 5 see, 4 feel, 3 hear, 2 smell, 1 taste.",
            3,
            Category::Grounding,
        ),
        rec(
            "Gentle Focus Music",
            "A short calming soundscape to ease into steady attention.",
            2,
            Category::Music,
        ),
        rec(
            "Positive Reframe",
            "Write one current worry, then reframe it into a kinder, more helpful perspective.",
            3,
            Category::Reflection,
        ),
    ],
};

/// Returned when the contact key matches no stored profile.
pub static UNKNOWN_PROFILE: RecommendationPool = RecommendationPool {
    name: "unknown_profile",
    items: &[
        rec(
            "60s Breathing",
            "A minute of paced breathing lowers stress and calms the nervous system.",
            1,
            Category::Breathing,
        ),
        rec(
            "Micro-Meditation",
            "Close your eyes, follow your breath for 2 minutes. Reset before your next step.",
            2,
            Category::Meditation,
        ),
        rec(
            "Gratitude Trio",
            "Note 3 small wins or comforts. Small positives compound into momentum.",
            2,
            Category::Journaling,
        ),
    ],
};

pub fn tier_pool(tier: StressTier) -> &'static RecommendationPool {
    match tier {
        StressTier::High => &HIGH_STRESS,
        StressTier::Medium => &MEDIUM_STRESS,
        StressTier::Low => &LOW_STRESS,
    }
}

/// Pools for the active intents, in merge priority order. Flags that share a
/// pool contribute it once.
pub fn intent_pools(intents: &IntentFlags) -> Vec<&'static RecommendationPool> {
    let mut pools = Vec::new();
    if intents.entertainment {
        pools.push(&FILM);
    }
    if intents.music || intents.focus {
        pools.push(&MUSIC);
    }
    if intents.outdoor || intents.burnout {
        pools.push(&WALK);
    }
    if intents.game {
        pools.push(&GAME);
    }
    if intents.exam {
        pools.push(&EXAM);
    }
    if intents.sleep {
        pools.push(&SLEEP);
    }
    if intents.loneliness {
        pools.push(&LONELINESS);
    }
    pools
}
