use std::collections::HashSet;

use kai_lib::{
    commands::{self, MoodInput},
    db::{JournalInput, JournalType, MoodLabel},
    recommendations::{catalog, Identity, Recommendation, RecommendationConfig},
    AppState,
};

const EMAIL: &str = "ada@uni.edu";

async fn state_with_student() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::open(dir.path()).unwrap();
    commands::add_user(&state, Some("Ada".to_string()), EMAIL.to_string())
        .await
        .unwrap();
    (dir, state)
}

fn student() -> Option<Identity> {
    Some(Identity {
        subject: "auth|ada".to_string(),
        email: Some(EMAIL.to_string()),
    })
}

fn titles(items: &[Recommendation]) -> HashSet<&'static str> {
    items.iter().map(|r| r.title).collect()
}

#[tokio::test]
async fn exam_and_sleep_worries_get_both_suggestions() {
    let (_dir, state) = state_with_student().await;

    let items = commands::get_personalized_recommendations(
        &state,
        student(),
        Some("Big exam tomorrow and I can't sleep".to_string()),
    )
    .await
    .unwrap();

    let expected: HashSet<&str> = [
        "3-2-1 Study Starter",
        "Sleep Wind-Down (10m)",
        "Positive Reframe",
        "Gentle Focus Music",
        "Motivational Nudge",
        "Calm Reset (2 min)",
    ]
    .into_iter()
    .collect();
    assert_eq!(items.len(), 6);
    assert_eq!(titles(&items), expected);
}

#[tokio::test]
async fn anonymous_callers_get_the_fixed_list_in_order() {
    let (_dir, state) = state_with_student().await;

    let items = commands::get_personalized_recommendations(&state, None, Some("stressed".into()))
        .await
        .unwrap();
    assert_eq!(items, catalog::ANONYMOUS.items);
}

#[tokio::test]
async fn unknown_and_keyless_identities_get_their_own_lists() {
    let (_dir, state) = state_with_student().await;

    let keyless = Identity {
        subject: "auth|ghost".to_string(),
        email: None,
    };
    let items = commands::get_personalized_recommendations(&state, Some(keyless), None)
        .await
        .unwrap();
    assert_eq!(items, catalog::NO_CONTACT_KEY.items);

    let stranger = Identity {
        subject: "auth|stranger".to_string(),
        email: Some("stranger@uni.edu".to_string()),
    };
    let items = commands::get_personalized_recommendations(&state, Some(stranger), None)
        .await
        .unwrap();
    assert_eq!(items, catalog::UNKNOWN_PROFILE.items);
}

#[tokio::test]
async fn stressful_history_and_text_reach_the_high_tier() {
    let (_dir, state) = state_with_student().await;
    for _ in 0..4 {
        commands::create_mood(
            &state,
            EMAIL,
            MoodInput {
                mood: MoodLabel::VeryLow,
                intensity: 9,
                notes: None,
                triggers: Vec::new(),
                detection_method: "manual".to_string(),
            },
        )
        .await
        .unwrap();
    }
    commands::create_journal(
        &state,
        EMAIL,
        JournalInput {
            title: "Rough week".to_string(),
            content: "So much pressure, I feel anxious and exhausted".to_string(),
            journal_type: JournalType::Private,
            mood: Some(MoodLabel::VeryLow),
            tags: Vec::new(),
            is_encrypted: false,
            research_consent: None,
        },
    )
    .await
    .unwrap();

    let items = commands::get_personalized_recommendations(
        &state,
        student(),
        Some("overwhelmed".to_string()),
    )
    .await
    .unwrap();

    let got = titles(&items);
    assert_eq!(items.len(), 6);
    for item in catalog::HIGH_STRESS.items {
        assert!(got.contains(item.title), "missing {}", item.title);
    }
    assert!(got.contains("Motivational Nudge"));
}

#[tokio::test]
async fn results_stay_within_bounds_and_unique() {
    let (_dir, state) = state_with_student().await;
    let texts = [
        None,
        Some("want to watch a movie and listen to music"),
        Some("tired, lonely, need a walk and a game"),
        Some("focused and grateful, good progress today"),
    ];

    for min_results in [3, 6] {
        let config = RecommendationConfig {
            min_results,
            ..commands::get_recommendation_settings(&state)
        };
        commands::update_recommendation_settings(&state, config).unwrap();

        for text in texts {
            let items = commands::get_personalized_recommendations(
                &state,
                student(),
                text.map(str::to_string),
            )
            .await
            .unwrap();
            assert!((min_results..=6).contains(&items.len()), "{text:?}");
            assert_eq!(titles(&items).len(), items.len(), "{text:?}");
        }
    }
}

#[tokio::test]
async fn blank_emails_never_resolve_a_profile() {
    let (_dir, state) = state_with_student().await;

    assert!(commands::add_user(&state, None, String::new()).await.is_err());
    assert!(commands::add_user(&state, None, "  ".to_string()).await.is_err());

    for email in ["", "   "] {
        let blank = Identity {
            subject: "auth|blank".to_string(),
            email: Some(email.to_string()),
        };
        let items = commands::get_personalized_recommendations(&state, Some(blank), None)
            .await
            .unwrap();
        assert_eq!(items, catalog::NO_CONTACT_KEY.items, "{email:?}");
    }
}
