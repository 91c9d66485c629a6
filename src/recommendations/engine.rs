use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::recommendations::{
    assembler::assemble,
    catalog::{self, Recommendation},
    config::RecommendationConfig,
    intent::detect_intents,
    signals::{aggregate, History, Signal},
    tier::{classify, needs_encouragement, StressTier},
};
use crate::{log_debug, log_info};

const ENABLE_LOGS: bool = true;

/// Authenticated caller as resolved upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub subject: String,
    /// Contact key used to find the stored profile.
    pub email: Option<String>,
}

/// Which branch produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationPath {
    Anonymous,
    NoContactKey,
    UnknownProfile,
    Personalized {
        tier: StressTier,
        encouragement: bool,
    },
}

#[derive(Debug, Clone)]
pub struct RecommendationOutcome {
    pub path: RecommendationPath,
    /// Present on the personalized path only.
    pub signal: Option<Signal>,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationOutcome {
    fn fixed(path: RecommendationPath, pool: &catalog::RecommendationPool) -> Self {
        Self {
            path,
            signal: None,
            recommendations: pool.items.to_vec(),
        }
    }
}

/// Suggestions for the caller, shuffled with a fresh entropy-seeded RNG.
pub async fn get_personalized_recommendations(
    db: &Database,
    config: &RecommendationConfig,
    identity: Option<&Identity>,
    user_text: Option<&str>,
) -> Result<Vec<Recommendation>> {
    let mut rng = StdRng::from_entropy();
    let outcome = recommend(db, config, identity, user_text, &mut rng).await?;
    Ok(outcome.recommendations)
}

/// Resolve the caller, score their history and assemble suggestions.
///
/// Missing identity, missing contact key and unknown profile each return
/// their own fixed list. Any storage error fails the whole call.
pub async fn recommend<R: Rng + Send + ?Sized>(
    db: &Database,
    config: &RecommendationConfig,
    identity: Option<&Identity>,
    user_text: Option<&str>,
    rng: &mut R,
) -> Result<RecommendationOutcome> {
    let Some(identity) = identity else {
        log_info!("No identity; returning anonymous suggestions");
        return Ok(RecommendationOutcome::fixed(
            RecommendationPath::Anonymous,
            &catalog::ANONYMOUS,
        ));
    };

    let contact_key = identity.email.as_deref().filter(|e| !e.trim().is_empty());
    let Some(email) = contact_key else {
        log_info!("Identity {} has no contact key", identity.subject);
        return Ok(RecommendationOutcome::fixed(
            RecommendationPath::NoContactKey,
            &catalog::NO_CONTACT_KEY,
        ));
    };

    let Some(user) = db.find_user_by_email(email).await? else {
        log_info!("No profile for identity {}", identity.subject);
        return Ok(RecommendationOutcome::fixed(
            RecommendationPath::UnknownProfile,
            &catalog::UNKNOWN_PROFILE,
        ));
    };

    let history = History::load(db, &user.id, config).await?;
    let units = history.text_units(user_text);
    let signal = aggregate(&units, &history.mood_labels, config.mood_limit);

    let tier = classify(signal.stress_score, signal.average_mood);
    let encouragement = needs_encouragement(signal.positivity_score);
    let intents = detect_intents(user_text);

    log_debug!(
        "User {}: {} text units, stress={}, positivity={}, mood={:.2}, tier={}",
        user.id,
        units.len(),
        signal.stress_score,
        signal.positivity_score,
        signal.average_mood,
        tier.as_str()
    );
    if intents.any() {
        log_debug!("Live input intents: {:?}", intents);
    }

    let recommendations = assemble(tier, encouragement, &intents, config, rng);

    Ok(RecommendationOutcome {
        path: RecommendationPath::Personalized {
            tier,
            encouragement,
        },
        signal: Some(signal),
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::open_with_user;
    use crate::db::{Journal, JournalType, Mood, MoodLabel};

    fn identity(email: Option<&str>) -> Identity {
        Identity {
            subject: "subject-1".to_string(),
            email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn unresolved_paths_return_their_fixed_lists() {
        let (_dir, db, _user) = open_with_user("ada@uni.edu").await;
        let config = RecommendationConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        let anonymous = recommend(&db, &config, None, Some("stressed"), &mut rng)
            .await
            .unwrap();
        assert_eq!(anonymous.path, RecommendationPath::Anonymous);
        assert_eq!(anonymous.recommendations, catalog::ANONYMOUS.items);

        let no_key = recommend(&db, &config, Some(&identity(None)), None, &mut rng)
            .await
            .unwrap();
        assert_eq!(no_key.path, RecommendationPath::NoContactKey);
        assert_eq!(no_key.recommendations, catalog::NO_CONTACT_KEY.items);

        let stranger = identity(Some("stranger@uni.edu"));
        let unknown = recommend(&db, &config, Some(&stranger), None, &mut rng)
            .await
            .unwrap();
        assert_eq!(unknown.path, RecommendationPath::UnknownProfile);
        assert_eq!(unknown.recommendations, catalog::UNKNOWN_PROFILE.items);
        assert!(unknown.signal.is_none());
    }

    #[tokio::test]
    async fn blank_contact_key_counts_as_missing() {
        let (_dir, db, _user) = open_with_user("ada@uni.edu").await;
        let config = RecommendationConfig::default();
        let mut rng = StdRng::seed_from_u64(4);

        for blank in ["", "   "] {
            let outcome = recommend(&db, &config, Some(&identity(Some(blank))), None, &mut rng)
                .await
                .unwrap();
            assert_eq!(outcome.path, RecommendationPath::NoContactKey);
            assert_eq!(outcome.recommendations, catalog::NO_CONTACT_KEY.items);
        }
    }

    #[tokio::test]
    async fn empty_history_is_medium_tier_with_nudge() {
        let (_dir, db, _user) = open_with_user("ada@uni.edu").await;
        let me = identity(Some("ada@uni.edu"));
        let mut rng = StdRng::seed_from_u64(11);

        let outcome = recommend(&db, &RecommendationConfig::default(), Some(&me), None, &mut rng)
            .await
            .unwrap();
        assert_eq!(
            outcome.path,
            RecommendationPath::Personalized {
                tier: StressTier::Medium,
                encouragement: true,
            }
        );
        let signal = outcome.signal.unwrap();
        assert_eq!(signal.stress_score, 0);
        assert_eq!(signal.average_mood, 3.0);
        assert_eq!(outcome.recommendations.len(), 6);
    }

    #[tokio::test]
    async fn history_drives_the_tier() {
        let (_dir, db, user) = open_with_user("ada@uni.edu").await;
        for _ in 0..3 {
            db.insert_mood(&Mood::new(&user.id, MoodLabel::Excellent, 7, "manual"))
                .await
                .unwrap();
        }
        db.insert_journal(&Journal::new(
            &user.id,
            "Good day",
            "Grateful and focused, real progress",
            JournalType::Private,
        ))
        .await
        .unwrap();

        let me = identity(Some("ada@uni.edu"));
        let mut rng = StdRng::seed_from_u64(2);
        let calm = recommend(&db, &RecommendationConfig::default(), Some(&me), None, &mut rng)
            .await
            .unwrap();
        assert_eq!(
            calm.path,
            RecommendationPath::Personalized {
                tier: StressTier::Low,
                encouragement: false,
            }
        );

        let stressed = recommend(
            &db,
            &RecommendationConfig::default(),
            Some(&me),
            Some("anxious, overwhelmed and in a panic"),
            &mut rng,
        )
        .await
        .unwrap();
        assert!(matches!(
            stressed.path,
            RecommendationPath::Personalized {
                tier: StressTier::High,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn storage_failure_fails_the_call() {
        let (_dir, db, _user) = open_with_user("ada@uni.edu").await;
        db.execute(|conn| {
            conn.execute_batch("DROP TABLE journals;")?;
            Ok(())
        })
        .await
        .unwrap();

        let me = identity(Some("ada@uni.edu"));
        let result = get_personalized_recommendations(
            &db,
            &RecommendationConfig::default(),
            Some(&me),
            Some("tired"),
        )
        .await;
        assert!(result.is_err());
    }
}
