pub mod assembler;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod intent;
pub mod lexicon;
pub mod scoring;
pub mod signals;
pub mod tier;

pub use catalog::{Category, Recommendation};
pub use config::RecommendationConfig;
pub use engine::{get_personalized_recommendations, recommend, Identity, RecommendationPath};
pub use tier::StressTier;
