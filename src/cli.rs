use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::{
    commands::{self, MoodInput},
    db::{
        ActivityInput, ActivityMetadata, ActivityType, JournalInput, JournalType, MessageRole,
        MoodLabel,
    },
    recommendations::{Identity, RecommendationConfig},
    AppState,
};

#[derive(Parser, Debug)]
#[command(name = "kai", about = "Wellness companion for students")]
#[command(version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the database and settings
    #[arg(long, global = true, default_value = "./kai-data")]
    pub data_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Personalized wellness suggestions
    Recommend(RecommendArgs),
    /// Register a student profile
    AddUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Record how you feel
    LogMood(LogMoodArgs),
    /// Recent moods, newest first
    Moods {
        #[arg(long)]
        email: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Journal entries
    Journal(JournalArgs),
    /// Conversations with Kai
    Chat(ChatArgs),
    /// Breathing, meditation and other wellness sessions
    Activity(ActivityArgs),
    /// Mood trend over recent days
    Trends {
        #[arg(long)]
        email: String,
        #[arg(long)]
        days: Option<i64>,
    },
    /// Streaks of low moods
    Patterns {
        #[arg(long)]
        email: String,
    },
    /// Show or change recommendation settings
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Subject of the authenticated identity
    #[arg(long)]
    pub subject: Option<String>,
    /// Contact key of the authenticated identity
    #[arg(long)]
    pub email: Option<String>,
    /// What's on your mind right now
    pub text: Option<String>,
}

impl RecommendArgs {
    /// No flags at all is an anonymous caller.
    fn identity(&self) -> Option<Identity> {
        if self.subject.is_none() && self.email.is_none() {
            return None;
        }
        let subject = self
            .subject
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_default();
        Some(Identity {
            subject,
            email: self.email.clone(),
        })
    }
}

#[derive(Args, Debug)]
pub struct LogMoodArgs {
    #[arg(long)]
    pub email: String,
    /// very_low, low, neutral, good or excellent
    pub mood: MoodLabel,
    /// 1-10
    #[arg(long, default_value_t = 5)]
    pub intensity: u32,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long = "trigger")]
    pub triggers: Vec<String>,
    #[arg(long, default_value = "manual")]
    pub method: String,
}

#[derive(Args, Debug)]
pub struct JournalArgs {
    #[command(subcommand)]
    pub command: JournalCommands,
}

#[derive(Subcommand, Debug)]
pub enum JournalCommands {
    /// Write a new entry
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long = "type", default_value = "private")]
        journal_type: JournalType,
        #[arg(long)]
        mood: Option<MoodLabel>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        research_consent: Option<bool>,
    },
    /// Recent entries, newest first
    List {
        #[arg(long)]
        email: String,
        #[arg(long = "type")]
        journal_type: Option<JournalType>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Entry and word counts
    Stats {
        #[arg(long)]
        email: String,
    },
    /// Consented entries from all students, anonymized
    Research {
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct ActivityArgs {
    #[command(subcommand)]
    pub command: ActivityCommands,
}

#[derive(Subcommand, Debug)]
pub enum ActivityCommands {
    /// Record a session
    Log(LogActivityArgs),
    /// Recent sessions, newest first
    List {
        #[arg(long)]
        email: String,
        #[arg(long = "type")]
        activity_type: Option<ActivityType>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Session counts and average length
    Stats {
        #[arg(long)]
        email: String,
        #[arg(long)]
        days: Option<i64>,
    },
    /// What to try next, based on your latest mood
    Suggest {
        #[arg(long)]
        email: String,
    },
}

#[derive(Args, Debug)]
pub struct LogActivityArgs {
    #[arg(long)]
    pub email: String,
    /// breathing, meditation, journaling, music or mindfulness
    pub activity_type: ActivityType,
    /// Minutes
    #[arg(long)]
    pub duration: u32,
    /// The session was stopped early
    #[arg(long)]
    pub unfinished: bool,
    /// 1-10
    #[arg(long)]
    pub effectiveness: Option<u32>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub breathing_pattern: Option<String>,
    #[arg(long)]
    pub music_track: Option<String>,
    #[arg(long)]
    pub guided: bool,
    #[arg(long)]
    pub interruptions: Option<u32>,
}

impl LogActivityArgs {
    fn into_input(self) -> (String, ActivityInput) {
        let metadata = ActivityMetadata {
            breathing_pattern: self.breathing_pattern,
            music_track: self.music_track,
            guidance_used: self.guided.then_some(true),
            interruptions: self.interruptions,
        };
        let input = ActivityInput {
            activity_type: self.activity_type,
            duration: self.duration,
            completed: !self.unfinished,
            effectiveness: self.effectiveness,
            notes: self.notes,
            metadata: (metadata != ActivityMetadata::default()).then_some(metadata),
        };
        (self.email, input)
    }
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(subcommand)]
    pub command: ChatCommands,
}

#[derive(Subcommand, Debug)]
pub enum ChatCommands {
    /// Start a conversation; Kai greets first
    Start {
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// Append a message to a conversation
    Send {
        #[arg(long)]
        session: String,
        #[arg(long, default_value = "user")]
        role: MessageRole,
        #[arg(long)]
        emotion: Option<String>,
        content: String,
    },
    /// A conversation with its messages
    Show {
        #[arg(long)]
        session: String,
    },
    /// Recent conversations, newest first
    List {
        #[arg(long)]
        email: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[arg(long)]
    pub journal_limit: Option<usize>,
    #[arg(long)]
    pub message_cap: Option<usize>,
    #[arg(long)]
    pub messages_per_conversation: Option<usize>,
    #[arg(long)]
    pub mood_limit: Option<usize>,
    #[arg(long)]
    pub min_results: Option<usize>,
    #[arg(long)]
    pub max_results: Option<usize>,
}

impl SettingsArgs {
    fn apply(&self, mut config: RecommendationConfig) -> Option<RecommendationConfig> {
        let mut changed = false;
        let mut set = |target: &mut usize, value: Option<usize>| {
            if let Some(value) = value {
                *target = value;
                changed = true;
            }
        };
        set(&mut config.journal_limit, self.journal_limit);
        set(&mut config.message_cap, self.message_cap);
        set(
            &mut config.messages_per_conversation,
            self.messages_per_conversation,
        );
        set(&mut config.mood_limit, self.mood_limit);
        set(&mut config.min_results, self.min_results);
        set(&mut config.max_results, self.max_results);
        changed.then_some(config)
    }
}

fn to_json<T: Serialize>(result: Result<T, String>) -> Result<Value> {
    let value = result.map_err(|e| anyhow!(e))?;
    Ok(serde_json::to_value(value)?)
}

/// Run one command against the opened state and return its JSON output.
pub async fn dispatch(state: &AppState, command: Commands) -> Result<Value> {
    match command {
        Commands::Recommend(args) => {
            let identity = args.identity();
            to_json(commands::get_personalized_recommendations(state, identity, args.text).await)
        }
        Commands::AddUser { email, name } => to_json(commands::add_user(state, name, email).await),
        Commands::LogMood(args) => {
            let input = MoodInput {
                mood: args.mood,
                intensity: args.intensity,
                notes: args.notes,
                triggers: args.triggers,
                detection_method: args.method,
            };
            to_json(commands::create_mood(state, &args.email, input).await)
        }
        Commands::Moods { email, limit } => {
            to_json(commands::get_user_moods(state, &email, limit).await)
        }
        Commands::Journal(args) => match args.command {
            JournalCommands::Add {
                email,
                title,
                content,
                journal_type,
                mood,
                tags,
                research_consent,
            } => {
                let input = JournalInput {
                    title,
                    content,
                    journal_type,
                    mood,
                    tags,
                    is_encrypted: false,
                    research_consent,
                };
                to_json(commands::create_journal(state, &email, input).await)
            }
            JournalCommands::List {
                email,
                journal_type,
                limit,
            } => to_json(commands::get_user_journals(state, &email, journal_type, limit).await),
            JournalCommands::Stats { email } => {
                to_json(commands::get_journal_stats(state, &email).await)
            }
            JournalCommands::Research { limit } => {
                to_json(commands::get_research_journals(state, limit).await)
            }
        },
        Commands::Chat(args) => match args.command {
            ChatCommands::Start { email, message } => {
                to_json(commands::start_conversation(state, &email, message).await)
            }
            ChatCommands::Send {
                session,
                role,
                emotion,
                content,
            } => to_json(commands::add_message(state, &session, role, content, emotion).await),
            ChatCommands::Show { session } => {
                to_json(commands::get_conversation(state, &session).await)
            }
            ChatCommands::List { email, limit } => {
                to_json(commands::get_user_conversations(state, &email, limit).await)
            }
        },
        Commands::Activity(args) => match args.command {
            ActivityCommands::Log(args) => {
                let (email, input) = args.into_input();
                to_json(commands::create_activity(state, &email, input).await)
            }
            ActivityCommands::List {
                email,
                activity_type,
                limit,
            } => to_json(commands::get_user_activities(state, &email, activity_type, limit).await),
            ActivityCommands::Stats { email, days } => {
                to_json(commands::get_activity_stats(state, &email, days).await)
            }
            ActivityCommands::Suggest { email } => {
                to_json(commands::get_activity_recommendations(state, &email).await)
            }
        },
        Commands::Trends { email, days } => {
            to_json(commands::get_mood_trends(state, &email, days).await)
        }
        Commands::Patterns { email } => {
            to_json(commands::detect_stress_patterns(state, &email).await)
        }
        Commands::Settings(args) => {
            match args.apply(commands::get_recommendation_settings(state)) {
                Some(config) => to_json(commands::update_recommendation_settings(state, config)),
                None => to_json(Ok(commands::get_recommendation_settings(state))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kai").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn recommend_without_flags_is_anonymous() {
        let cli = parse(&["recommend", "exam tomorrow"]);
        let Commands::Recommend(args) = cli.command else {
            panic!("expected recommend");
        };
        assert!(args.identity().is_none());
        assert_eq!(args.text.as_deref(), Some("exam tomorrow"));
    }

    #[test]
    fn email_alone_doubles_as_subject() {
        let cli = parse(&["recommend", "--email", "ada@uni.edu"]);
        let Commands::Recommend(args) = cli.command else {
            panic!("expected recommend");
        };
        let identity = args.identity().unwrap();
        assert_eq!(identity.subject, "ada@uni.edu");
        assert_eq!(identity.email.as_deref(), Some("ada@uni.edu"));

        let cli = parse(&["recommend", "--subject", "auth0|1"]);
        let Commands::Recommend(args) = cli.command else {
            panic!("expected recommend");
        };
        assert!(args.identity().unwrap().email.is_none());
    }

    #[test]
    fn mood_labels_parse_from_snake_case() {
        let cli = parse(&["log-mood", "--email", "a@b.c", "very_low", "--intensity", "7"]);
        let Commands::LogMood(args) = cli.command else {
            panic!("expected log-mood");
        };
        assert_eq!(args.mood, MoodLabel::VeryLow);
        assert_eq!(args.intensity, 7);
        assert!(Cli::try_parse_from(["kai", "log-mood", "--email", "a@b.c", "meh"]).is_err());
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = parse(&["patterns", "--email", "a@b.c", "--data-dir", "/tmp/kai", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/kai"));
    }

    #[test]
    fn settings_without_flags_change_nothing() {
        let args = SettingsArgs {
            journal_limit: None,
            message_cap: None,
            messages_per_conversation: None,
            mood_limit: None,
            min_results: None,
            max_results: None,
        };
        assert!(args.apply(RecommendationConfig::default()).is_none());

        let args = SettingsArgs {
            min_results: Some(3),
            ..args
        };
        assert_eq!(args.apply(RecommendationConfig::default()).unwrap().min_results, 3);
    }

    #[test]
    fn activity_log_collects_metadata_only_when_given() {
        let cli = parse(&["activity", "log", "--email", "a@b.c", "breathing", "--duration", "5"]);
        let Commands::Activity(ActivityArgs {
            command: ActivityCommands::Log(args),
        }) = cli.command
        else {
            panic!("expected activity log");
        };
        let (email, input) = args.into_input();
        assert_eq!(email, "a@b.c");
        assert_eq!(input.activity_type, ActivityType::Breathing);
        assert!(input.completed);
        assert!(input.metadata.is_none());

        let cli = parse(&[
            "activity", "log", "--email", "a@b.c", "music", "--duration", "20", "--unfinished",
            "--music-track", "rain",
        ]);
        let Commands::Activity(ActivityArgs {
            command: ActivityCommands::Log(args),
        }) = cli.command
        else {
            panic!("expected activity log");
        };
        let (_, input) = args.into_input();
        assert!(!input.completed);
        assert_eq!(input.metadata.unwrap().music_track.as_deref(), Some("rain"));

        let unknown = ["kai", "activity", "log", "--email", "a", "yoga", "--duration", "5"];
        assert!(Cli::try_parse_from(unknown).is_err());
    }

    #[tokio::test]
    async fn dispatch_runs_activity_and_research_commands() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(dir.path()).unwrap();
        dispatch(&state, parse(&["add-user", "--email", "ada@uni.edu"]).command)
            .await
            .unwrap();
        dispatch(
            &state,
            parse(&["log-mood", "--email", "ada@uni.edu", "neutral"]).command,
        )
        .await
        .unwrap();

        let suggestions = dispatch(
            &state,
            parse(&["activity", "suggest", "--email", "ada@uni.edu"]).command,
        )
        .await
        .unwrap();
        assert_eq!(suggestions[0]["title"], "Mindful Meditation");
        assert_eq!(suggestions[1]["type"], "journaling");

        dispatch(
            &state,
            parse(&[
                "activity", "log", "--email", "ada@uni.edu", "meditation", "--duration", "10",
            ])
            .command,
        )
        .await
        .unwrap();
        let stats = dispatch(
            &state,
            parse(&["activity", "stats", "--email", "ada@uni.edu"]).command,
        )
        .await
        .unwrap();
        assert_eq!(stats["completedActivities"], 1);
        assert_eq!(stats["activityBreakdown"]["meditation"], 1);

        let feed = dispatch(&state, parse(&["journal", "research"]).command)
            .await
            .unwrap();
        assert_eq!(feed, serde_json::json!([]));
    }

    #[tokio::test]
    async fn dispatch_prints_the_anonymous_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(dir.path()).unwrap();
        let output = dispatch(&state, parse(&["recommend"]).command).await.unwrap();
        assert_eq!(output[0]["title"], "60s Box Breathing");
        assert_eq!(output[0]["durationMinutes"], 1);
    }
}
