pub mod cli;
pub mod commands;
pub mod db;
pub mod insights;
pub mod recommendations;
pub mod settings;
pub mod utils;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use db::Database;
use settings::SettingsStore;

const DATABASE_FILE: &str = "kai.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

pub struct AppState {
    pub db: Database,
    pub settings: SettingsStore,
}

impl AppState {
    /// Open (creating if needed) the database and settings under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

        let db = Database::new(data_dir.join(DATABASE_FILE))?;
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
        Ok(Self { db, settings })
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    log::debug!("Kai starting up with data dir {}", cli.data_dir.display());

    let state = AppState::open(&cli.data_dir)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let output = runtime.block_on(cli::dispatch(&state, cli.command))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
