//! CLI entry point for Profeshare.
//!
//! This binary provides the `profeshare` command: account sign-up and
//! sign-in, student profile management, and direct access to the skills
//! normalizer.

mod cli;
mod commands;
mod config;
mod helpers;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use config::AppConfig;
use helpers::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.log.level);
    debug!(db = %config.store.path.display(), "configuration loaded");

    match cli.command {
        Commands::Init => commands::cmd_init(&config).await,
        Commands::Signup {
            email,
            password,
            student_id,
        } => commands::cmd_signup(&config, &email, &password, &student_id).await,
        Commands::Login { email, password } => {
            commands::cmd_login(&config, &email, &password).await
        }
        Commands::Logout => commands::cmd_logout(&config).await,
        Commands::Whoami => commands::cmd_whoami(&config).await,
        Commands::Profile { action } => commands::cmd_profile(&config, action).await,
        Commands::Skills { action } => commands::cmd_skills(action),
    }
}
