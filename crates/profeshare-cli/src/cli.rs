//! CLI argument definitions for Profeshare.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use clap::{Parser, Subcommand};

/// Profeshare -- student profiles and skills.
#[derive(Parser)]
#[command(
    name = "profeshare",
    version,
    about = "Profeshare -- student profiles and skills",
    long_about = "Manage student accounts and profiles, and normalize free-form skill \
                  lists into a fixed set of display categories."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and apply migrations.
    Init,

    /// Register a new account.
    Signup {
        email: String,
        #[arg(long, short)]
        password: String,
        /// Student id of the profile this account signs in to.
        #[arg(long, short)]
        student_id: String,
    },

    /// Sign in. Replaces any current session.
    Login {
        email: String,
        #[arg(long, short)]
        password: String,
    },

    /// Sign out.
    Logout,

    /// Show the signed-in account.
    Whoami,

    /// Manage student profiles.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Run the skills normalizer on an ad-hoc value.
    Skills {
        #[command(subcommand)]
        action: SkillsAction,
    },
}

/// Actions on student profiles.
#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create a profile.
    Create {
        student_id: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Initial skills: JSON, or plain text for a single skill.
        #[arg(long)]
        skills: Option<String>,
    },

    /// Show a profile with its skills grouped by category.
    Show {
        /// Defaults to the signed-in account's student id.
        student_id: Option<String>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Replace a profile's skills.
    SetSkills {
        student_id: String,
        /// JSON (array, object or string), or plain text for a single skill.
        raw: String,
    },

    /// Change some fields of a profile.
    Edit {
        student_id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// JSON array of projects.
        #[arg(long)]
        projects: Option<String>,
        /// JSON describing work experience.
        #[arg(long)]
        experience: Option<String>,
        /// JSON describing certifications and licenses.
        #[arg(long)]
        certifications: Option<String>,
        /// JSON describing job preferences.
        #[arg(long)]
        job_preferences: Option<String>,
        #[arg(long)]
        profile_image: Option<String>,
    },

    /// List the most recently created profiles.
    List {
        #[arg(long, short, default_value_t = 20)]
        limit: u32,
    },
}

/// Actions for the skills normalizer.
#[derive(Subcommand)]
pub enum SkillsAction {
    /// Print the normalized skill list.
    Parse {
        raw: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the skills grouped by category.
    Categorize {
        raw: String,
        #[arg(long)]
        json: bool,
    },
}
