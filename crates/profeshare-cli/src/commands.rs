//! Subcommand handlers.

use anyhow::{Context, Result, bail};
use profeshare_skills::{SkillsOverview, categorize, parse};
use profeshare_store::{NewProfile, ProfileUpdate, StoreError};
use tracing::{info, warn};

use crate::cli::{ProfileAction, SkillsAction};
use crate::config::AppConfig;
use crate::helpers::{Stores, json_arg, raw_skills_arg};
use crate::render;

// ---------------------------------------------------------------------------
// Subcommand: init
// ---------------------------------------------------------------------------

pub async fn cmd_init(config: &AppConfig) -> Result<()> {
    let stores = Stores::open(config).await?;
    let version = stores
        .db
        .schema_version()
        .await
        .context("failed to read schema version")?;

    println!();
    println!("  [+] Database ready at {}", config.store.path.display());
    println!("  [+] Schema version {version}");
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Accounts and sessions
// ---------------------------------------------------------------------------

pub async fn cmd_signup(
    config: &AppConfig,
    email: &str,
    password: &str,
    student_id: &str,
) -> Result<()> {
    let stores = Stores::open(config).await?;
    let account = match stores.accounts.sign_up(email, password, student_id).await {
        Ok(account) => account,
        Err(StoreError::AlreadyExists { .. }) => bail!("an account already exists for {email}"),
        Err(e) => return Err(e).context("sign-up failed"),
    };
    info!(account_id = %account.id, "account created");

    println!("  [+] Account created for {}", account.email);
    if stores.profiles.get_by_student_id(&account.student_id).await?.is_none() {
        println!(
            "  [!] No profile for student id {} yet; run `profeshare profile create`",
            account.student_id
        );
    }
    Ok(())
}

pub async fn cmd_login(config: &AppConfig, email: &str, password: &str) -> Result<()> {
    let stores = Stores::open(config).await?;
    let Some(account) = stores
        .accounts
        .authenticate(email, password)
        .await
        .context("sign-in failed")?
    else {
        warn!("sign-in rejected");
        bail!("invalid email or password");
    };

    stores
        .sessions
        .start(&account)
        .await
        .context("failed to start session")?;
    println!("  [+] Signed in as {}", account.email);
    Ok(())
}

pub async fn cmd_logout(config: &AppConfig) -> Result<()> {
    let stores = Stores::open(config).await?;
    if stores.sessions.end().await.context("failed to end session")? {
        println!("  [+] Signed out");
    } else {
        println!("  [=] Not signed in");
    }
    Ok(())
}

pub async fn cmd_whoami(config: &AppConfig) -> Result<()> {
    let stores = Stores::open(config).await?;
    match stores.sessions.current().await.context("failed to read session")? {
        Some((session, account)) => {
            print!("{}", render::account(&account));
            println!("  Signed in:  {}", render::timestamp(session.created_at));
        }
        None => println!("  [=] Not signed in"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: profile
// ---------------------------------------------------------------------------

pub async fn cmd_profile(config: &AppConfig, action: ProfileAction) -> Result<()> {
    let stores = Stores::open(config).await?;

    match action {
        ProfileAction::Create {
            student_id,
            first_name,
            last_name,
            email,
            skills,
        } => {
            let mut new = NewProfile::new(student_id, first_name, last_name, email);
            if let Some(raw) = skills {
                new = new.with_skills(raw_skills_arg(&raw));
            }
            let profile = match stores.profiles.create(new).await {
                Ok(profile) => profile,
                Err(StoreError::AlreadyExists { key, .. }) => {
                    bail!("a profile already exists for student id {key}")
                }
                Err(e) => return Err(e).context("failed to create profile"),
            };
            println!(
                "  [+] Created profile {} for {}",
                profile.student_id,
                profile.full_name()
            );
        }

        ProfileAction::Show { student_id, json } => {
            let student_id = match student_id {
                Some(id) => id,
                None => stores.signed_in_student_id().await?,
            };
            let profile = stores.require_profile(&student_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&render::profile_json(&profile))?);
            } else {
                println!();
                print!("{}", render::profile(&profile));
                println!();
            }
        }

        ProfileAction::SetSkills { student_id, raw } => {
            let raw = raw_skills_arg(&raw);
            stores
                .profiles
                .set_skills(&student_id, &raw)
                .await
                .with_context(|| format!("failed to update skills for {student_id}"))?;
            let count = parse(&raw).len();
            println!("  [+] Stored {count} skills for {student_id}");
        }

        ProfileAction::Edit {
            student_id,
            first_name,
            last_name,
            email,
            projects,
            experience,
            certifications,
            job_preferences,
            profile_image,
        } => {
            let update = ProfileUpdate {
                first_name,
                last_name,
                email,
                projects: projects.as_deref().map(json_arg),
                experience: experience.as_deref().map(json_arg),
                certifications_and_licenses: certifications.as_deref().map(json_arg),
                job_preferences: job_preferences.as_deref().map(json_arg),
                profile_image,
            };
            if update.is_empty() {
                bail!("nothing to change; pass at least one field option");
            }
            stores
                .profiles
                .update(&student_id, update)
                .await
                .with_context(|| format!("failed to update profile {student_id}"))?;
            println!("  [+] Updated profile {student_id}");
        }

        ProfileAction::List { limit } => {
            let profiles = stores
                .profiles
                .list_recent(limit)
                .await
                .context("failed to list profiles")?;
            if profiles.is_empty() {
                println!("  (no profiles)");
            }
            for profile in &profiles {
                println!("{}", render::profile_row(profile));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: skills
// ---------------------------------------------------------------------------

/// Runs without touching the database.
pub fn cmd_skills(action: SkillsAction) -> Result<()> {
    match action {
        SkillsAction::Parse { raw, json } => {
            let skills = parse(&raw_skills_arg(&raw));
            if json {
                println!("{}", serde_json::to_string_pretty(&skills)?);
            } else {
                print!("{}", render::skill_list(&skills));
            }
        }
        SkillsAction::Categorize { raw, json } => {
            let skills = parse(&raw_skills_arg(&raw));
            if json {
                let overview = SkillsOverview::from_skills(&skills);
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                print!("{}", render::categories(&categorize(&skills)));
            }
        }
    }
    Ok(())
}
