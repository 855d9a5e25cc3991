//! CLI administration tool for quotes-api.
//!
//! Manages user permissions and accounts directly in the database, without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Grant write access to a user
//! cargo run --bin admin -- permission grant alice@example.com quotes:write
//!
//! # List a user's permissions
//! cargo run --bin admin -- permission list alice@example.com
//!
//! # Revoke a permission
//! cargo run --bin admin -- permission revoke alice@example.com quotes:write
//!
//! # Activate an account without an activation token
//! cargo run --bin admin -- user activate alice@example.com
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use quotes_api::domain::entities::{TokenScope, User};
use quotes_api::domain::repositories::{PermissionRepository, TokenRepository, UserRepository};
use quotes_api::infrastructure::persistence::{
    PgPermissionRepository, PgTokenRepository, PgUserRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing quotes-api.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user permissions
    Permission {
        #[command(subcommand)]
        action: PermissionAction,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Permission management subcommands.
#[derive(Subcommand)]
enum PermissionAction {
    /// Grant a permission code (e.g. quotes:write) to a user
    Grant { email: String, code: String },

    /// Revoke a permission code from a user
    Revoke {
        email: String,
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List a user's permission codes
    List { email: String },
}

/// Account management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Mark an account as activated and drop its activation tokens
    Activate { email: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

struct Repositories {
    users: PgUserRepository,
    permissions: PgPermissionRepository,
    tokens: PgTokenRepository,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let shared = Arc::new(pool.clone());
    let repos = Repositories {
        users: PgUserRepository::new(shared.clone()),
        permissions: PgPermissionRepository::new(shared.clone()),
        tokens: PgTokenRepository::new(shared),
    };

    match cli.command {
        Commands::Permission { action } => handle_permission_action(action, &repos).await?,
        Commands::User { action } => handle_user_action(action, &repos).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Looks up a user by email or fails with a readable message.
async fn find_user(repos: &Repositories, email: &str) -> Result<User> {
    repos
        .users
        .get_by_email(email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No user with email {email}"))
}

/// Dispatches permission management commands.
async fn handle_permission_action(action: PermissionAction, repos: &Repositories) -> Result<()> {
    match action {
        PermissionAction::Grant { email, code } => {
            let user = find_user(repos, &email).await?;

            repos
                .permissions
                .add_for_user(user.id, &code)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to grant permission: {}", e))?;

            println!(
                "{} {} → {}",
                "✅ Granted".green().bold(),
                code.bright_yellow(),
                user.email.cyan()
            );
        }
        PermissionAction::Revoke { email, code, yes } => {
            let user = find_user(repos, &email).await?;

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Revoke {code} from {}?", user.email))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let removed = repos
                .permissions
                .remove_for_user(user.id, &code)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to revoke permission: {}", e))?;

            if removed {
                println!("{}", "✅ Permission revoked".green().bold());
            } else {
                println!("{}", "⚠️  User did not hold this permission".yellow());
            }
        }
        PermissionAction::List { email } => {
            let user = find_user(repos, &email).await?;

            let permissions = repos
                .permissions
                .get_all_for_user(user.id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list permissions: {}", e))?;

            println!("{}", "📋 Permissions".bright_blue().bold());
            println!();
            println!("  User:      {}", user.email.cyan());
            println!(
                "  Activated: {}",
                if user.activated {
                    "yes".green()
                } else {
                    "no".red()
                }
            );
            println!();

            if permissions.is_empty() {
                println!("{}", "  No permissions granted".yellow());
            } else {
                let mut codes: Vec<&str> = permissions.iter().collect();
                codes.sort_unstable();
                for code in codes {
                    println!("  • {}", code.bright_white());
                }
            }
            println!();
        }
    }

    Ok(())
}

/// Dispatches account management commands.
async fn handle_user_action(action: UserAction, repos: &Repositories) -> Result<()> {
    match action {
        UserAction::Activate { email } => {
            let mut user = find_user(repos, &email).await?;

            if user.activated {
                println!("{}", "⚠️  Account is already activated".yellow());
                return Ok(());
            }

            user.activated = true;
            let user = repos
                .users
                .update(&user)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to activate user: {}", e))?
                .context("User was modified concurrently, try again")?;

            repos
                .tokens
                .delete_all_for_user(TokenScope::Activation, user.id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to delete activation tokens: {}", e))?;

            println!(
                "{} {}",
                "✅ Activated".green().bold(),
                user.email.cyan()
            );
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(pool)
                .await?;

            let quotes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Users:      {}", users.to_string().bright_green().bold());
            println!("  Quotes:     {}", quotes.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
