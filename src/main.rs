//! Command-line front end for url-alias.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL with a generated alias
//! cargo run -- shorten https://example.com/some/long/path
//!
//! # Shorten with a custom alias
//! cargo run -- shorten https://example.com --alias my-link
//!
//! # Look up, list and delete
//! cargo run -- resolve emptac
//! cargo run -- list --json
//! cargo run -- delete emptac
//!
//! # Preview an alias without saving it
//! cargo run -- generate https://example.com
//! ```
//!
//! # Environment Variables
//!
//! See [`url_alias::config`] for the full list.

use url_alias::config::{self, Config};
use url_alias::domain::alias::Resolution;
use url_alias::domain::entities::Link;
use url_alias::error::AppError;
use url_alias::infrastructure::persistence;
use url_alias::state::AppState;
use url_alias::telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// Shorten URLs with aliases built from their own letters.
#[derive(Parser)]
#[command(name = "url-alias")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Shorten {
        /// URL to shorten (stored verbatim)
        url: String,

        /// Custom alias instead of a generated one
        #[arg(short, long)]
        alias: Option<String>,
    },

    /// Print the URL stored under an alias
    Resolve { alias: String },

    /// List every stored link
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a link
    Delete {
        alias: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Generate an alias for a URL without saving it
    Generate { url: String },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;
    telemetry::init(&config.log_level, &config.log_format)?;
    config.print_summary();

    let pool = persistence::connect(
        &config.database_url,
        config.db_max_connections,
        config.connect_timeout(),
    )
    .await
    .map_err(|e| report("Failed to open database", e))?;

    let state = AppState::new(Arc::new(pool), &config);

    match cli.command {
        Commands::Shorten { url, alias } => shorten(&state, &url, alias.as_deref()).await?,
        Commands::Resolve { alias } => resolve(&state, &alias).await?,
        Commands::List { json } => list(&state, json).await?,
        Commands::Delete { alias, yes } => delete(&state, &alias, yes).await?,
        Commands::Generate { url } => generate(&state, &url).await?,
        Commands::Db { action } => handle_db_action(action, &config, &state).await?,
    }

    Ok(())
}

/// Stores a URL and prints the resulting alias.
async fn shorten(state: &AppState, url: &str, alias: Option<&str>) -> Result<()> {
    let shortened = state
        .link_service
        .shorten(url, alias)
        .await
        .map_err(|e| report("Failed to shorten URL", e))?;

    println!("{}", "✅ Link saved".green().bold());
    println!();
    println!("  Alias: {}", shortened.link.alias.bright_yellow().bold());
    println!("  URL:   {}", shortened.link.url.cyan());
    if let Some(resolution) = shortened.resolution {
        println!("  Path:  {}", describe(resolution).bright_black());
    }
    println!();

    Ok(())
}

async fn resolve(state: &AppState, alias: &str) -> Result<()> {
    let link = state
        .link_service
        .resolve(alias)
        .await
        .map_err(|e| report("Lookup failed", e))?;

    println!("{}", link.url);

    Ok(())
}

/// Lists links as a table or JSON.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   ID    Alias      URL
///   ─────────────────────────────────────────────
///   1     emptac     http://example.com
/// ```
async fn list(state: &AppState, json: bool) -> Result<()> {
    let links = state
        .link_service
        .list()
        .await
        .map_err(|e| report("Failed to list links", e))?;

    if json {
        println!("{}", render_json(&links)?);
        return Ok(());
    }

    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<10} {}",
        "ID".bright_white().bold(),
        "Alias".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for link in &links {
        println!(
            "  {:<5} {:<10} {}",
            link.id.to_string().bright_black(),
            link.alias.bright_yellow(),
            link.url.cyan()
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes a link after confirmation.
async fn delete(state: &AppState, alias: &str, skip_confirm: bool) -> Result<()> {
    let link = state
        .link_service
        .resolve(alias)
        .await
        .map_err(|e| report("Lookup failed", e))?;

    println!("  Alias: {}", link.alias.bright_yellow());
    println!("  URL:   {}", link.url.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    state
        .link_service
        .delete(alias)
        .await
        .map_err(|e| report("Failed to delete link", e))?;

    println!("{}", "✅ Link deleted".green().bold());

    Ok(())
}

/// Previews the alias a URL would receive right now.
async fn generate(state: &AppState, url: &str) -> Result<()> {
    let resolved = state
        .link_service
        .generate_alias(url)
        .await
        .map_err(|e| report("Failed to generate alias", e))?;

    println!(
        "{} {}",
        resolved.alias.bright_yellow().bold(),
        format!("({})", describe(resolved.resolution)).bright_black()
    );

    Ok(())
}

async fn handle_db_action(action: DbAction, config: &Config, state: &AppState) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1")
                .fetch_one(state.pool.as_ref())
                .await
                .context("Database check failed")?;

            let links = state
                .link_service
                .count()
                .await
                .map_err(|e| report("Failed to count links", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  Database: {}", config.database_url.bright_white());
            println!("  Links:    {}", links.to_string().bright_green().bold());
        }
    }

    Ok(())
}

fn describe(resolution: Resolution) -> String {
    match resolution {
        Resolution::Fresh => "first candidate".to_string(),
        Resolution::Unchecked => "unchecked, store lookup failed".to_string(),
        Resolution::Mutated { attempt } => format!("mutated on attempt {attempt}"),
        Resolution::Suffixed => "suffix fallback".to_string(),
    }
}

fn render_json(links: &[Link]) -> Result<String> {
    serde_json::to_string_pretty(links).context("Failed to serialize links")
}

/// Converts a service error into a CLI error, logging its details.
fn report(context: &str, e: AppError) -> anyhow::Error {
    tracing::debug!(code = e.code(), details = %e.details(), "{context}");
    anyhow::anyhow!("{context}: {e}")
}
