//! CLI administration tool for clicklink.
//!
//! Manages API tokens, prints click statistics and checks the database
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin admin -- token create --name "Reporting"
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Reporting"
//! cargo run --bin admin -- stats --by month
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server's

use clicklink::application::services::StatsService;
use clicklink::application::services::auth_service::hash_token;
use clicklink::config::mask_connection_string;
use clicklink::domain::entities::GroupBy;
use clicklink::domain::repositories::{ApiToken, TokenRepository};
use clicklink::infrastructure::persistence::{PgStatsRepository, PgTokenRepository};

use anyhow::{Context, Result};
use chrono::{DateTime, Days, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::{Confirm, Input};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;
use std::sync::Arc;

const TOKEN_LEN: usize = 48;

/// CLI tool for managing clicklink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show link and click statistics
    Stats {
        /// Grouping of the recent clicks table
        #[arg(long, value_enum, default_value_t = Grouping::Day)]
        by: Grouping,

        /// How many days back the recent clicks table reaches
        #[arg(long, default_value_t = 7)]
        days: u64,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Reporting", "Dashboard")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show server version and applied migrations
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum Grouping {
    Day,
    Month,
}

impl From<Grouping> for GroupBy {
    fn from(g: Grouping) -> Self {
        match g {
            Grouping::Day => GroupBy::Day,
            Grouping::Month => GroupBy::Month,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, pool).await?,
        Commands::Stats { by, days } => handle_stats(pool, by.into(), days).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: PgPool) -> Result<()> {
    let repo = PgTokenRepository::new(Arc::new(pool));

    match action {
        TokenAction::Create { name, yes } => {
            let secret = std::env::var("TOKEN_SIGNING_SECRET")
                .context("TOKEN_SIGNING_SECRET must be set to create tokens")?;
            create_token(&repo, &secret, name, yes).await
        }
        TokenAction::List => list_tokens(&repo).await,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, &name_or_id).await,
    }
}

/// Issues a new token.
///
/// The raw value is printed exactly once; only its keyed hash is stored.
async fn create_token(
    repo: &impl TokenRepository,
    signing_secret: &str,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Reporting")
            .interact_text()?,
    };

    let token_value = generate_token();

    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "Save this token now, it cannot be shown again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(signing_secret, &token_value)?;

    let stored = repo
        .create(&token_name, &token_hash)
        .await
        .context("Failed to create token")?;

    println!(
        "{} (id {})",
        "Token created".green().bold(),
        stored.id.to_string().bright_black()
    );
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/stat",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: &impl TokenRepository) -> Result<()> {
    println!("{}", "API Tokens".bright_blue().bold());
    println!();

    let tokens = repo.list().await.context("Failed to list tokens")?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!(
            "  Create one with: {}",
            "cargo run --bin admin -- token create".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<17} {:<17} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(82).bright_black());

    for token in &tokens {
        print_token_row(token);
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );

    Ok(())
}

fn print_token_row(token: &ApiToken) {
    let status = if token.is_revoked() {
        "REVOKED".red()
    } else {
        "ACTIVE".green()
    };

    let last_used = token
        .last_used_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!(
        "  {:<5} {:<30} {:<17} {:<17} {}",
        token.id.to_string().bright_black(),
        token.name.cyan(),
        token.created_at.format("%Y-%m-%d %H:%M").to_string(),
        last_used.bright_black(),
        status
    );
}

async fn revoke_token(repo: &impl TokenRepository, name_or_id: &str) -> Result<()> {
    println!("{}", "Revoke API Token".bright_blue().bold());
    println!();

    let token = repo
        .find(name_or_id)
        .await
        .context("Failed to look up token")?
        .with_context(|| format!("Token '{name_or_id}' not found"))?;

    if token.is_revoked() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    if repo.revoke(token.id).await.context("Failed to revoke token")? {
        println!("{}", "Token revoked".green().bold());
    } else {
        println!("{}", "Token was revoked concurrently".yellow());
    }

    Ok(())
}

/// Prints totals and the recent clicks table.
/// Range covering the last `days` days up to `today`, clamped to the epoch.
fn stats_range(today: NaiveDate, days: u64) -> (NaiveDate, NaiveDate) {
    let epoch = DateTime::<Utc>::UNIX_EPOCH.date_naive();
    let from = today
        .checked_sub_days(Days::new(days))
        .map_or(epoch, |from| from.max(epoch));
    (from, today)
}

async fn handle_stats(pool: PgPool, group_by: GroupBy, days: u64) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let live_links: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE deleted_at IS NULL")
            .fetch_one(&pool)
            .await?;

    let deleted_links: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE deleted_at IS NOT NULL")
            .fetch_one(&pool)
            .await?;

    let (stat_rows, total_clicks): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(clicks), 0)::BIGINT FROM click_stats")
            .fetch_one(&pool)
            .await?;

    let active_tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(&pool)
            .await?;

    println!(
        "  Links:         {} ({} deleted)",
        live_links.to_string().bright_green().bold(),
        deleted_links.to_string().bright_black()
    );
    println!(
        "  Clicks:        {} in {} day rows",
        total_clicks.to_string().bright_green().bold(),
        stat_rows.to_string().bright_black()
    );
    println!(
        "  Active tokens: {}",
        active_tokens.to_string().bright_green().bold()
    );
    println!();

    let (from, to) = stats_range(Utc::now().date_naive(), days);

    let service = StatsService::new(Arc::new(PgStatsRepository::new(Arc::new(pool))));
    let periods = service
        .get_all(group_by, from, to)
        .await
        .context("Failed to aggregate clicks")?;

    println!(
        "  {} {} .. {} (by {})",
        "Clicks".bright_white().bold(),
        from,
        to,
        group_by
    );
    if periods.is_empty() {
        println!("  {}", "no clicks".yellow());
    }
    for period in &periods {
        println!(
            "  {:<12} {}",
            period.period.cyan(),
            period.sum.to_string().bright_green()
        );
    }
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").execute(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM _sqlx_migrations WHERE success",
            )
            .fetch_one(pool)
            .await
            .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

/// 48 random alphanumeric characters (~285 bits).
fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_stats_range_days_back() {
        assert_eq!(
            stats_range(date(2024, 3, 10), 7),
            (date(2024, 3, 3), date(2024, 3, 10))
        );
        assert_eq!(
            stats_range(date(2024, 3, 10), 0),
            (date(2024, 3, 10), date(2024, 3, 10))
        );
    }

    #[test]
    fn test_stats_range_oversized_days_clamps_to_epoch() {
        let today = date(2024, 3, 10);

        for days in [20_000, 10_000_000, u64::MAX] {
            assert_eq!(stats_range(today, days), (date(1970, 1, 1), today), "{days}");
        }
    }

    #[test]
    fn test_cli_parses_stats_options() {
        let cli = Cli::try_parse_from(["admin", "stats", "--by", "month", "--days", "30"]).unwrap();

        match cli.command {
            Commands::Stats { days, .. } => assert_eq!(days, 30),
            _ => panic!("expected stats command"),
        }
    }
}
