mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wix_lib::{Client, Credentials, RetryingClient};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "wixctl")]
#[command(about = "Manage Wix site embeds, translation content and machine translation")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List site embeds or look one up by ID
    Embeds(commands::embeds::EmbedsArgs),
    /// List or query translation schemas
    Schemas(commands::schemas::SchemasArgs),
    /// Query translated content
    Contents(commands::contents::ContentsArgs),
    /// Machine-translate text
    Translate(commands::translate::TranslateArgs),
    /// Replay a JSON-lines file of domain events through the de-duplicator
    Events(commands::events::EventsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("wixctl=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    match &cli.command {
        Commands::Embeds(args) => commands::embeds::run(args, &build_client()?, &format).await?,
        Commands::Schemas(args) => commands::schemas::run(args, &build_client()?, &format).await?,
        Commands::Contents(args) => {
            commands::contents::run(args, &build_client()?, &format).await?
        }
        Commands::Translate(args) => {
            commands::translate::run(args, &build_client()?, &format).await?
        }
        Commands::Events(args) => commands::events::run(args, &format)?,
    }

    Ok(())
}

/// Builds a client from `WIX_API_KEY`, `WIX_SITE_ID`, `WIX_ACCOUNT_ID` and
/// the optional `WIX_BASE_URL`.
fn build_client() -> Result<RetryingClient> {
    let api_key = std::env::var("WIX_API_KEY").context("WIX_API_KEY is not set")?;
    let credentials = Credentials {
        authorization: api_key,
        site_id: std::env::var("WIX_SITE_ID").ok(),
        account_id: std::env::var("WIX_ACCOUNT_ID").ok(),
    };
    if credentials.site_id.is_none() && credentials.account_id.is_none() {
        anyhow::bail!("set WIX_SITE_ID or WIX_ACCOUNT_ID to choose what the calls act on");
    }
    let client = match std::env::var("WIX_BASE_URL") {
        Ok(base_url) => Client::with_base_url(&base_url, credentials)?,
        Err(_) => Client::new(credentials)?,
    };
    Ok(RetryingClient::new(client))
}
