//! # Equity News Synth
//!
//! An equity research helper that fetches recent news for a query and
//! synthesizes the article descriptions into one concise, analyst-ready
//! summary with a Groq-hosted LLM.
//!
//! ## Features
//!
//! - Searches a NewsAPI-compatible endpoint for the 10 most relevant
//!   English-language articles on a query
//! - Joins the non-empty article descriptions and feeds them to a fixed
//!   two-slot analyst prompt, with temperature pinned to 0
//! - Interactive session with line editing and history, plus a one-shot
//!   `-q` mode for scripted use
//! - `check` subcommand that verifies both API keys with live probes
//!
//! ## Usage
//!
//! ```sh
//! equity_news_synth -q "Q3 earnings forecast for Tesla and market sentiment"
//! ```
//!
//! ## Architecture
//!
//! Each query runs a two-step pipeline:
//! 1. **Fetch**: Search the news API and join the article descriptions
//! 2. **Synthesize**: Render the prompt and ask the model for one concise
//!    summary

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod app;
mod check;
mod cli;
mod error;
mod models;
mod news;
mod utils;

use api::GroqClient;
use app::{Credentials, Session};
use cli::{Cli, Command};
use news::NewsClient;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Diagnostics go to stderr so they never interleave with the session UI.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("equity_news_synth starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.query, %args.model, args.show_raw, "Parsed CLI arguments");

    match &args.command {
        Some(Command::Check) => {
            check::run(
                args.news_api_key.clone(),
                args.groq_api_key.clone(),
                &args.model,
            )
            .await?;
        }
        None => {
            // Both keys are required before any request goes out.
            let credentials =
                Credentials::resolve(args.news_api_key.clone(), args.groq_api_key.clone())?;
            let news = NewsClient::new(credentials.news_api_key);
            let synth = GroqClient::new(credentials.groq_api_key, args.model.clone());
            let mut session = Session::new(news, synth).with_show_raw(args.show_raw);

            match &args.query {
                Some(query) => session.run_once(query).await?,
                None => session.run_repl().await?,
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
