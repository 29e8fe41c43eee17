//! Command-line interface definitions for the news synthesis tool.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API credentials can be provided via command-line flags or environment
//! variables; their values are hidden from `--help` output.

use clap::{Parser, Subcommand};

use crate::api::DEFAULT_MODEL;

/// Command-line arguments for the news synthesis tool.
///
/// Without a query the tool starts an interactive session; with `-q` it
/// answers once and exits. The `check` subcommand verifies both API keys
/// before any real work.
///
/// # Examples
///
/// ```sh
/// # One-shot query
/// equity_news_synth -q "NVDA data center demand"
///
/// # Interactive session, printing the raw prompt text after each summary
/// equity_news_synth --show-raw
///
/// # Verify API keys and connectivity
/// equity_news_synth check
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Research query to answer once; omit to start an interactive session
    #[arg(short, long)]
    pub query: Option<String>,

    /// News search API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Groq API key for the synthesis model
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// Chat model used for synthesis
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Print the exact text fed into the model after each summary
    #[arg(long)]
    pub show_raw: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify API keys and connectivity, then report per-service status
    Check,
}
