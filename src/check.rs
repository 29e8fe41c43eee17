//! Setup verification for the `check` subcommand.
//!
//! Prompts for any missing API key, probes both services with minimal
//! requests, and prints a per-service report with troubleshooting hints.
//! Exits nonzero when either probe fails.

use crate::api::GroqClient;
use crate::error::{Error, Result};
use crate::news::NewsClient;
use colored::{ColoredString, Colorize};
use std::io::{self, BufRead, Write};
use tracing::instrument;

/// Run the full verification: key presence, then one probe per service.
#[instrument(level = "info", skip_all)]
pub async fn run(
    news_api_key: Option<String>,
    groq_api_key: Option<String>,
    model: &str,
) -> Result<()> {
    println!("=== News Research Tool Setup Verification ===");
    println!();

    let news_api_key = prompt_if_missing(news_api_key, "Enter your NewsAPI key: ")?;
    let groq_api_key = prompt_if_missing(groq_api_key, "Enter your Groq API key: ")?;

    if news_api_key.is_empty() || groq_api_key.is_empty() {
        return Err(Error::Config("Both API keys are required!".to_string()));
    }

    println!();
    println!("1. Testing API Connections:");
    println!("{}", "-".repeat(30));

    let news_result = check_news(&news_api_key).await;
    let groq_result = check_groq(&groq_api_key, model).await;

    println!();
    println!("2. Setup Summary:");
    println!("{}", "-".repeat(30));
    println!("NewsAPI: {}", status_label(news_result.is_ok()));
    println!("Groq API: {}", status_label(groq_result.is_ok()));

    if news_result.is_ok() && groq_result.is_ok() {
        println!();
        println!(
            "{}",
            "Setup complete! You can now run the application:".green().bold()
        );
        println!("equity_news_synth");
        Ok(())
    } else {
        println!();
        println!(
            "{}",
            "Setup incomplete. Please check your API keys and try again.".red()
        );
        println!();
        println!("Troubleshooting:");
        if news_result.is_err() {
            println!("- Verify your NewsAPI key at https://newsapi.org/account");
        }
        if groq_result.is_err() {
            println!("- Verify your Groq API key at https://console.groq.com/keys");
        }
        Err(Error::Config("setup verification failed".to_string()))
    }
}

async fn check_news(api_key: &str) -> Result<()> {
    println!("Testing NewsAPI connection...");
    let client = NewsClient::new(api_key.to_string());
    match client.check_connection().await {
        Ok(total_results) => {
            println!("{} NewsAPI connection successful!", "✓".green());
            println!("Total articles available: {total_results}");
            Ok(())
        }
        Err(e) => {
            println!("{} NewsAPI error: {e}", "✗".red());
            Err(e)
        }
    }
}

async fn check_groq(api_key: &str, model: &str) -> Result<()> {
    println!("Testing Groq API connection...");
    let client = GroqClient::new(api_key.to_string(), model.to_string());
    match client.check_connection().await {
        Ok(()) => {
            println!("{} Groq API connection successful!", "✓".green());
            Ok(())
        }
        Err(e) => {
            println!("{} Groq API error: {e}", "✗".red());
            Err(e)
        }
    }
}

fn status_label(ok: bool) -> ColoredString {
    if ok {
        "✓ Working".green()
    } else {
        "✗ Failed".red()
    }
}

/// Use the given value when present, otherwise read one line from stdin.
fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    if let Some(v) = value {
        if !v.is_empty() {
            return Ok(v);
        }
    }

    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_skipped_when_value_present() {
        let value = prompt_if_missing(Some("key-from-env".to_string()), "unused: ").unwrap();

        assert_eq!(value, "key-from-env");
    }

    #[test]
    fn test_status_labels() {
        assert!(status_label(true).to_string().contains("Working"));
        assert!(status_label(false).to_string().contains("Failed"));
    }
}
