//! Interactive session driving the fetch-then-synthesize flow.
//!
//! A [`Session`] owns the news client and a [`Synthesize`] backend and
//! handles queries from either the interactive loop or a one-shot `-q`
//! invocation. Each query runs the same two steps: fetch and join article
//! descriptions, then ask the model for one concise analyst summary.
//!
//! # Outcome Handling
//!
//! - Empty input and empty fetch results stop early with a warning, before
//!   any completion call is made.
//! - Search failures were already collapsed into "no articles" upstream.
//! - Synthesis failures propagate: the interactive loop prints them and
//!   keeps going, a one-shot run exits nonzero.

use crate::api::{render_prompt, GroqClient, Synthesize};
use crate::error::{Error, Result};
use crate::news::NewsClient;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::time::Duration;
use tracing::instrument;

/// Resolved API credentials, checked before any client is built.
#[derive(Debug)]
pub struct Credentials {
    pub news_api_key: String,
    pub groq_api_key: String,
}

impl Credentials {
    /// Require both keys, treating an empty string the same as an unset
    /// variable.
    pub fn resolve(news_api_key: Option<String>, groq_api_key: Option<String>) -> Result<Self> {
        match (news_api_key, groq_api_key) {
            (Some(news), Some(groq)) if !news.is_empty() && !groq.is_empty() => Ok(Self {
                news_api_key: news,
                groq_api_key: groq,
            }),
            _ => Err(Error::Config(
                "Please set the GROQ_API_KEY and NEWS_API_KEY environment variables.".to_string(),
            )),
        }
    }
}

/// Outcome of handling one query.
#[derive(Debug)]
pub enum QueryOutcome {
    /// Input was empty after trimming; nothing was fetched.
    EmptyQuery,
    /// The search failed or matched nothing with a usable description.
    NoArticles,
    /// A summary came back, along with the article text it was built from.
    Synthesized {
        summary: String,
        raw_summaries: String,
    },
}

/// Gate the completion call on having any article text to work with.
///
/// Returns `Ok(None)` without touching the model when `summaries` is empty;
/// otherwise renders the prompt and returns the model's summary. Model
/// failures propagate to the caller.
pub async fn synthesize_summaries<S>(
    synth: &S,
    query: &str,
    summaries: &str,
) -> Result<Option<String>>
where
    S: Synthesize<Response = String>,
{
    if summaries.is_empty() {
        return Ok(None);
    }

    let spinner = step_spinner("2. Synthesizing news using Groq LLM...");
    let prompt = render_prompt(query, summaries);
    let result = synth.synthesize(&prompt).await;
    spinner.finish_and_clear();

    Ok(Some(result?))
}

fn step_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// One research session over a news client and a synthesis backend.
pub struct Session<S> {
    news: NewsClient,
    synth: S,
    show_raw: bool,
    last_raw: Option<String>,
}

impl<S> Session<S>
where
    S: Synthesize<Response = String>,
{
    /// Create a new session.
    pub fn new(news: NewsClient, synth: S) -> Self {
        Self {
            news,
            synth,
            show_raw: false,
            last_raw: None,
        }
    }

    /// Set whether the raw article text is printed after each summary.
    pub fn with_show_raw(mut self, show: bool) -> Self {
        self.show_raw = show;
        self
    }

    /// Handle one query end to end.
    ///
    /// Fetch-side problems collapse into [`QueryOutcome::NoArticles`];
    /// synthesis errors propagate.
    #[instrument(level = "info", skip_all, fields(%query))]
    pub async fn process_query(&self, query: &str) -> Result<QueryOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(QueryOutcome::EmptyQuery);
        }

        let spinner = step_spinner("1. Fetching news articles...");
        let summaries = self.news.fetch_summary_text(query).await;
        spinner.finish_and_clear();

        match synthesize_summaries(&self.synth, query, &summaries).await? {
            None => Ok(QueryOutcome::NoArticles),
            Some(summary) => Ok(QueryOutcome::Synthesized {
                summary,
                raw_summaries: summaries,
            }),
        }
    }

    /// Answer a single query and exit.
    pub async fn run_once(&self, query: &str) -> Result<()> {
        let outcome = self.process_query(query).await?;
        self.render_outcome(&outcome, false);
        Ok(())
    }

    /// Render one outcome the way the panel-based layout ordered it:
    /// divider, header, summary, then the raw text section.
    fn render_outcome(&self, outcome: &QueryOutcome, offer_raw_command: bool) {
        match outcome {
            QueryOutcome::EmptyQuery => {
                println!("{} Please enter a query.", "warning:".yellow().bold());
            }
            QueryOutcome::NoArticles => {
                println!(
                    "{} Could not find relevant news articles or an API error occurred.",
                    "warning:".yellow().bold()
                );
            }
            QueryOutcome::Synthesized {
                summary,
                raw_summaries,
            } => {
                println!("{}", "---".dimmed());
                println!("{}", "AI-Generated Equity Summary".bold());
                println!();
                println!("{summary}");
                if self.show_raw {
                    render_raw(raw_summaries);
                } else if offer_raw_command {
                    println!();
                    println!("{}", "(type /raw to see the raw news data processed)".dimmed());
                }
            }
        }
    }
}

fn render_raw(raw: &str) {
    println!();
    println!(
        "{}",
        "The following text was fed into the LLM for final synthesis:".dimmed()
    );
    println!("{raw}");
}

impl Session<GroqClient> {
    /// Run the interactive loop until `/quit` or end of input.
    pub async fn run_repl(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path =
            dirs::data_dir().map(|p| p.join("equity-news-synth").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        // Empty input warns instead of silently reprompting.
                        println!("{} Please enter a query.", "warning:".yellow().bold());
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    self.handle_query(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Equity Research News Tool          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("LLM-Powered News Synthesis (Groq & NewsAPI)");
        println!("Model: {}", self.synth.model());
        println!();
        println!("Enter your query for the equity analyst");
        println!("(e.g., Q3 earnings forecast for Tesla and market sentiment)");
        println!();
        println!("Commands:");
        println!("  /help         - Show this help");
        println!("  /model [NAME] - Show or switch the synthesis model");
        println!("  /raw          - Show the raw news data behind the last summary");
        println!("  /quit         - Exit");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        let mut parts = cmd.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or(cmd);
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        match name {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /model [NAME]    - Show or switch the synthesis model");
                println!("  /raw             - Show the raw news data behind the last summary");
                println!("  /quit, /exit, /q - Exit");
                println!();
                false
            }
            "/model" => {
                match arg {
                    Some(model) => {
                        self.synth.set_model(model.to_string());
                        println!("Model set to {}", model);
                    }
                    None => println!("Current model: {}", self.synth.model()),
                }
                false
            }
            "/raw" => {
                match &self.last_raw {
                    Some(raw) => render_raw(raw),
                    None => println!("No raw news data yet. Run a query first."),
                }
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn handle_query(&mut self, line: &str) {
        println!();

        match self.process_query(line).await {
            Ok(outcome) => {
                if let QueryOutcome::Synthesized { raw_summaries, .. } = &outcome {
                    self.last_raw = Some(raw_summaries.clone());
                }
                self.render_outcome(&outcome, true);
            }
            Err(e) => {
                eprintln!("{} {e}", "error:".red().bold());
            }
        }
        println!();
    }
}
