//! Chat completion API interaction for news synthesis.
//!
//! This module renders the synthesis prompt and sends it to a Groq-hosted
//! model through the OpenAI-compatible chat completions endpoint.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`Synthesize`]: Core trait defining async summary generation
//! - [`GroqClient`]: HTTP implementation backed by the Groq API
//!
//! Synthesis requests pin `temperature` to 0 so repeated runs over the same
//! article descriptions produce stable summaries.

use crate::error::{Error, Result};
use crate::models::{ChatMessage, ChatRequest, ChatResponse};
use reqwest::Client;
use std::fmt;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Chat completions endpoint of the Groq API.
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Model used when none is given on the command line.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Render the synthesis prompt around a query and its joined article
/// descriptions.
///
/// The template is fixed apart from the two slots; `summaries` may be empty
/// and still renders, though callers normally gate on that before spending
/// a completion call.
pub fn render_prompt(query: &str, summaries: &str) -> String {
    format!(
        "
You are an AI assistant helping an equity research analyst. Your primary goal is to synthesize information accurately and quickly.
Given the following query and the provided news article summaries, provide an overall, concise summary that is highly relevant to an equity analyst.

Query: {query}
Summaries: {summaries}

###
"
    )
}

/// Trait for async summary generation.
///
/// Implementors take a fully rendered prompt and return the synthesized
/// text. The abstraction keeps the interactive flow testable with scripted
/// backends in place of a live API.
pub trait Synthesize {
    /// The type of response returned by the model.
    type Response;

    /// Send a rendered prompt to the model and return its completion.
    async fn synthesize(&self, prompt: &str) -> Result<Self::Response>;
}

/// Chat completions client for the Groq API.
pub struct GroqClient {
    http: Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqClient")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl GroqClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            model,
        }
    }

    /// Model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Switch the model for subsequent requests.
    pub fn set_model(&mut self, model: String) {
        self.model = model;
    }

    /// POST one chat completion request and decode the response body.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .http
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Completion { status, body });
        }
        Ok(response.json().await?)
    }

    /// Probe the API with a tiny capped completion, for the `check` command.
    #[instrument(level = "info", skip_all)]
    pub async fn check_connection(&self) -> Result<()> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user("Hello, this is a test.".to_string())],
            temperature: 0.0,
            max_tokens: Some(10),
        };
        let response = self.chat(&request).await?;
        info!(
            model = response.model.as_deref().unwrap_or(&self.model),
            "Completion API reachable"
        );
        Ok(())
    }
}

impl Synthesize for GroqClient {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn synthesize(&self, prompt: &str) -> Result<String> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt.to_string())],
            temperature: 0.0,
            max_tokens: None,
        };
        let res = self.chat(&request).await;
        let dt = t0.elapsed();

        let response = match res {
            Ok(response) => response,
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "Completion call failed");
                return Err(e);
            }
        };

        let content = response
            .first_content()
            .ok_or(Error::EmptyCompletion)?
            .to_string();
        info!(
            elapsed_ms = dt.as_millis() as u128,
            model = response.model.as_deref().unwrap_or(&self.model),
            prompt_tokens = response.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            finish_reason = response.choices.first().and_then(|c| c.finish_reason.as_deref()),
            "Completion succeeded"
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt_fills_both_slots() {
        let prompt = render_prompt("NVDA earnings outlook", "Chipmaker beats estimates.");
        assert!(prompt.contains("Query: NVDA earnings outlook\n"));
        assert!(prompt.contains("Summaries: Chipmaker beats estimates.\n"));
    }

    #[test]
    fn test_render_prompt_exact_shape() {
        let expected = "\nYou are an AI assistant helping an equity research analyst. \
                        Your primary goal is to synthesize information accurately and quickly.\n\
                        Given the following query and the provided news article summaries, \
                        provide an overall, concise summary that is highly relevant to an equity analyst.\n\
                        \nQuery: q\nSummaries: s\n\n###\n";
        assert_eq!(render_prompt("q", "s"), expected);
    }

    #[test]
    fn test_render_prompt_empty_summaries_still_renders() {
        let prompt = render_prompt("oil prices", "");
        assert!(prompt.contains("Summaries: \n"));
        assert!(prompt.ends_with("###\n"));
    }

    #[test]
    fn test_groq_client_debug_redacts_key() {
        let client = GroqClient::new("gsk_secret".to_string(), DEFAULT_MODEL.to_string());
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("gsk_secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains(DEFAULT_MODEL));
    }
}
