//! Data models for the two external wire formats.
//!
//! This module defines the structures exchanged with the external APIs:
//! - [`NewsSearchResponse`] / [`Article`]: the news search envelope and the
//!   article records it carries
//! - [`ChatRequest`] / [`ChatResponse`]: the chat-completion request and
//!   response bodies
//!
//! The news API serializes field names in camelCase (`totalResults`,
//! `publishedAt`), hence the `rename_all` attributes. Article records are
//! treated as opaque apart from the fields declared here; everything the
//! pipeline does not read is left to serde to discard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outlet that published an article, as reported by the search API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleSource {
    /// Machine identifier of the outlet, when the API knows it.
    pub id: Option<String>,
    /// Display name of the outlet.
    pub name: Option<String>,
}

/// A single article record returned by the news search API.
///
/// Every field is optional on the wire; the pipeline only ever reads
/// `description`. The rest is kept for logging and debug output.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Outlet the article came from.
    pub source: Option<ArticleSource>,
    /// Byline, when present.
    pub author: Option<String>,
    /// Article headline.
    pub title: Option<String>,
    /// Short description or lede. This is the field the extractor joins.
    pub description: Option<String>,
    /// Canonical URL of the article.
    pub url: Option<String>,
    /// Publication timestamp in RFC 3339 form.
    pub published_at: Option<DateTime<Utc>>,
}

/// Response envelope from the news search endpoint.
///
/// On success `status` is `"ok"` and `articles` holds up to `pageSize`
/// records. On failure `status` is `"error"` and the `code`/`message` pair
/// describes what went wrong (invalid key, rate limit, bad parameter).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSearchResponse {
    /// `"ok"` or `"error"`.
    pub status: String,
    /// Total matches on the server side, of which at most one page is returned.
    #[serde(default)]
    pub total_results: u64,
    /// The returned page of article records.
    #[serde(default)]
    pub articles: Vec<Article>,
    /// Error code, present only when `status` is `"error"`.
    pub code: Option<String>,
    /// Human-readable error message, present only when `status` is `"error"`.
    pub message: Option<String>,
}

/// A single chat message, used in both the request and the response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatMessage {
    /// `"system"`, `"user"`, or `"assistant"`.
    pub role: String,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a user-role message.
    pub fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// Request body for the chat completion endpoint.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model identifier, e.g. `llama-3.1-8b-instant`.
    pub model: String,
    /// Conversation so far; this tool always sends exactly one user message.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature. The synthesis call pins this to `0.0`.
    pub temperature: f32,
    /// Output cap, only set by the connection probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// One generated completion choice.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated assistant message.
    pub message: ChatMessage,
    /// Why generation stopped (`"stop"`, `"length"`, ...).
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the completion endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Response body from the chat completion endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Generated choices; this tool requests one and reads the first.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    /// Token usage, when the provider reports it.
    pub usage: Option<ChatUsage>,
    /// Model that actually served the request.
    pub model: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if the model returned one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_deserialization_full_record() {
        let json = r#"{
            "source": {"id": "reuters", "name": "Reuters"},
            "author": "Jane Doe",
            "title": "Tesla beats Q3 estimates",
            "description": "Deliveries rose 6% year over year.",
            "url": "https://example.com/tesla-q3",
            "urlToImage": "https://example.com/tesla-q3.jpg",
            "publishedAt": "2025-05-06T14:30:00Z",
            "content": "Full text elided."
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(
            article.description.as_deref(),
            Some("Deliveries rose 6% year over year.")
        );
        assert_eq!(article.title.as_deref(), Some("Tesla beats Q3 estimates"));
        assert_eq!(
            article.source.as_ref().and_then(|s| s.name.as_deref()),
            Some("Reuters")
        );
        assert!(article.published_at.is_some());
    }

    #[test]
    fn test_article_deserialization_missing_and_null_fields() {
        let article: Article = serde_json::from_str(r#"{"title": "Untitled"}"#).unwrap();
        assert!(article.description.is_none());
        assert!(article.published_at.is_none());

        let article: Article =
            serde_json::from_str(r#"{"title": null, "description": null}"#).unwrap();
        assert!(article.title.is_none());
        assert!(article.description.is_none());
    }

    #[test]
    fn test_news_search_response_ok() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"title": "A", "description": "First."},
                {"title": "B", "description": null}
            ]
        }"#;

        let resp: NewsSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.total_results, 2);
        assert_eq!(resp.articles.len(), 2);
        assert_eq!(resp.articles[0].description.as_deref(), Some("First."));
        assert!(resp.articles[1].description.is_none());
        assert!(resp.code.is_none());
    }

    #[test]
    fn test_news_search_response_error_envelope() {
        let json = r#"{
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid or incorrect."
        }"#;

        let resp: NewsSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "error");
        assert_eq!(resp.code.as_deref(), Some("apiKeyInvalid"));
        assert!(resp.articles.is_empty());
        assert_eq!(resp.total_results, 0);
    }

    #[test]
    fn test_chat_request_serialization_omits_unset_max_tokens() {
        let request = ChatRequest {
            model: "llama-3.1-8b-instant".to_string(),
            messages: vec![ChatMessage::user("Hello".to_string())],
            temperature: 0.0,
            max_tokens: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""model":"llama-3.1-8b-instant""#));
        assert!(json.contains(r#""role":"user""#));
        assert!(json.contains(r#""temperature":0.0"#));
        assert!(!json.contains("max_tokens"));
    }

    #[test]
    fn test_chat_request_serialization_with_max_tokens() {
        let request = ChatRequest {
            model: "llama-3.1-8b-instant".to_string(),
            messages: vec![ChatMessage::user("Hello, this is a test.".to_string())],
            temperature: 0.0,
            max_tokens: Some(10),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""max_tokens":10"#));
    }

    #[test]
    fn test_chat_response_first_content() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "llama-3.1-8b-instant",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "Sentiment is mixed."},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
        }"#;

        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_content(), Some("Sentiment is mixed."));
        assert_eq!(resp.model.as_deref(), Some("llama-3.1-8b-instant"));
        assert_eq!(resp.usage.as_ref().map(|u| u.total_tokens), Some(160));
    }

    #[test]
    fn test_chat_response_empty_choices() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(resp.first_content(), None);
    }
}
