//! Single-shot digit classification via an external vision model.
//!
//! The client takes the canvas's data-URL snapshot, bundles it with a fixed
//! instruction into a `generateContent` request, and validates the model's
//! one-character answer. Malformed model output degrades to the `?`
//! sentinel; transport and service faults surface as one opaque error with
//! the cause logged for diagnostics only.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{Error, Result};

/// The fixed instruction sent alongside the image. Asks for exactly one
/// character, `0`-`9`, or `?`, with no explanation.
const INSTRUCTION: &str = "What single digit is drawn in this image? \
Respond with only the numerical digit from 0 to 9. If the image does not \
contain a recognizable single digit, respond with '?'. \
Do not provide any other explanation or text.";

/// Configuration for the recognition client
///
/// The credential is injected here rather than read from any global; the
/// demo binary fills it from an environment variable. Pointing `endpoint`
/// at a trusted proxy keeps the key out of distributed clients entirely.
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    /// Base URL of the generative-language service (no path)
    pub endpoint: String,
    /// Model identifier to request
    pub model: String,
    /// API credential, sent in the `x-goog-api-key` header
    pub api_key: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: String::new(),
            timeout_ms: 30000,
        }
    }
}

/// Outcome of one recognition request. `Unrecognized` is a valid terminal
/// result meaning "no identifiable single digit", not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Digit {
    Recognized(char),
    Unrecognized,
}

impl Digit {
    /// Normalize raw model output: trim surrounding whitespace and accept
    /// exactly one character from `{0..9, ?}`. Any other shape (empty,
    /// multi-character, unexpected symbol) degrades to `Unrecognized`
    /// rather than an error.
    pub fn from_model_text(text: &str) -> Self {
        let trimmed = text.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => Digit::Recognized(c),
            (Some('?'), None) => Digit::Unrecognized,
            _ => {
                log::warn!("Unexpected response from model: {:?}", text);
                Digit::Unrecognized
            }
        }
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Digit::Recognized(c) => write!(f, "{}", c),
            Digit::Unrecognized => write!(f, "?"),
        }
    }
}

/// Split an encoded image into its media type and raw base64 payload.
///
/// Only the `tag,payload` shape is enforced: both halves must be present
/// and non-empty. The media type is read from a `data:<mime>[;...]` head
/// when one is given; any other head falls back to `image/png`, the one
/// encoding the canvas actually emits.
fn parse_data_url(data_url: &str) -> Result<(&str, &str)> {
    let (meta, payload) = data_url
        .split_once(',')
        .ok_or_else(|| Error::MalformedInput("missing ',' separator".into()))?;
    if meta.is_empty() {
        return Err(Error::MalformedInput("empty header".into()));
    }
    if payload.is_empty() {
        return Err(Error::MalformedInput("empty payload".into()));
    }
    let mime = meta
        .strip_prefix("data:")
        .map(|rest| rest.split(';').next().unwrap_or(""))
        .unwrap_or("");
    let mime = if mime.is_empty() { "image/png" } else { mime };
    Ok((mime, payload))
}

/// Blocking client for the external model. One outstanding request at a
/// time is the caller's policy (see [`crate::session::Session`]); this type
/// performs exactly one attempt per call.
pub struct Recognizer {
    client: Client,
    config: RecognizerConfig,
}

impl Recognizer {
    pub fn new(config: RecognizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Classify one encoded image. No retries, no streaming, no caching.
    pub fn recognize(&self, data_url: &str) -> Result<Digit> {
        let (mime, payload) = parse_data_url(data_url)?;

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": mime, "data": payload } },
                    { "text": INSTRUCTION }
                ]
            }]
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .body(body.to_string())
            .send()
            .map_err(|e| {
                log::warn!("Model request failed: {}", e);
                Error::RecognitionFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Model endpoint returned HTTP {}", status);
            return Err(Error::RecognitionFailed);
        }

        let text = response.text().map_err(|e| {
            log::warn!("Failed to read model response body: {}", e);
            Error::RecognitionFailed
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            log::warn!("Model response was not valid JSON: {}", e);
            Error::RecognitionFailed
        })?;

        // A present-but-odd answer is coerced to the sentinel; only the
        // transport path above is an error.
        let answer = value
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(Digit::from_model_text(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_digit_is_recognized() {
        assert_eq!(Digit::from_model_text("7"), Digit::Recognized('7'));
        assert_eq!(Digit::from_model_text(" 3 \n"), Digit::Recognized('3'));
    }

    #[test]
    fn sentinel_passes_through() {
        assert_eq!(Digit::from_model_text("?"), Digit::Unrecognized);
    }

    #[test]
    fn junk_degrades_to_unrecognized() {
        for junk in ["abc", "", " ", "42", "x", "7!", "digit 7"] {
            assert_eq!(Digit::from_model_text(junk), Digit::Unrecognized, "{:?}", junk);
        }
    }

    #[test]
    fn digit_display_matches_wire_shape() {
        assert_eq!(Digit::Recognized('7').to_string(), "7");
        assert_eq!(Digit::Unrecognized.to_string(), "?");
    }

    #[test]
    fn data_url_parses_into_mime_and_payload() {
        let (mime, payload) = parse_data_url("data:image/png;base64,aGk=").expect("parse");
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "aGk=");

        let (mime, _) = parse_data_url("data:image/jpeg;base64,aGk=").expect("parse");
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn unusual_heads_default_the_media_type() {
        // Only the tag,payload split is structural; odd heads still parse
        // and fall back to PNG.
        for lenient in ["data:image/png,aGk=", "image/png;base64,aGk=", "data:,aGk="] {
            let (mime, payload) = parse_data_url(lenient).expect(lenient);
            assert_eq!(mime, "image/png", "{:?}", lenient);
            assert_eq!(payload, "aGk=");
        }
    }

    #[test]
    fn malformed_data_urls_are_rejected() {
        for bad in ["no comma here", ",aGk=", "data:image/png;base64,"] {
            assert!(
                matches!(parse_data_url(bad), Err(Error::MalformedInput(_))),
                "{:?}",
                bad
            );
        }
    }
}
