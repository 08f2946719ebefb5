mod parse;
mod prompt;

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use viko_types::models::{Detected, Translation};

pub use parse::extract_json_object;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Translation requests must finish well inside the send request's latency
/// budget; a hung model call degrades to an untranslated send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Adapter failures. Both variants are recoverable for the send pipeline —
/// the caller falls back to an untranslated message.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The service could not be reached or did not answer in time.
    #[error("translation service unavailable: {0}")]
    Unavailable(String),

    /// The model answered, but no usable result could be extracted.
    #[error("malformed translation response: {0}")]
    Format(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TranslateError::Format(err.to_string())
        } else {
            TranslateError::Unavailable(err.to_string())
        }
    }
}

/// Wire shape of the generative-language response; only the first
/// candidate's text is of interest.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Korean↔Vietnamese translator over an external text-generation endpoint.
pub struct Translator {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl Translator {
    pub fn new(api_key: impl Into<String>) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TranslateError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Translate `text` between Korean and Vietnamese, auto-detecting the
    /// source. `context` holds prior messages, oldest-first; only the most
    /// recent five are sent along.
    pub async fn translate(
        &self,
        text: &str,
        context: &[String],
    ) -> Result<Translation, TranslateError> {
        let prompt = prompt::translation_prompt(text, context);
        let raw = self.generate(&prompt).await?;

        debug!(chars = raw.len(), "translation model replied");
        parse::parse_translation(&raw)
    }

    /// Single-label language detection. Any reply besides `ko` or `vi`
    /// normalizes to `unknown`.
    pub async fn detect_language(&self, text: &str) -> Result<Detected, TranslateError> {
        let raw = self.generate(&prompt::detection_prompt(text)).await?;
        Ok(parse::normalize_detected(&raw))
    }

    /// One prompt in, the first candidate's text out.
    async fn generate(&self, prompt: &str) -> Result<String, TranslateError> {
        let url = format!(
            "{API_BASE}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let resp = self.http.post(&url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TranslateError::Unavailable(format!("{status}: {body}")));
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| TranslateError::Format("response carried no candidates".into()))?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_response_unwraps_first_candidate() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}]}},
                {"content": {"parts": [{"text": "other candidate"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap();
        assert_eq!(text, "first");
    }

    #[test]
    fn empty_candidate_list_is_a_format_error() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
