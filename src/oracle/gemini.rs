//! Gemini `generateContent` client
//!
//! Asks for a JSON response and reads `candidates[0].content.parts[0].text`.
//! A 503 is retried with linear backoff; anything else fails the call and the
//! caller falls back to canned answers.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::fallback;
use super::prompts::{emotion_prompt, quest_prompt};
use super::types::{QuestPlan, QuestRequest};
use super::QuestOracle;
use crate::config::OracleSettings;
use crate::domain::EmotionalAnalysis;

#[derive(Clone)]
pub struct GeminiOracle {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

impl GeminiOracle {
    pub fn new(settings: &OracleSettings, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(settings.timeout_secs.max(1)))
            .build();

        Self {
            agent,
            api_key: api_key.into(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_retries: settings.max_retries.max(1),
            retry_backoff: Duration::from_millis(settings.retry_backoff_ms),
        }
    }

    /// Request URL. The key is sent as a header, never in the query string
    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send `prompt` and parse the model's text as `T`
    fn generate<T: DeserializeOwned>(&self, prompt: &str) -> Result<T> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        let url = self.endpoint();

        for attempt in 1..=self.max_retries {
            let request = self.agent.post(&url).set("x-goog-api-key", &self.api_key);
            match request.send_json(&body) {
                Ok(response) => {
                    let envelope: GenerateResponse = response
                        .into_json()
                        .context("Failed to parse Gemini response envelope")?;
                    let text = envelope
                        .first_text()
                        .ok_or_else(|| anyhow!("Gemini response has no candidate text"))?;
                    return parse_payload(&text);
                }
                Err(ureq::Error::Status(503, _)) if attempt < self.max_retries => {
                    let delay = self.retry_backoff * attempt;
                    warn!(
                        "[questline:oracle] Gemini overloaded (attempt {}/{}), retrying in {:?}",
                        attempt, self.max_retries, delay
                    );
                    std::thread::sleep(delay);
                }
                Err(ureq::Error::Status(code, response)) => {
                    let body = response.into_string().unwrap_or_default();
                    bail!("Gemini returned HTTP {}: {}", code, body.trim());
                }
                Err(e) => return Err(e).context("Gemini request failed"),
            }
        }

        bail!("Gemini unavailable after {} attempts", self.max_retries)
    }
}

/// Parse model text as JSON, tolerating a Markdown code fence around it
fn parse_payload<T: DeserializeOwned>(text: &str) -> Result<T> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(unfenced.trim()).context("Gemini text is not the expected JSON")
}

impl QuestOracle for GeminiOracle {
    fn generate_quests(&self, request: &QuestRequest) -> QuestPlan {
        match self.generate::<QuestPlan>(&quest_prompt(request)) {
            Ok(plan) if !plan.quests.is_empty() => {
                debug!("Gemini proposed {} quests", plan.quests.len());
                plan
            }
            Ok(_) => {
                warn!("[questline:oracle] Gemini returned no quests, using defaults");
                fallback::default_plan(request)
            }
            Err(e) => {
                warn!("[questline:oracle] Quest generation failed, using defaults: {:#}", e);
                fallback::default_plan(request)
            }
        }
    }

    fn analyze_emotion(&self, text: &str) -> EmotionalAnalysis {
        match self.generate::<EmotionalAnalysis>(&emotion_prompt(text)) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("[questline:oracle] Emotional analysis failed, using neutral: {:#}", e);
                fallback::neutral_analysis(text)
            }
        }
    }
}
