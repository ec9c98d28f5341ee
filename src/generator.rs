//! Rewrite requests against an external text-generation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::GeneratorConfig;
use crate::error::{AnalyzerError, Result};
use crate::options::{Strategy, Tone};

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 500;

const SYSTEM_PROMPT: &str = "You are an expert Facebook ad copywriter who specializes in creating high-converting, policy-compliant ad copy.";

const GUIDELINES: [&str; 10] = [
    "Maintain the core message and offering",
    "Avoid policy violations (no before/after claims, no guarantees)",
    "Use natural, conversational language",
    "Include emotional triggers",
    "Make it more persuasive",
    "Keep it concise",
    "Ensure proper formatting with paragraphs",
    "Apply the specified tone consistently",
    "Follow the chosen copywriting strategy",
    "Maintain Facebook compliance",
];

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Instruction asking for `copy` rewritten in the given tone and strategy.
    pub fn for_copy(copy: &str, tone: Tone, strategy: Strategy) -> Self {
        let guidelines = GUIDELINES
            .iter()
            .enumerate()
            .map(|(i, g)| format!("{}. {}", i + 1, g))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "As an expert Facebook ad copywriter, optimize the following ad copy using a {} tone \
             and a {} approach.\n\n\
             Original Copy:\n{}\n\n\
             Guidelines:\n{}\n\n\
             Provide only the optimized copy without any explanations or additional text.",
            tone.description(),
            strategy.description(),
            copy,
            guidelines
        );
        Self {
            system: SYSTEM_PROMPT.to_string(),
            prompt,
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Anything that turns a prompt into a single completion string.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiGenerator {
    client: Client,
    api_base: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig, api_key: SecretString) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalyzerError::generation(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.prompt }
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens
        });

        tracing::debug!(model = %self.model, "requesting optimized copy");
        let resp = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        completion_from_response(status, &text)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Map a raw HTTP status and body to the completion text or a typed error.
/// A well-formed response without content yields an empty string.
pub(crate) fn completion_from_response(status: u16, body: &str) -> Result<String> {
    match status {
        200..=299 => {}
        401 | 403 => return Err(AnalyzerError::InvalidCredential),
        _ => {
            let snippet: String = body.chars().take(200).collect();
            return Err(AnalyzerError::generation(format!(
                "service returned {}: {}",
                status, snippet
            )));
        }
    }

    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| AnalyzerError::generation(format!("malformed response: {}", e)))?;
    Ok(completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_tone_strategy_and_copy() {
        let req = GenerationRequest::for_copy(
            "Fresh bread daily.",
            Tone::Empathetic,
            Strategy::Storytelling,
        );
        assert!(req.prompt.contains("understanding and compassionate tone"));
        assert!(req
            .prompt
            .contains("use narrative elements to engage and connect approach"));
        assert!(req.prompt.contains("Original Copy:\nFresh bread daily."));
        assert!(req.prompt.contains("10. Maintain Facebook compliance"));
        assert_eq!(req.temperature, TEMPERATURE);
        assert_eq!(req.max_tokens, MAX_OUTPUT_TOKENS);
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"New copy"}}]}"#;
        assert_eq!(completion_from_response(200, body).unwrap(), "New copy");
    }

    #[test]
    fn missing_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(completion_from_response(200, body).unwrap(), "");
        assert_eq!(completion_from_response(200, "{}").unwrap(), "");
    }

    #[test]
    fn unauthorized_is_invalid_credential() {
        let err = completion_from_response(401, r#"{"error":"bad key"}"#).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidCredential));
        let err = completion_from_response(403, "").unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidCredential));
    }

    #[test]
    fn other_failures_are_generation_errors() {
        let err = completion_from_response(429, "rate limited").unwrap_err();
        assert!(matches!(err, AnalyzerError::Generation { .. }));
        let err = completion_from_response(200, "not json").unwrap_err();
        assert!(matches!(err, AnalyzerError::Generation { .. }));
    }
}
