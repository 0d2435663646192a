use crate::error::{ReportError, Result};
use crate::llm::backend::{ModelBackend, ModelRequest};
use crate::llm::types::*;
use log::debug;
use reqwest::Client;
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Schema keywords the Gemini `responseSchema` subset rejects.
const UNSUPPORTED_SCHEMA_KEYS: &[&str] = &[
    "$schema",
    "title",
    "definitions",
    "additionalProperties",
    "format",
    "minimum",
    "maximum",
    "default",
];

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    temperature: Option<f32>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            temperature: None,
        }
    }

    /// Reads the key from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            ReportError::ModelCallFailed("GEMINI_API_KEY is not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Applied per request; the only timeout a flow call is subject to.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(
        &self,
        system_prompt: &str,
        prompt: &str,
        response_schema: serde_json::Value,
    ) -> Result<String> {
        // The key goes in a header: `reqwest::Error` displays the URL, and it ends up in logs.
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: Some(Content::user(system_prompt)),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(sanitize_schema(response_schema)),
                temperature: self.temperature,
            },
        };

        let res = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(ReportError::ModelCallFailed(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;

        let candidate = body
            .candidates
            .ok_or_else(|| ReportError::ModelCallFailed("No candidates returned".to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::ModelCallFailed("Empty candidates list".to_string()))?;

        if let Some(reason) = &candidate.finish_reason {
            debug!("Gemini finish reason: {}", reason);
        }

        candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| ReportError::ModelCallFailed("No parts in content".to_string()))
    }
}

impl ModelBackend for GeminiClient {
    async fn generate(&self, request: ModelRequest) -> Result<String> {
        debug!("Sending flow '{}' to {}", request.flow, self.model);
        self.generate_content(
            &request.system_prompt,
            &request.prompt,
            request.response_schema,
        )
        .await
    }
}

/// Strip schema keywords Gemini does not understand, recursively.
pub fn sanitize_schema(mut schema: serde_json::Value) -> serde_json::Value {
    strip_keys(&mut schema);
    schema
}

fn strip_keys(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for key in UNSUPPORTED_SCHEMA_KEYS {
                map.remove(*key);
            }
            // `properties` maps field names to schemas; recurse into the values only so a
            // field literally named "title" or "format" survives.
            for (key, child) in map.iter_mut() {
                if key == "properties" {
                    if let serde_json::Value::Object(props) = child {
                        for prop in props.values_mut() {
                            strip_keys(prop);
                        }
                    }
                } else {
                    strip_keys(child);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                strip_keys(item);
            }
        }
        _ => {}
    }
}
