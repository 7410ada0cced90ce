//! OpenAI Chat Completions compatible (`/chat/completions`) completion service.
//!
//! Any endpoint that speaks the Chat Completions wire format can be targeted
//! through `base_url`. HTTP status codes are mapped onto `DiariskError`
//! variants so the caller can tell authentication, rate limiting, and
//! transport failures apart.

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, warn};

use diarisk_contracts::{
    completion::{CompletionChoice, CompletionRequest, CompletionResponse},
    error::{DiariskError, DiariskResult},
};
use diarisk_core::traits::CompletionService;

use crate::config::ServiceConfig;

/// Blocking client for an OpenAI-compatible chat completion endpoint.
pub struct OpenAiCompletionService {
    client: reqwest::blocking::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompletionService {
    /// Build a service from `config`, reading the API key from the
    /// environment variable it names.
    ///
    /// A missing key is not an error here: the request is sent without
    /// credentials and the service's authentication failure is reported.
    pub fn from_config(config: &ServiceConfig) -> DiariskResult<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| DiariskError::Config {
            reason: format!("failed to build HTTP client: {}", e),
        })?;

        let api_key = config.api_key();
        if api_key.is_none() {
            warn!(api_key_env = %config.api_key_env, "no API key set; sending unauthenticated request");
        }

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CompletionService for OpenAiCompletionService {
    fn complete(&self, request: &CompletionRequest) -> DiariskResult<CompletionResponse> {
        let payload = request_payload(&self.model, request);

        let mut builder = self.client.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().map_err(|e| DiariskError::Transport {
            reason: format!("HTTP request failed: {}", e),
        })?;

        let status = response.status();
        let body = response.text().map_err(|e| DiariskError::Transport {
            reason: format!("failed to read response body: {}", e),
        })?;

        debug!(status = status.as_u16(), bytes = body.len(), "chat completion response");

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        parse_response(&body)
    }
}

/// Build the Chat Completions request body.
pub fn request_payload(model: &str, request: &CompletionRequest) -> Value {
    let mut payload = json!({
        "model": model,
        "messages": request.messages,
        "temperature": request.temperature,
    });
    if request.json_mode {
        payload["response_format"] = json!({ "type": "json_object" });
    }
    payload
}

/// Decode a successful Chat Completions response body.
///
/// An empty `choices` array decodes to an empty response; deciding whether
/// that is usable is the caller's job.
pub fn parse_response(body: &str) -> DiariskResult<CompletionResponse> {
    let v: Value = serde_json::from_str(body).map_err(|e| DiariskError::MalformedResponse {
        reason: format!("response is not JSON: {}", e),
    })?;

    if let Some(err) = v.get("error").filter(|e| !e.is_null()) {
        let msg = err["message"].as_str().unwrap_or("unknown error");
        return Err(DiariskError::MalformedResponse {
            reason: format!("service reported an error: {}", msg),
        });
    }

    let choices = v["choices"]
        .as_array()
        .ok_or_else(|| DiariskError::MalformedResponse {
            reason: "response has no 'choices' array".to_string(),
        })?;

    Ok(CompletionResponse {
        choices: choices
            .iter()
            .map(|c| CompletionChoice {
                content: c["message"]["content"].as_str().map(str::to_owned),
            })
            .collect(),
    })
}

/// Map a non-success status to an error, preferring the service's own
/// `error.message` text.
fn status_error(status: StatusCode, body: &str) -> DiariskError {
    let reason = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body.trim()));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DiariskError::Authentication { reason },
        StatusCode::TOO_MANY_REQUESTS => DiariskError::RateLimited { reason },
        _ => DiariskError::Service {
            status: status.as_u16(),
            reason,
        },
    }
}
