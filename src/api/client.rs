//! Completion client seam.
//!
//! The orchestrator talks to the model through [`CompletionClient`] so the
//! HTTP transport can be swapped for a fake in tests. [`GeminiClient`] is the
//! production implementation against the `generateContent` endpoint.

use async_trait::async_trait;
use tracing::debug;

use crate::api::{
    summarize_error_body, Content, GenerateContentRequest, GenerateContentResponse, Part,
    SystemInstruction,
};
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Role of a turn as the completion endpoint names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionTurn {
    pub role: TurnRole,
    pub text: String,
}

impl CompletionTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// One request/response exchange: ordered turns plus an optional system
/// instruction. The last turn is the new user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub turns: Vec<CompletionTurn>,
    pub system_instruction: Option<String>,
}

impl CompletionRequest {
    pub fn new(turns: Vec<CompletionTurn>, system_instruction: Option<String>) -> Self {
        Self {
            turns,
            system_instruction,
        }
    }

    /// A single user turn with no system instruction.
    pub fn single(text: impl Into<String>) -> Self {
        Self::new(vec![CompletionTurn::user(text)], None)
    }

    pub fn to_wire(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self
                .turns
                .iter()
                .map(|turn| Content {
                    role: turn.role.as_str().to_string(),
                    parts: vec![Part {
                        text: turn.text.clone(),
                    }],
                })
                .collect(),
            system_instruction: self.system_instruction.as_ref().map(|text| SystemInstruction {
                parts: vec![Part { text: text.clone() }],
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-2xx status.
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The body could not be decoded or carried no reply text.
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one request and return the generated reply text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/models/{model}:generateContent`, without the key parameter.
    pub fn endpoint(&self) -> String {
        construct_api_url(
            &self.base_url,
            &format!("models/{}:generateContent", self.model),
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let endpoint = self.endpoint();
        debug!(
            model = %self.model,
            turns = request.turns.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request.to_wire())
            .send()
            .await
            .map_err(|err| CompletionError::Network(err.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message: summarize_error_body(&body),
            });
        }

        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| CompletionError::Malformed(err.without_url().to_string()))?;

        payload
            .first_text()
            .map(str::to_owned)
            .ok_or_else(|| CompletionError::Malformed("response carried no candidate text".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_model_without_double_slashes() {
        let client = GeminiClient::new("key")
            .with_base_url("https://example.test/v1beta/")
            .with_model("gemini-test");
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn defaults_target_public_endpoint() {
        let client = GeminiClient::new("key");
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn to_wire_maps_roles_and_instruction() {
        let request = CompletionRequest::new(
            vec![
                CompletionTurn::user("hi"),
                CompletionTurn::model("hello"),
                CompletionTurn::user("how are you"),
            ],
            Some("be kind".into()),
        );
        let wire = request.to_wire();
        let roles: Vec<&str> = wire.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(wire.contents[2].parts[0].text, "how are you");
        assert_eq!(
            wire.system_instruction.unwrap().parts[0].text,
            "be kind".to_string()
        );
    }

    #[test]
    fn single_request_has_no_instruction() {
        let request = CompletionRequest::single("translate");
        assert_eq!(request.turns, vec![CompletionTurn::user("translate")]);
        assert!(request.to_wire().system_instruction.is_none());
    }
}
