//! `/chat/completions` endpoint.

use serde::{Deserialize, Serialize};

use super::Session;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCompletionParams {
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message inside a choice. `content` is `null` for some
/// tool-call replies, hence optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Serialize)]
struct Body<'a> {
    model: &'a str,
    #[serde(flatten)]
    params: &'a CreateCompletionParams,
}

/// Chat completion client bound to one model.
#[derive(Debug)]
pub struct Client {
    session: Session,
    model: String,
}

impl Client {
    pub fn new(session: Session, model: impl Into<String>) -> Self {
        Self {
            session,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_completion(
        &self,
        params: &CreateCompletionParams,
    ) -> Result<CreateCompletionResponse, EngineError> {
        let body = Body {
            model: &self.model,
            params,
        };
        self.session.post_json("chat/completions", &body).await
    }
}
