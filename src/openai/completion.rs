//! Legacy `/completions` endpoint.

use serde::{Deserialize, Serialize};

use super::Session;
use crate::error::EngineError;

#[derive(Debug, Clone, Serialize)]
pub struct CreateParams {
    pub prompt: Vec<String>,
    pub temperature: f64,
    pub max_tokens: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Serialize)]
struct Body<'a> {
    model: &'a str,
    #[serde(flatten)]
    params: &'a CreateParams,
}

/// Text completion client bound to one model.
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

    pub async fn create(&self, params: &CreateParams) -> Result<CreateResponse, EngineError> {
        let body = Body {
            model: &self.model,
            params,
        };
        self.session.post_json("completions", &body).await
    }
}
