use async_trait::async_trait;
use secrecy::SecretString;

use super::{Engine, InferContext, ModelType, Protocol, Request, Response};
use crate::error::EngineError;
use crate::openai::Session;
use crate::openai::chat::{Client, CreateCompletionParams, CreateCompletionResponse, Message};

/// Engine for models served on `/chat/completions`, e.g. `gpt-4`,
/// `gpt-3.5-turbo`.
#[derive(Debug)]
pub struct ChatEngine {
    client: Client,
}

impl ChatEngine {
    pub fn new(api_key: impl Into<SecretString>, model: ModelType) -> Result<Self, EngineError> {
        Ok(Self::with_session(Session::new(api_key)?, model))
    }

    /// The caller picks the engine type. A completion-family model is
    /// accepted here but the backend will likely reject it.
    pub fn with_session(session: Session, model: ModelType) -> Self {
        if model.protocol() != Protocol::Chat {
            tracing::warn!(model = %model, "model is not served on the chat endpoint");
        }
        Self {
            client: Client::new(session, model.as_str()),
        }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl Engine for ChatEngine {
    fn name(&self) -> &str {
        "openai-chat"
    }

    async fn infer(&self, ctx: &InferContext, request: &Request) -> Result<Response, EngineError> {
        let params = build_params(request)?;

        tracing::debug!(
            engine = self.name(),
            model = self.model(),
            temperature = params.temperature,
            max_tokens = params.max_tokens,
            message_count = request.messages.len(),
            "sending chat completion"
        );

        let resp = ctx.run(self.client.create_completion(&params)).await?;
        extract_response(resp)
    }
}

/// Only the first message is forwarded, role and content verbatim.
fn build_params(request: &Request) -> Result<CreateCompletionParams, EngineError> {
    let first = request.first_message()?;
    Ok(CreateCompletionParams {
        messages: vec![Message {
            role: first.role().to_owned(),
            content: first.content().to_owned(),
        }],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    })
}

fn extract_response(resp: CreateCompletionResponse) -> Result<Response, EngineError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or(EngineError::EmptyResponse)?;
    Ok(Response {
        text: choice.message.content.unwrap_or_default(),
    })
}
