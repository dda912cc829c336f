use async_trait::async_trait;
use secrecy::SecretString;

use super::{Engine, InferContext, ModelType, Protocol, Request, Response};
use crate::error::EngineError;
use crate::openai::Session;
use crate::openai::completion::{Client, CreateParams, CreateResponse};

/// Engine for models served on `/completions`, e.g. `text-davinci-003`.
#[derive(Debug)]
pub struct CompletionEngine {
    client: Client,
}

impl CompletionEngine {
    pub fn new(api_key: impl Into<SecretString>, model: ModelType) -> Result<Self, EngineError> {
        Ok(Self::with_session(Session::new(api_key)?, model))
    }

    pub fn with_session(session: Session, model: ModelType) -> Self {
        if model.protocol() != Protocol::Completion {
            tracing::warn!(model = %model, "model is not served on the completion endpoint");
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
impl Engine for CompletionEngine {
    fn name(&self) -> &str {
        "openai-completion"
    }

    async fn infer(&self, ctx: &InferContext, request: &Request) -> Result<Response, EngineError> {
        let params = build_params(request)?;

        tracing::debug!(
            engine = self.name(),
            model = self.model(),
            temperature = params.temperature,
            max_tokens = params.max_tokens,
            message_count = request.messages.len(),
            "sending completion"
        );

        let resp = ctx.run(self.client.create(&params)).await?;
        extract_response(resp)
    }
}

/// The prompt is the first message's content. Roles have no meaning here.
fn build_params(request: &Request) -> Result<CreateParams, EngineError> {
    let first = request.first_message()?;
    Ok(CreateParams {
        prompt: vec![first.content().to_owned()],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    })
}

fn extract_response(resp: CreateResponse) -> Result<Response, EngineError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or(EngineError::EmptyResponse)?;
    Ok(Response { text: choice.text })
}
