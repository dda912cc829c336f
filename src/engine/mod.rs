pub mod chat;
pub mod completion;
pub mod model;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::openai::Session;

pub use chat::ChatEngine;
pub use completion::CompletionEngine;
pub use model::{ModelType, Protocol};

/// A role-tagged message. The role is an open tag and is never validated;
/// completion backends ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: String,
    content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Backend-agnostic inference request.
///
/// Engines forward only `messages[0]`; trailing messages are ignored.
/// `temperature` and `max_tokens` are passed through as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: i64,
}

impl Request {
    pub fn new(messages: Vec<Message>, temperature: f64, max_tokens: i64) -> Self {
        Self {
            messages,
            temperature,
            max_tokens,
        }
    }

    /// The message engines forward. Fails locally on an empty request so no
    /// network call is made.
    pub fn first_message(&self) -> Result<&Message, EngineError> {
        self.messages.first().ok_or(EngineError::EmptyRequest)
    }
}

/// Text of the backend's first choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
}

/// Per-call deadline. Dropping the `infer` future cancels the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferContext {
    deadline: Option<Instant>,
}

impl InferContext {
    /// No deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `call` to completion, or fail with `DeadlineExceeded`.
    pub(crate) async fn run<F, T>(&self, call: F) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, EngineError>>,
    {
        match self.deadline {
            None => call.await,
            Some(deadline) => tokio::time::timeout_at(deadline, call)
                .await
                .map_err(|_| EngineError::DeadlineExceeded)?,
        }
    }
}

/// Extension point for inference backends. Callers hold a `dyn Engine` and
/// never depend on the concrete adapter.
///
/// Each `infer` makes exactly one outbound call. No retries, no caching.
#[async_trait]
pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    async fn infer(&self, ctx: &InferContext, request: &Request) -> Result<Response, EngineError>;
}

/// Build the engine matching the configured model's protocol family.
pub fn build_engine(config: &EngineConfig) -> Result<Box<dyn Engine>, EngineError> {
    let session = Session::with_options(config.resolve_api_key()?, &config.base_url, config.timeout)?;

    let engine: Box<dyn Engine> = match config.model.protocol() {
        Protocol::Chat => Box::new(ChatEngine::with_session(session, config.model)),
        Protocol::Completion => Box::new(CompletionEngine::with_session(session, config.model)),
    };

    tracing::info!(engine = engine.name(), model = %config.model, "engine ready");
    Ok(engine)
}
