//! Uniform inference over OpenAI's chat and completion endpoints.
//!
//! Callers build a [`Request`], hand it to any [`Engine`], and get back a
//! [`Response`]. [`ChatEngine`] and [`CompletionEngine`] translate to and from
//! each endpoint's native shape; [`build_engine`] picks the right one from a
//! model identifier.

pub mod config;
pub mod engine;
pub mod error;
pub mod openai;

pub use config::EngineConfig;
pub use engine::{
    ChatEngine, CompletionEngine, Engine, InferContext, Message, ModelType, Protocol, Request,
    Response, build_engine,
};
pub use error::EngineError;
pub use openai::Session;
