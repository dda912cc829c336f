//! Thin client for the OpenAI HTTP API.
//!
//! Owns the wire format: URLs, bearer authentication, JSON bodies. Engines
//! only see the typed parameter and response structs in [`chat`] and
//! [`completion`].

pub mod chat;
pub mod completion;

use std::time::Duration;

use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::EngineError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Credential plus pooled HTTP client. Safe to share across concurrent calls.
pub struct Session {
    http: HttpClient,
    api_key: SecretString,
    base_url: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self, EngineError> {
        Self::with_options(api_key, DEFAULT_BASE_URL, None)
    }

    /// Session against a custom endpoint. `timeout` bounds every request made
    /// through this session.
    pub fn with_options(
        api_key: impl Into<SecretString>,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, EngineError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` as JSON to `{base_url}/{endpoint}` and decode the reply.
    pub(crate) async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R, EngineError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{endpoint}", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "failed to read error response body");
                    String::new()
                }
            };
            tracing::warn!(url = %url, status = status.as_u16(), "backend returned error status");
            return Err(EngineError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
