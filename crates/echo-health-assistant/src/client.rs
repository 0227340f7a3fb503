//! Model abstraction shared by the remote client and test doubles.

use async_trait::async_trait;
use thiserror::Error;

use crate::message::Message;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("No usable API credential configured")]
    MissingCredential,

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model error: {0}")]
    Model(String),
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        AssistantError::InvalidResponse(err.to_string())
    }
}

pub type AssistantResult<T> = Result<T, AssistantError>;

/// Receives the cumulative response text each time it grows.
pub type TokenSink<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// A chat model that streams its answer.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Identifier recorded on consultation receipts.
    fn model_id(&self) -> &str;

    /// Answer the conversation in `history` (system prompt first, latest user
    /// message last). `on_token` sees every partial result; the full text is
    /// returned once the stream ends.
    ///
    /// Must fail promptly with [`AssistantError::MissingCredential`] when no
    /// credential is available rather than attempting a request.
    async fn stream_chat(&self, history: &[Message], on_token: TokenSink<'_>)
        -> AssistantResult<String>;
}
