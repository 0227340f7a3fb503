//! Scripted model for exercising the pipeline without a network.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::client::{AssistantError, AssistantResult, ChatModel, TokenSink};
use crate::message::Message;

enum Script {
    Chunks(Vec<String>),
    Fail(String),
}

/// Replays fixed chunks, or fails, on every call.
pub struct MockChatModel {
    script: Script,
    calls: AtomicUsize,
}

impl MockChatModel {
    pub const MODEL_ID: &'static str = "mock-model";

    /// Streams `chunks` in order; the answer is their concatenation.
    pub fn streaming<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Script::Chunks(chunks.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with a model error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            script: Script::Fail(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the model was asked to answer.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn model_id(&self) -> &str {
        Self::MODEL_ID
    }

    async fn stream_chat(
        &self,
        _history: &[Message],
        on_token: TokenSink<'_>,
    ) -> AssistantResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Fail(reason) => Err(AssistantError::Model(reason.clone())),
            Script::Chunks(chunks) => {
                let mut text = String::new();
                for chunk in chunks {
                    text.push_str(chunk);
                    on_token(&text);
                    tokio::task::yield_now().await;
                }
                if text.is_empty() {
                    Err(AssistantError::EmptyResponse)
                } else {
                    Ok(text)
                }
            }
        }
    }
}
