//! Dr. Echo, the conversational wellness assistant.
//!
//! Streams answers from a remote chat model and falls back to an offline
//! keyword responder whenever the model is unconfigured or unreachable.
//! Successful remote answers leave a consultation receipt in the health store.
//!
//! ```text
//! send_message ──► AssistantPipeline ──► ChatModel (Gemini / mock)
//!                     │        │                 │ failure
//!                     │        │                 ▼
//!                     │        └──────► FallbackResponder
//!                     ▼
//!        transcript (KeyValueStore) + receipts (SharedStore)
//! ```

pub mod client;
pub mod config;
pub mod fallback;
pub mod gemini;
pub mod message;
pub mod mock;
pub mod pipeline;
pub mod prompts;

pub use client::{AssistantError, AssistantResult, ChatModel, TokenSink};
pub use config::AssistantConfig;
pub use fallback::FallbackResponder;
pub use gemini::GeminiClient;
pub use message::{Message, Role};
pub use mock::MockChatModel;
pub use pipeline::{AssistantPipeline, ChatEvent, FallbackReason, TurnState};
pub use prompts::*;
