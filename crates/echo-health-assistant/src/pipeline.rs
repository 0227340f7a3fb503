//! Conversation pipeline: transcript, turn state, fallback and receipts.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use chrono::Utc;
use echo_health_core::models::summarize_prompt;
use echo_health_core::{Digester, KeyValueStore, NewConsultationReceipt, Sha256Digester, SharedStore};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::client::{AssistantError, AssistantResult, ChatModel};
use crate::config::AssistantConfig;
use crate::fallback::{word_ends, FallbackResponder};
use crate::gemini::GeminiClient;
use crate::message::{ensure_system_prompt, seed_transcript, Message};
use crate::prompts::{AGENT_TYPE, DISCLAIMER, MISSING_CREDENTIAL_NOTICE, SERVICE_UNAVAILABLE_NOTICE};

/// Notifications published to subscribers while a turn runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// The user's message was appended to the transcript.
    UserMessage(Message),
    TypingChanged(bool),
    /// Cumulative text of the reply being produced.
    Token(String),
    /// The finished reply was appended to the transcript.
    AssistantMessage(Message),
    /// The remote service failed; later turns answer offline.
    Degraded { reason: String },
    /// The transcript was reset to its seed.
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingResponse,
}

/// Why a reply came from the offline responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    MissingCredential,
    ServiceUnavailable,
}

impl FallbackReason {
    pub fn notice(self) -> &'static str {
        match self {
            FallbackReason::MissingCredential => MISSING_CREDENTIAL_NOTICE,
            FallbackReason::ServiceUnavailable => SERVICE_UNAVAILABLE_NOTICE,
        }
    }
}

/// Drives the Dr. Echo conversation.
///
/// `send_message` takes `&mut self`, so at most one turn is in flight per
/// pipeline. Every accepted message produces exactly one assistant reply:
/// remote when possible, the offline responder otherwise. A remote failure
/// switches the pipeline into degraded mode for the rest of its life.
pub struct AssistantPipeline<M: ChatModel> {
    model: M,
    config: AssistantConfig,
    store: SharedStore,
    transcript_storage: Mutex<Box<dyn KeyValueStore>>,
    digester: Box<dyn Digester>,
    messages: Vec<Message>,
    turn: TurnState,
    degraded: bool,
    subscribers: Vec<UnboundedSender<ChatEvent>>,
}

impl AssistantPipeline<GeminiClient> {
    /// Pipeline backed by the Gemini client built from `config`.
    pub fn gemini(
        config: AssistantConfig,
        store: SharedStore,
        transcript_storage: impl KeyValueStore + 'static,
    ) -> AssistantResult<Self> {
        let client = GeminiClient::new(config.clone())?;
        Ok(Self::new(client, config, store, transcript_storage))
    }
}

impl<M: ChatModel> AssistantPipeline<M> {
    /// Build a pipeline, restoring any transcript saved under
    /// `config.transcript_key`.
    pub fn new(
        model: M,
        config: AssistantConfig,
        store: SharedStore,
        transcript_storage: impl KeyValueStore + 'static,
    ) -> Self {
        let messages = restore_transcript(&transcript_storage, &config.transcript_key);
        Self {
            model,
            config,
            store,
            transcript_storage: Mutex::new(Box::new(transcript_storage)),
            digester: Box::new(Sha256Digester),
            messages,
            turn: TurnState::Idle,
            degraded: false,
            subscribers: Vec::new(),
        }
    }

    pub fn with_digester(mut self, digester: impl Digester + 'static) -> Self {
        self.digester = Box::new(digester);
        self
    }

    /// Receive [`ChatEvent`]s from now on. Dropping the receiver is fine.
    pub fn subscribe(&mut self) -> UnboundedReceiver<ChatEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> TurnState {
        self.turn
    }

    pub fn is_typing(&self) -> bool {
        self.turn == TurnState::AwaitingResponse
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Run one conversational turn. Blank input is ignored.
    pub async fn send_message(&mut self, text: &str) {
        let prompt = text.trim();
        if prompt.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| !tx.is_closed());

        let user = Message::user(prompt);
        self.messages.push(user.clone());
        self.persist_transcript();
        self.emit(ChatEvent::UserMessage(user));
        self.set_turn(TurnState::AwaitingResponse);

        let reply = self.produce_reply(prompt).await;

        let assistant = Message::assistant(reply);
        self.messages.push(assistant.clone());
        self.persist_transcript();
        self.emit(ChatEvent::AssistantMessage(assistant));
        self.set_turn(TurnState::Idle);
    }

    /// Reset to the system prompt and welcome message and drop the saved
    /// transcript. Degraded mode is unaffected.
    pub fn clear_messages(&mut self) {
        self.messages = seed_transcript();
        match self.transcript_storage.lock() {
            Ok(storage) => {
                if let Err(err) = storage.remove(&self.config.transcript_key) {
                    warn!(error = %err, "failed to remove saved transcript");
                }
            }
            Err(_) => warn!("transcript storage lock poisoned"),
        }
        self.emit(ChatEvent::Cleared);
    }

    async fn produce_reply(&mut self, prompt: &str) -> String {
        if self.degraded {
            return self.fallback_reply(prompt, FallbackReason::ServiceUnavailable).await;
        }
        if !self.config.has_valid_credential() {
            return self.fallback_reply(prompt, FallbackReason::MissingCredential).await;
        }

        match self.remote_reply().await {
            Ok(text) => {
                self.record_receipt(prompt, &text);
                text
            }
            Err(AssistantError::MissingCredential) => {
                self.fallback_reply(prompt, FallbackReason::MissingCredential).await
            }
            Err(err) => {
                warn!(error = %err, model = self.model.model_id(), "remote model failed, switching to offline mode");
                self.degraded = true;
                self.emit(ChatEvent::Degraded {
                    reason: err.to_string(),
                });
                self.fallback_reply(prompt, FallbackReason::ServiceUnavailable).await
            }
        }
    }

    async fn remote_reply(&self) -> AssistantResult<String> {
        let subscribers = &self.subscribers;
        let on_token = |partial: &str| broadcast(subscribers, ChatEvent::Token(partial.to_string()));

        tokio::time::timeout(
            self.config.request_timeout,
            self.model.stream_chat(&self.messages, &on_token),
        )
        .await
        .map_err(|_| AssistantError::Timeout)?
    }

    /// Canned answer plus a disclosure, streamed word by word.
    async fn fallback_reply(&self, prompt: &str, reason: FallbackReason) -> String {
        debug!(?reason, "answering offline");
        let mut reply = FallbackResponder::respond(prompt).to_string();
        reply.push_str(reason.notice());

        let delay = self.config.fallback_token_delay;
        for end in word_ends(&reply) {
            self.emit(ChatEvent::Token(reply[..end].to_string()));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        reply
    }

    /// Best effort: a failed receipt never fails the turn.
    fn record_receipt(&self, prompt: &str, response: &str) {
        let response_hash =
            match panic::catch_unwind(AssertUnwindSafe(|| self.digester.digest(response))) {
                Ok(Ok(hash)) => hash,
                Ok(Err(err)) => {
                    warn!(error = %err, "consultation receipt skipped");
                    return;
                }
                Err(_) => {
                    warn!("consultation receipt skipped: digester panicked");
                    return;
                }
            };

        let receipt = NewConsultationReceipt {
            timestamp: Utc::now(),
            agent_type: AGENT_TYPE.to_string(),
            prompt_summary: summarize_prompt(prompt),
            response_hash,
            model_version: self.model.model_id().to_string(),
            disclaimer: DISCLAIMER.to_string(),
        };
        match self.store.lock() {
            Ok(mut store) => {
                let id = store.add_consultation_receipt(receipt);
                debug!(receipt_id = %id, algorithm = self.digester.algorithm(), "consultation receipt recorded");
            }
            Err(_) => warn!("consultation receipt skipped: store lock poisoned"),
        }
    }

    /// Save once the user has said something; the bare seed is never written.
    fn persist_transcript(&self) {
        if self.messages.len() <= 2 {
            return;
        }
        let blob = match serde_json::to_string(&self.messages) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(error = %err, "failed to serialize transcript");
                return;
            }
        };
        match self.transcript_storage.lock() {
            Ok(storage) => {
                if let Err(err) = storage.write(&self.config.transcript_key, &blob) {
                    warn!(error = %err, "failed to save transcript");
                }
            }
            Err(_) => warn!("transcript storage lock poisoned"),
        }
    }

    fn set_turn(&mut self, turn: TurnState) {
        if self.turn != turn {
            self.turn = turn;
            self.emit(ChatEvent::TypingChanged(turn == TurnState::AwaitingResponse));
        }
    }

    fn emit(&self, event: ChatEvent) {
        broadcast(&self.subscribers, event);
    }
}

/// Send to every live subscriber. Closed receivers are skipped.
fn broadcast(subscribers: &[UnboundedSender<ChatEvent>], event: ChatEvent) {
    for tx in subscribers {
        let _ = tx.send(event.clone());
    }
}

fn restore_transcript(storage: &dyn KeyValueStore, key: &str) -> Vec<Message> {
    let blob = match storage.read(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return seed_transcript(),
        Err(err) => {
            warn!(error = %err, "failed to read saved transcript");
            return seed_transcript();
        }
    };
    match serde_json::from_str::<Vec<Message>>(&blob) {
        Ok(mut messages) if !messages.is_empty() => {
            if ensure_system_prompt(&mut messages) {
                info!("restored transcript was missing its system prompt");
            }
            messages
        }
        Ok(_) => seed_transcript(),
        Err(err) => {
            warn!(error = %err, "discarding unreadable transcript");
            seed_transcript()
        }
    }
}
