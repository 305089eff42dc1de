//! One user's conversation with the assistant.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::llm::ConversationTurn;
use crate::response::AssistantResponse;
use crate::runtime::{AgentError, AgentRuntime, ChatRequest};

pub const FAILURE_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Generating,
}

/// History is only mutated while the history lock is held, so concurrent
/// `send` calls run one at a time in arrival order.
pub struct Conversation {
    id: String,
    caller_id: Option<String>,
    runtime: AgentRuntime,
    history: Mutex<Vec<ConversationTurn>>,
    generating: AtomicBool,
}

struct GeneratingGuard<'a>(&'a AtomicBool);

impl<'a> GeneratingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Conversation {
    pub fn start(runtime: AgentRuntime, caller_id: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4().to_string(),
            caller_id,
            runtime,
            history: Mutex::new(Vec::new()),
            generating: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn caller_id(&self) -> Option<&str> {
        self.caller_id.as_deref()
    }

    pub fn greeting(&self) -> AssistantResponse {
        AssistantResponse::greeting()
    }

    pub fn state(&self) -> ConversationState {
        if self.generating.load(Ordering::SeqCst) {
            ConversationState::Generating
        } else {
            ConversationState::Idle
        }
    }

    pub async fn history(&self) -> Vec<ConversationTurn> {
        self.history.lock().await.clone()
    }

    /// Appends the user's message, runs one turn and appends the model's reply.
    /// A failed turn appends the fixed apology so roles keep alternating.
    pub async fn send(&self, text: &str) -> Result<AssistantResponse, AgentError> {
        let mut history = self.history.lock().await;
        let _generating = GeneratingGuard::enter(&self.generating);

        history.push(ConversationTurn::user(text.trim()));
        let request = ChatRequest { history: history.clone(), caller_id: self.caller_id.clone() };

        let result = self.runtime.respond(&request).await;
        match &result {
            Ok(reply) => history.push(ConversationTurn::model(reply.history_text())),
            Err(_) => history.push(ConversationTurn::model(FAILURE_APOLOGY)),
        }
        result
    }
}
