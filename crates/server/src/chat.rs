use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use snapactivate_agent::{AgentRuntime, AssistantResponse, ChatRequest, Conversation};
use snapactivate_core::errors::ApplicationError;

use crate::api::{api_error, bad_request, correlation_id, ApiError};

/// Open conversations kept in memory; the least recently active one is
/// evicted when a new conversation would exceed this.
pub const MAX_OPEN_CONVERSATIONS: usize = 1024;

struct OpenConversation {
    conversation: Arc<Conversation>,
    last_active: Instant,
}

#[derive(Clone)]
pub struct ChatState {
    runtime: AgentRuntime,
    conversations: Arc<RwLock<HashMap<String, OpenConversation>>>,
    capacity: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationRequest {
    #[serde(default)]
    pub brand_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStarted {
    pub conversation_id: String,
    pub greeting: AssistantResponse,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

pub fn router(runtime: AgentRuntime) -> Router {
    router_with_capacity(runtime, MAX_OPEN_CONVERSATIONS)
}

pub fn router_with_capacity(runtime: AgentRuntime, capacity: usize) -> Router {
    Router::new()
        .route("/api/v1/chat", post(chat))
        .route("/api/v1/conversations", post(start_conversation))
        .route("/api/v1/conversations/{id}", delete(end_conversation))
        .route("/api/v1/conversations/{id}/messages", post(send_message))
        .with_state(ChatState {
            runtime,
            conversations: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        })
}

async fn chat(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<AssistantResponse>, ApiError> {
    let correlation_id = correlation_id();
    state
        .runtime
        .respond(&request)
        .await
        .map(Json)
        .map_err(|error| api_error(error, &correlation_id))
}

async fn start_conversation(
    State(state): State<ChatState>,
    Json(request): Json<StartConversationRequest>,
) -> Json<ConversationStarted> {
    let caller_id = request.brand_id.filter(|id| !id.trim().is_empty());
    let conversation = Conversation::start(state.runtime.clone(), caller_id);
    let conversation_id = conversation.id().to_string();
    let greeting = conversation.greeting();

    let mut conversations = state.conversations.write().await;
    while conversations.len() >= state.capacity {
        let Some(idle_id) = conversations
            .iter()
            .min_by_key(|(_, open)| open.last_active)
            .map(|(id, _)| id.clone())
        else {
            break;
        };
        conversations.remove(&idle_id);
        warn!(
            event_name = "api.conversation.evicted",
            correlation_id = %idle_id,
            capacity = state.capacity,
            "least recently active conversation evicted"
        );
    }
    conversations.insert(
        conversation_id.clone(),
        OpenConversation { conversation, last_active: Instant::now() },
    );
    drop(conversations);

    info!(
        event_name = "api.conversation.started",
        correlation_id = %conversation_id,
        "conversation started"
    );

    Json(ConversationStarted { conversation_id, greeting })
}

async fn send_message(
    Path(id): Path<String>,
    State(state): State<ChatState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<AssistantResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(bad_request("message text is required", &id));
    }

    let conversation = match state.conversations.write().await.get_mut(&id) {
        Some(open) => {
            open.last_active = Instant::now();
            open.conversation.clone()
        }
        None => return Err(conversation_not_found(&id)),
    };

    conversation.send(&request.text).await.map(Json).map_err(|error| api_error(error, &id))
}

async fn end_conversation(
    Path(id): Path<String>,
    State(state): State<ChatState>,
) -> Result<StatusCode, ApiError> {
    if state.conversations.write().await.remove(&id).is_none() {
        return Err(conversation_not_found(&id));
    }

    info!(event_name = "api.conversation.ended", correlation_id = %id, "conversation ended");
    Ok(StatusCode::NO_CONTENT)
}

fn conversation_not_found(id: &str) -> ApiError {
    api_error(ApplicationError::NotFound(format!("conversation {id}")), id)
}
