use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use gemini_client::{ChatTurn, TurnRole};
use shift_core::context::build_context;
use shift_core::prompt::{build_content_prompt, Platform};
use shift_core::{keys, store};

#[derive(serde::Deserialize)]
pub struct ContentBody {
    pub platform: String,
    pub task: String,
    pub tone: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct PlanBody {
    pub messages: Vec<PlanMessage>,
}

#[derive(serde::Deserialize)]
pub struct PlanMessage {
    pub role: String,
    pub content: String,
}

/// POST /api/ai/content — generate a platform-shaped post for a task.
///
/// The prompt carries the derived activity context so the output reflects
/// the author's actual streak and recent work. Nothing from the request is
/// persisted; only the auto-generation marker is recorded.
pub async fn generate_content(
    State(app): State<AppState>,
    Json(body): Json<ContentBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let task = body.task.trim().to_string();
    if task.is_empty() {
        return Err(AppError::bad_request("task is required"));
    }
    let platform: Platform = body.platform.parse()?;
    let client = app
        .gemini
        .clone()
        .ok_or_else(|| AppError::config("no API key configured for content generation"))?;

    let prompt_app = app.clone();
    let tone = body.tone;
    let prompt = tokio::task::spawn_blocking(move || {
        let context = build_context(prompt_app.store.as_ref(), prompt_app.clock.as_ref());
        let context = (!context.is_empty()).then_some(context.as_str());
        build_content_prompt(platform, &task, tone.as_deref(), context)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    let content = client
        .generate(&prompt)
        .await
        .map_err(|e| AppError::upstream("Failed to generate content", e.to_string()))?;

    tokio::task::spawn_blocking(move || {
        store::write_json(app.store.as_ref(), keys::LAST_AUTO_GEN, &app.clock.today())
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "content": content })))
}

/// POST /api/ai/plan — stateless chat completion over the supplied turns.
///
/// The caller owns the conversation; every turn is forwarded in the order
/// given and the reply is returned without storing either side.
pub async fn plan_chat(
    State(app): State<AppState>,
    Json(body): Json<PlanBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.messages.is_empty() {
        return Err(AppError::bad_request("messages must not be empty"));
    }
    let client = app
        .gemini
        .clone()
        .ok_or_else(|| AppError::config("no API key configured for planner chat"))?;

    let mut turns: Vec<ChatTurn> = Vec::with_capacity(body.messages.len());
    for message in &body.messages {
        let role = match message.role.as_str() {
            "user" => TurnRole::User,
            "assistant" | "model" => TurnRole::Assistant,
            other => {
                return Err(AppError::bad_request(format!("unknown role: {other}")));
            }
        };
        turns.push(ChatTurn {
            role,
            content: message.content.clone(),
        });
    }

    let response = client
        .chat(&turns)
        .await
        .map_err(|e| AppError::upstream("Failed to generate response", e.to_string()))?;

    Ok(Json(serde_json::json!({ "response": response })))
}
