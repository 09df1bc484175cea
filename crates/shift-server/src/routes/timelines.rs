use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use gemini_client::{ChatTurn, TurnRole};
use shift_core::context::build_context;
use shift_core::timeline::{Role, TimelineSet};

/// Canned assistant reply recorded when the provider call fails, so the
/// conversation stays consistent and the client still gets a 200.
const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(serde::Deserialize)]
pub struct CreateTimelineBody {
    pub name: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct RenameTimelineBody {
    pub name: String,
}

#[derive(serde::Deserialize)]
pub struct PostMessageBody {
    pub content: String,
}

/// Run store-backed timeline work off the async runtime.
async fn blocking<F>(work: F) -> Result<Json<serde_json::Value>, AppError>
where
    F: FnOnce() -> Result<serde_json::Value, AppError> + Send + 'static,
{
    let value = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(value))
}

/// GET /api/timelines — the whole collection plus the active id.
pub async fn list_timelines(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    blocking(move || {
        let set = TimelineSet::load(app.store.as_ref(), app.clock.as_ref());
        set.save(app.store.as_ref())?;
        Ok(serde_json::to_value(&set)?)
    })
    .await
}

/// POST /api/timelines — create a timeline (blank name auto-numbers).
pub async fn create_timeline(
    State(app): State<AppState>,
    Json(body): Json<CreateTimelineBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    blocking(move || {
        let mut set = TimelineSet::load(app.store.as_ref(), app.clock.as_ref());
        let id = set.create(app.clock.as_ref(), body.name.as_deref());
        set.save(app.store.as_ref())?;
        Ok(serde_json::json!({
            "id": id,
            "timeline": set.get(&id)?,
        }))
    })
    .await
}

/// PATCH /api/timelines/:id — rename.
pub async fn rename_timeline(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RenameTimelineBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    blocking(move || {
        let mut set = TimelineSet::load(app.store.as_ref(), app.clock.as_ref());
        set.rename(&id, &body.name)?;
        set.save(app.store.as_ref())?;
        Ok(serde_json::json!({ "id": id, "name": body.name.trim() }))
    })
    .await
}

/// DELETE /api/timelines/:id — delete (409 when it is the last one).
pub async fn delete_timeline(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    blocking(move || {
        let mut set = TimelineSet::load(app.store.as_ref(), app.clock.as_ref());
        set.delete(&id)?;
        set.save(app.store.as_ref())?;
        Ok(serde_json::json!({ "active_id": set.active_id }))
    })
    .await
}

/// POST /api/timelines/:id/select — make a timeline active.
pub async fn select_timeline(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    blocking(move || {
        let mut set = TimelineSet::load(app.store.as_ref(), app.clock.as_ref());
        set.select(&id)?;
        set.save(app.store.as_ref())?;
        Ok(serde_json::json!({ "active_id": set.active_id }))
    })
    .await
}

/// POST /api/timelines/:id/messages — append a user message, round-trip the
/// conversation through the provider, and record the assistant reply.
///
/// A provider failure is not an HTTP failure: the fallback reply is appended
/// and returned with 200 so the conversation never loses the user's turn.
pub async fn post_message(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PostMessageBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let content = body.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::bad_request("message content is required"));
    }
    let client = app
        .gemini
        .clone()
        .ok_or_else(|| AppError::config("no API key configured for planner chat"))?;

    let prep_app = app.clone();
    let prep_id = id.clone();
    let prep_content = content.clone();
    let turns = tokio::task::spawn_blocking(move || {
        let store = prep_app.store.as_ref();
        let clock = prep_app.clock.as_ref();
        let set = TimelineSet::load(store, clock);

        let mut turns: Vec<ChatTurn> = Vec::new();
        let context = build_context(store, clock);
        if !context.is_empty() {
            turns.push(ChatTurn {
                role: TurnRole::User,
                content: format!("Context about the author: {context}"),
            });
            turns.push(ChatTurn {
                role: TurnRole::Assistant,
                content: "Got it. I'll keep that in mind while we plan.".to_string(),
            });
        }
        // The provider requires the first turn to come from the user, so
        // without a context turn the leading assistant greeting is skipped.
        let mut seen_user = !turns.is_empty();
        for message in &set.get(&prep_id)?.messages {
            let role = match message.role {
                Role::User => TurnRole::User,
                Role::Assistant => TurnRole::Assistant,
            };
            if !seen_user {
                if role != TurnRole::User {
                    continue;
                }
                seen_user = true;
            }
            turns.push(ChatTurn {
                role,
                content: message.content.clone(),
            });
        }
        turns.push(ChatTurn {
            role: TurnRole::User,
            content: prep_content,
        });
        Ok::<_, AppError>(turns)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let reply = match client.chat(&turns).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("planner chat failed: {e}");
            FALLBACK_REPLY.to_string()
        }
    };

    blocking(move || {
        let store = app.store.as_ref();
        let clock = app.clock.as_ref();
        let mut set = TimelineSet::load(store, clock);
        set.append_message(clock, &id, Role::User, &content)?;
        set.append_message(clock, &id, Role::Assistant, &reply)?;
        set.save(store)?;
        Ok(serde_json::json!({
            "response": reply,
            "timeline": set.get(&id)?,
        }))
    })
    .await
}

/// POST /api/timelines/:id/export — hand the last assistant reply to the
/// content generator as a draft.
pub async fn export_draft(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    blocking(move || {
        let set = TimelineSet::load(app.store.as_ref(), app.clock.as_ref());
        let draft = set.export_draft(app.store.as_ref(), app.clock.as_ref(), &id)?;
        Ok(serde_json::to_value(&draft)?)
    })
    .await
}
