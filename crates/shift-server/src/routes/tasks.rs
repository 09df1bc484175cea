use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use shift_core::{streak, task, ShiftError};

#[derive(serde::Deserialize)]
pub struct AddTaskBody {
    pub text: String,
}

/// Run a mutation against today's task list, then re-derive the streak.
/// Every task route goes through here so the engine sees every change.
fn mutate_and_rederive<F>(
    app: &AppState,
    mutate: F,
) -> shift_core::Result<(Vec<task::Task>, streak::StreakUpdate)>
where
    F: FnOnce(&mut Vec<task::Task>) -> shift_core::Result<()>,
{
    let (store, clock) = (app.store.as_ref(), app.clock.as_ref());
    streak::rollover(store, clock)?;
    let mut tasks = task::load_today(store, clock)?;
    mutate(&mut tasks)?;
    task::save_today(store, clock, &tasks)?;
    let update = streak::apply_change(store, clock, &tasks)?;
    Ok((tasks, update))
}

fn response(tasks: Vec<task::Task>, update: streak::StreakUpdate) -> serde_json::Value {
    serde_json::json!({
        "tasks": tasks,
        "phase": update.phase,
        "streak": update.state,
        "identity": streak::identity_tier(update.state.current).label(),
        "week": update.week,
        "week_rate": update.week_rate,
        "milestone": update.milestone,
    })
}

/// POST /api/tasks — add a task to today's list.
pub async fn add_task(
    State(app): State<AppState>,
    Json(body): Json<AddTaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let (tasks, update) = mutate_and_rederive(&app, |tasks| {
            task::add_task(tasks, &body.text)?;
            Ok(())
        })?;
        Ok::<_, ShiftError>(response(tasks, update))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/tasks/:id/toggle — flip a task's completion flag.
pub async fn toggle_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let (tasks, update) = mutate_and_rederive(&app, |tasks| {
            task::toggle_task(tasks, &id)?;
            Ok(())
        })?;
        Ok::<_, ShiftError>(response(tasks, update))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/tasks/:id — remove a task from today's list.
pub async fn delete_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let (tasks, update) =
            mutate_and_rederive(&app, |tasks| task::delete_task(tasks, &id))?;
        Ok::<_, ShiftError>(response(tasks, update))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
