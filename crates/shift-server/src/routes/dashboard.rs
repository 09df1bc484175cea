use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use shift_core::clock::Clock;
use shift_core::store::Store;
use shift_core::{streak, task};

/// Everything the day view needs, derived from the store in one pass.
pub fn day_snapshot(
    store: &dyn Store,
    clock: &dyn Clock,
) -> shift_core::Result<serde_json::Value> {
    let tasks = task::load_today(store, clock)?;
    let week = streak::load_week(store);
    let today = clock.today();
    let phase = streak::DayPhase::of(week.iter().find(|d| d.date == today));
    let state = streak::load_streak(store);
    let next_milestone = streak::MILESTONES.iter().copied().find(|m| *m > state.current);

    Ok(serde_json::json!({
        "date": today,
        "tasks": tasks,
        "phase": phase,
        "streak": state,
        "identity": streak::identity_tier(state.current).label(),
        "week": week,
        "week_rate": streak::week_rate(&week),
        "next_milestone": next_milestone,
        "until_midnight_secs": clock.until_midnight().num_seconds(),
    }))
}

/// GET /api/dashboard — roll the day over if needed, then return the snapshot.
pub async fn get_dashboard(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (store, clock) = (app.store.clone(), app.clock.clone());
    let result = tokio::task::spawn_blocking(move || {
        streak::rollover(store.as_ref(), clock.as_ref())?;
        day_snapshot(store.as_ref(), clock.as_ref())
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
