pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        // Tasks
        .route("/api/tasks", post(routes::tasks::add_task))
        .route("/api/tasks/{id}/toggle", post(routes::tasks::toggle_task))
        .route("/api/tasks/{id}", delete(routes::tasks::delete_task))
        // Timelines
        .route("/api/timelines", get(routes::timelines::list_timelines))
        .route("/api/timelines", post(routes::timelines::create_timeline))
        .route(
            "/api/timelines/{id}",
            patch(routes::timelines::rename_timeline),
        )
        .route(
            "/api/timelines/{id}",
            delete(routes::timelines::delete_timeline),
        )
        .route(
            "/api/timelines/{id}/select",
            post(routes::timelines::select_timeline),
        )
        .route(
            "/api/timelines/{id}/messages",
            post(routes::timelines::post_message),
        )
        .route(
            "/api/timelines/{id}/export",
            post(routes::timelines::export_draft),
        )
        // AI proxies
        .route("/api/ai/content", post(routes::ai::generate_content))
        .route("/api/ai/plan", post(routes::ai::plan_chat))
        .layer(cors)
        .with_state(app_state)
}

/// Start the Shift API server.
pub async fn serve(app_state: AppState, port: u16) -> anyhow::Result<()> {
    let app = build_router(app_state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Shift API server listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
