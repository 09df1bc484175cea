use std::sync::Arc;
use std::time::Duration;

use gemini_client::GeminiClient;
use shift_core::clock::Clock;
use shift_core::store::Store;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    /// Absent when no API key was configured; the AI routes answer 500.
    pub gemini: Option<Arc<GeminiClient>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        gemini: Option<GeminiClient>,
    ) -> Self {
        let state = Self {
            store,
            clock,
            gemini: gemini.map(Arc::new),
        };

        // Poll for a calendar-day change so the window rolls over even when
        // no request arrives around midnight.
        // Guard: only spawn if inside a Tokio runtime (skipped in sync unit tests).
        if tokio::runtime::Handle::try_current().is_ok() {
            let store = state.store.clone();
            let clock = state.clock.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    match shift_core::streak::rollover(store.as_ref(), clock.as_ref()) {
                        Ok(true) => tracing::info!("day rolled over, task list cleared"),
                        Ok(false) => {}
                        Err(e) => tracing::warn!("rollover check failed: {e}"),
                    }
                }
            });
        }

        state
    }
}
