use std::sync::Arc;

use gemini_client::GeminiClient;
use shift_core::clock::SystemClock;
use shift_core::store::FileStore;
use shift_server::state::AppState;

pub fn run(
    store: FileStore,
    clock: SystemClock,
    port: u16,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let gemini = match api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => Some(GeminiClient::new(key)),
        None => {
            tracing::warn!("no API key configured; AI endpoints will answer 500");
            None
        }
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let state = AppState::new(Arc::new(store), Arc::new(clock), gemini);
        shift_server::serve(state, port).await
    })
}
