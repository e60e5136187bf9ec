//! Observer server startup helper for embedding in the engine binary.
//!
//! [`spawn_observer`] binds the listener on the caller's task, so a busy
//! port fails startup, then serves on a background Tokio task that runs
//! alongside the session loop.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tuberfield_core::config::ObserverConfig;

use crate::server::{self, ServerError};
use crate::state::AppState;

/// Bind the observer and serve it on a background task.
///
/// The server runs until the Tokio runtime shuts down or the returned
/// handle is aborted.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound.
pub async fn spawn_observer(
    config: &ObserverConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, ServerError> {
    let listener = server::bind(config).await?;

    let handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state).await {
            tracing::error!(error = %e, "Observer server exited with error");
        }
    });

    tracing::info!(port = config.port, "Observer server spawned on background task");
    Ok(handle)
}
