//! Tauri commands for the model session lifecycle.

use canescan_core::classifier::{ReadyInfo, SessionStatus};
use tauri::State;
use tracing::info;

use crate::error::CommandResult;
use crate::state::AppState;

/// Current session state for the status badge.
#[tauri::command]
pub fn get_model_status(state: State<'_, AppState>) -> SessionStatus {
    state.session().status()
}

/// Dispose the current session and load the configured artifact again.
///
/// Used by the retry button after a failed or timed-out startup load.
#[tauri::command]
pub async fn reload_model(state: State<'_, AppState>) -> CommandResult<ReadyInfo> {
    info!("Reloading model from {:?}", state.model_path);
    let session = state.session().clone();
    session.dispose();
    let ready = session
        .load(&state.model_path, state.config.load_timeout())
        .await?;
    Ok(ready)
}
