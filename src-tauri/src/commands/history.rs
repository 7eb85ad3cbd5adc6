//! Tauri commands for the saved classification history.

use canescan_core::classifier::DiseaseInfo;
use canescan_core::{HistoryEntry, NewHistoryEntry};
use serde::Serialize;
use tauri::State;
use tracing::info;

use crate::error::{CommandError, CommandResult};
use crate::state::AppState;

/// A saved entry with the display metadata of its class.
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    #[serde(flatten)]
    pub entry: HistoryEntry,
    pub info: Option<DiseaseInfo>,
}

impl From<HistoryEntry> for HistoryItem {
    fn from(entry: HistoryEntry) -> Self {
        let info = entry.disease_info();
        Self { entry, info }
    }
}

/// List saved results, newest first.
#[tauri::command]
pub async fn list_history(state: State<'_, AppState>) -> CommandResult<Vec<HistoryItem>> {
    let store = state.open_history()?;
    let entries = blocking(move || Ok(store.list()?)).await?;
    info!("Listed {} history entries", entries.len());
    Ok(entries.into_iter().map(HistoryItem::from).collect())
}

/// Recall a single saved result.
#[tauri::command]
pub async fn get_history_entry(
    state: State<'_, AppState>,
    id: i64,
) -> CommandResult<Option<HistoryItem>> {
    let store = state.open_history()?;
    let entry = blocking(move || Ok(store.get(id)?)).await?;
    Ok(entry.map(HistoryItem::from))
}

#[tauri::command]
pub async fn save_to_history(
    state: State<'_, AppState>,
    entry: NewHistoryEntry,
) -> CommandResult<HistoryEntry> {
    let store = state.open_history()?;
    blocking(move || Ok(store.save(entry)?)).await
}

#[tauri::command]
pub async fn clear_history(state: State<'_, AppState>) -> CommandResult<()> {
    let store = state.open_history()?;
    blocking(move || Ok(store.clear()?)).await
}

async fn blocking<T, F>(f: F) -> CommandResult<T>
where
    F: FnOnce() -> CommandResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CommandError::history(format!("history task failed: {}", e)))?
}
