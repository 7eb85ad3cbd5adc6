mod commands;
mod error;
mod state;

use canescan_core::ClassifierConfig;
use tracing::{error, info, warn};

use crate::state::AppState;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .invoke_handler(tauri::generate_handler![
            commands::config::get_preference,
            commands::config::set_preference,
            commands::model::get_model_status,
            commands::model::reload_model,
            commands::classify::classify_image,
            commands::classify::classify_frame,
            commands::history::list_history,
            commands::history::get_history_entry,
            commands::history::save_to_history,
            commands::history::clear_history,
        ])
        .setup(|app| {
            use tauri::Manager;

            let config = ClassifierConfig::resolve().unwrap_or_else(|e| {
                warn!("Ignoring invalid classifier config: {}", e);
                ClassifierConfig::default()
            });
            let resource_dir = app.path().resource_dir()?;
            let data_dir = app.path().app_data_dir()?;
            let state = AppState::new(config, &resource_dir, &data_dir);

            // Load in the background; the UI polls get_model_status.
            let session = state.session().clone();
            let model_path = state.model_path.clone();
            let timeout = state.config.load_timeout();
            app.manage(state);

            tauri::async_runtime::spawn(async move {
                info!("Loading model from {:?}", model_path);
                if let Err(e) = session.load(&model_path, timeout).await {
                    error!("Startup model load failed: {}", e);
                }
            });
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
