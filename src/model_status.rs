//! Shared view of the backend model session.

use leptos::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::commands::{self, SessionState, SessionStatus};
use crate::errors::AppError;

const POLL_INTERVAL_MS: i32 = 400;

#[derive(Clone, Copy)]
pub struct ModelContext {
    pub status: ReadSignal<Option<SessionStatus>>,
    set_status: WriteSignal<Option<SessionStatus>>,
    /// Last failed retry, shown next to the status.
    pub retry_error: ReadSignal<Option<AppError>>,
    set_retry_error: WriteSignal<Option<AppError>>,
}

impl ModelContext {
    pub fn new() -> Self {
        let (status, set_status) = signal(None);
        let (retry_error, set_retry_error) = signal(None);
        Self {
            status,
            set_status,
            retry_error,
            set_retry_error,
        }
    }

    /// Poll the backend until the startup load settles.
    pub fn watch(self) {
        spawn_local(async move {
            loop {
                match commands::get_model_status().await {
                    Ok(status) => {
                        let settled = is_settled(status.state);
                        self.set_status.set(Some(status));
                        if settled {
                            break;
                        }
                    }
                    Err(e) => {
                        web_sys::console::error_1(&format!("Model status failed: {}", e).into());
                        break;
                    }
                }
                sleep(POLL_INTERVAL_MS).await;
            }
        });
    }

    /// Explicit reload after a failure.
    pub fn retry(self) {
        self.set_retry_error.set(None);
        self.set_status.set(Some(SessionStatus {
            state: SessionState::Loading,
            ready: None,
            error: None,
        }));
        spawn_local(async move {
            if let Err(e) = commands::reload_model().await {
                self.set_retry_error.set(Some(e));
            }
            self.watch();
        });
    }
}

impl Default for ModelContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_model() -> ModelContext {
    expect_context::<ModelContext>()
}

fn is_settled(state: SessionState) -> bool {
    matches!(state, SessionState::Ready | SessionState::Failed)
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = JsFuture::from(promise).await;
}
