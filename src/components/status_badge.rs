use leptos::prelude::*;

use crate::commands::SessionState;
use crate::i18n::use_locale;
use crate::model_status::use_model;

/// Model session state with a retry button once loading has failed.
#[component]
pub fn ModelStatusBadge() -> impl IntoView {
    let i18n = use_locale();
    let model = use_model();

    let state = move || model.status.get().map(|s| s.state);

    view! {
        <div class="model-status">
            <style>{include_str!("status_badge.css")}</style>
            {move || {
                let text = i18n.text();
                match state() {
                    Some(SessionState::Ready) => view! {
                        <div class="status-row">
                            <span class="status-badge status-pass">"\u{2713}"</span>
                            <span class="status-label">{text.model_ready}</span>
                        </div>
                    }.into_any(),
                    Some(SessionState::Failed) => {
                        let detail = model
                            .status
                            .get()
                            .and_then(|s| s.error)
                            .unwrap_or_default();
                        view! {
                            <div class="status-row">
                                <span class="status-badge status-fail">"\u{2717}"</span>
                                <span class="status-label">{text.model_failed}</span>
                            </div>
                            <p class="status-detail">{detail}</p>
                            <button class="btn btn-small btn-secondary" on:click=move |_| model.retry()>
                                {text.retry}
                            </button>
                        }.into_any()
                    }
                    Some(SessionState::Unloaded) => view! {
                        <div class="status-row">
                            <span class="status-badge status-unknown">"?"</span>
                            <span class="status-label">{text.model_unloaded}</span>
                        </div>
                        <button class="btn btn-small btn-secondary" on:click=move |_| model.retry()>
                            {text.retry}
                        </button>
                    }.into_any(),
                    Some(SessionState::Loading) | None => view! {
                        <div class="status-row">
                            <div class="spinner spinner-small"></div>
                            <span class="status-label">{text.model_loading}</span>
                        </div>
                        <p class="status-detail">{text.model_loading_hint}</p>
                    }.into_any(),
                }
            }}
            {move || model.retry_error.get().map(|e| {
                let headline = e.headline(i18n.locale.get());
                view! { <p class="status-detail status-error">{headline}</p> }
            })}
        </div>
    }
}
