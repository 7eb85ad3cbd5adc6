//! Analyze page: pick or capture a leaf photo and classify it.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::camera::Frame;
use crate::commands::{self, Classification, SessionState};
use crate::components::error_notice::ErrorNotice;
use crate::components::image_upload::ImageUpload;
use crate::components::prediction_card::PredictionCard;
use crate::errors::AppError;
use crate::i18n::use_locale;
use crate::model_status::use_model;

#[derive(Debug, Clone)]
pub enum AnalysisState {
    /// Waiting for an image
    Idle,
    /// Classification in flight; new requests are not accepted
    Analyzing,
    Complete(Classification),
    Error(AppError),
}

#[component]
pub fn AnalyzePage() -> impl IntoView {
    let i18n = use_locale();
    let model = use_model();
    let (state, set_state) = signal(AnalysisState::Idle);

    let finish = move |result: Result<Classification, AppError>| match result {
        Ok(c) => set_state.set(AnalysisState::Complete(c)),
        Err(e) => set_state.set(AnalysisState::Error(e)),
    };

    let on_file = Callback::new(move |base64: String| {
        set_state.set(AnalysisState::Analyzing);
        spawn_local(async move {
            finish(commands::classify_image(base64).await);
        });
    });

    let on_frame = Callback::new(move |frame: Frame| {
        set_state.set(AnalysisState::Analyzing);
        spawn_local(async move {
            finish(commands::classify_frame(frame).await);
        });
    });

    let on_error = Callback::new(move |e: AppError| set_state.set(AnalysisState::Error(e)));

    let on_reset = move |_| set_state.set(AnalysisState::Idle);

    view! {
        <div class="page analyze-page">
            <style>{include_str!("analyze.css")}</style>

            <Show when=move || model.status.get().is_some_and(|s| s.state == SessionState::Loading)>
                <p class="model-hint">{move || i18n.text().model_loading_hint}</p>
            </Show>

            {move || match state.get() {
                AnalysisState::Idle => view! {
                    <ImageUpload on_file=on_file on_frame=on_frame on_error=on_error />
                }.into_any(),

                AnalysisState::Analyzing => view! {
                    <div class="analyzing-state">
                        <div class="spinner"></div>
                        <p>{i18n.text().analyzing}</p>
                        <p class="hint">{i18n.text().analyzing_hint}</p>
                    </div>
                }.into_any(),

                AnalysisState::Complete(classification) => view! {
                    <div class="analysis-results">
                        <PredictionCard classification=classification />
                        <div class="action-buttons">
                            <button class="btn btn-primary" on:click=on_reset>
                                {i18n.text().analyze_another}
                            </button>
                        </div>
                    </div>
                }.into_any(),

                AnalysisState::Error(error) => view! {
                    <div class="error-state">
                        <h3>{i18n.text().analysis_failed}</h3>
                        <ErrorNotice error=error />
                        <button class="btn btn-secondary" on:click=on_reset>
                            {i18n.text().try_again}
                        </button>
                    </div>
                }.into_any(),
            }}

            <p class="disclaimer">{move || i18n.text().disclaimer}</p>
        </div>
    }
}
