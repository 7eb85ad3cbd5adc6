//! Classification result: top disease, confidence, ranked list, guidance.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, Classification, NewHistoryEntry};
use crate::components::error_notice::ErrorNotice;
use crate::errors::AppError;
use crate::i18n::use_locale;

#[derive(Debug, Clone, PartialEq)]
enum SaveState {
    Unsaved,
    Saving,
    Saved,
    Failed(AppError),
}

#[component]
pub fn PredictionCard(classification: Classification) -> impl IntoView {
    let i18n = use_locale();
    let (save_state, set_save_state) = signal(SaveState::Unsaved);

    let prediction = classification.prediction.clone();
    let entry = NewHistoryEntry::from_classification(&classification);

    let save = move |_| {
        let entry = entry.clone();
        set_save_state.set(SaveState::Saving);
        spawn_local(async move {
            match commands::save_to_history(entry).await {
                Ok(_) => set_save_state.set(SaveState::Saved),
                Err(e) => set_save_state.set(SaveState::Failed(e)),
            }
        });
    };

    let label = prediction.label.clone();
    let color = prediction.info.color.clone();
    let icon = prediction.info.icon.clone();
    let percent = prediction.confidence_percent.clone();
    let description = prediction.info.description.clone();
    let treatment = prediction.info.treatment.clone();
    let latency = format!("{:.1}", prediction.inference_ms);
    let ranked = prediction.ranked.clone();

    view! {
        <div class="prediction-card">
            <style>{include_str!("prediction_card.css")}</style>
            <h3 class="results-title">{move || i18n.text().results_title}</h3>

            <div class="result-layout">
                <img src=classification.preview.clone() class="result-preview" alt=label.clone() />

                <div class="result-main" style=format!("border-color: {}", color)>
                    <div class="result-header">
                        <span class="result-icon">{icon}</span>
                        <span class="result-label" style=format!("color: {}", color)>
                            {
                                let label = label.clone();
                                move || i18n.locale.get().disease_name(&label)
                            }
                        </span>
                    </div>
                    <p class="result-confidence">
                        {move || i18n.text().confidence}" "<strong>{percent}"%"</strong>
                    </p>
                    <p class="result-latency">
                        {move || i18n.text().inference_time}" "{latency}" "{move || i18n.text().ms}
                    </p>
                </div>
            </div>

            <section class="result-section">
                <h4>{move || i18n.text().description}</h4>
                <p>{description}</p>
            </section>
            <section class="result-section">
                <h4>{move || i18n.text().treatment}</h4>
                <p>{treatment}</p>
            </section>

            <section class="result-section">
                <h4>{move || i18n.text().all_predictions}</h4>
                <ul class="ranked-list">
                    {ranked.into_iter().map(|p| {
                        let width = format!("width: {:.1}%; background: {}", p.probability * 100.0, p.info.color);
                        let percent = format!("{:.2}%", p.probability * 100.0);
                        let label = p.label.clone();
                        view! {
                            <li class="ranked-item">
                                <span class="ranked-label">
                                    {move || i18n.locale.get().disease_name(&label)}
                                </span>
                                <div class="ranked-bar"><div class="ranked-fill" style=width></div></div>
                                <span class="ranked-percent">{percent}</span>
                            </li>
                        }
                    }).collect::<Vec<_>>()}
                </ul>
            </section>

            <div class="save-row">
                {move || match save_state.get() {
                    SaveState::Saved => view! {
                        <span class="save-done">{i18n.text().saved}</span>
                    }.into_any(),
                    SaveState::Failed(e) => view! { <ErrorNotice error=e /> }.into_any(),
                    state => {
                        let busy = state == SaveState::Saving;
                        view! {
                            <button class="btn btn-secondary" disabled=busy on:click=save.clone()>
                                {i18n.text().save_to_history}
                            </button>
                        }.into_any()
                    }
                }}
            </div>
        </div>
    }
}
