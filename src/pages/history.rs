//! History page: browse, recall and clear saved results.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, HistoryEntry};
use crate::components::error_notice::ErrorNotice;
use crate::components::history_panel::{format_timestamp, HistoryPanel};
use crate::errors::AppError;
use crate::i18n::use_locale;

#[component]
pub fn HistoryPage() -> impl IntoView {
    let i18n = use_locale();
    let (entries, set_entries) = signal::<Option<Vec<HistoryEntry>>>(None);
    let (selected, set_selected) = signal::<Option<HistoryEntry>>(None);
    let (error, set_error) = signal::<Option<AppError>>(None);
    let (confirm_clear, set_confirm_clear) = signal(false);

    let reload = move || {
        spawn_local(async move {
            match commands::list_history().await {
                Ok(list) => set_entries.set(Some(list)),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    Effect::new(move |_| reload());

    let on_select = Callback::new(move |id: i64| {
        spawn_local(async move {
            match commands::get_history_entry(id).await {
                Ok(entry) => set_selected.set(entry),
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    let clear = move |_| {
        set_confirm_clear.set(false);
        spawn_local(async move {
            match commands::clear_history().await {
                Ok(()) => {
                    set_selected.set(None);
                    set_entries.set(Some(Vec::new()));
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page history-page">
            <div class="history-header">
                <h2>{move || i18n.text().history_title}</h2>
                {move || entries.get().filter(|list| !list.is_empty()).map(|list| view! {
                    <span class="history-count">
                        {list.len()}" "{i18n.text().history_count}
                    </span>
                })}
            </div>

            {move || error.get().map(|e| view! { <ErrorNotice error=e /> })}

            {move || {
                let text = i18n.text();
                if let Some(entry) = selected.get() {
                    let label = i18n.locale.get().disease_name(&entry.disease);
                    let color = entry.info.as_ref().map(|i| i.color.clone()).unwrap_or_default();
                    let when = format_timestamp(&entry.timestamp, i18n.locale.get());
                    let info = entry.info.clone();
                    return view! {
                        <div class="history-detail">
                            {entry.image.clone().map(|src| view! {
                                <img src=src class="result-preview" alt=label.clone() />
                            })}
                            <h3 style=format!("color: {}", color)>{label.clone()}</h3>
                            <p>{text.confidence}" "<strong>{entry.confidence_percent.clone()}"%"</strong></p>
                            <p class="history-date">{when}</p>
                            {info.map(|info| view! {
                                <section class="result-section">
                                    <h4>{text.description}</h4>
                                    <p>{info.description}</p>
                                    <h4>{text.treatment}</h4>
                                    <p>{info.treatment}</p>
                                </section>
                            })}
                            <button class="btn btn-secondary" on:click=move |_| set_selected.set(None)>
                                {text.back_to_list}
                            </button>
                        </div>
                    }.into_any();
                }

                match entries.get() {
                    None => view! { <p class="history-loading">{text.history_loading}</p> }.into_any(),
                    Some(list) if list.is_empty() => view! {
                        <div class="history-empty">
                            <p>{text.history_empty}</p>
                            <p class="hint">{text.history_empty_hint}</p>
                        </div>
                    }.into_any(),
                    Some(list) => view! {
                        <HistoryPanel entries=list on_select=on_select />
                        <div class="clear-row">
                            <Show
                                when=move || confirm_clear.get()
                                fallback=move || view! {
                                    <button class="btn btn-danger" on:click=move |_| set_confirm_clear.set(true)>
                                        {i18n.text().history_clear}
                                    </button>
                                }
                            >
                                <span class="confirm-text">{move || i18n.text().history_clear_confirm}</span>
                                <button class="btn btn-danger" on:click=clear>{move || i18n.text().yes}</button>
                                <button class="btn btn-secondary" on:click=move |_| set_confirm_clear.set(false)>
                                    {move || i18n.text().no}
                                </button>
                            </Show>
                        </div>
                    }.into_any(),
                }
            }}
        </div>
    }
}
