//! List of saved classifications.

use leptos::prelude::*;
use wasm_bindgen::JsValue;

use crate::commands::HistoryEntry;
use crate::i18n::{use_locale, Locale};

const DEFAULT_COLOR: &str = "#607d8b";

/// Saved results, newest first. Clicking an entry recalls it.
#[component]
pub fn HistoryPanel(entries: Vec<HistoryEntry>, on_select: Callback<i64>) -> impl IntoView {
    let i18n = use_locale();

    view! {
        <div class="history-list">
            <style>{include_str!("history_panel.css")}</style>
            {entries.into_iter().map(|entry| {
                let id = entry.id;
                let color = entry
                    .info
                    .as_ref()
                    .map(|i| i.color.clone())
                    .unwrap_or_else(|| DEFAULT_COLOR.to_string());
                let icon = entry.info.as_ref().map(|i| i.icon.clone()).unwrap_or_default();
                let disease = entry.disease.clone();
                let timestamp = entry.timestamp.clone();
                let percent = format!("{}%", entry.confidence_percent);
                view! {
                    <button class="history-item" on:click=move |_| on_select.run(id)>
                        {entry.image.clone().map(|src| view! {
                            <img src=src class="history-thumb" alt="" />
                        })}
                        <div class="history-item-info">
                            <span class="history-disease" style=format!("color: {}", color)>
                                {icon}" "
                                {
                                    let disease = disease.clone();
                                    move || i18n.locale.get().disease_name(&disease)
                                }
                            </span>
                            <span class="history-date">
                                {move || format_timestamp(&timestamp, i18n.locale.get())}
                            </span>
                        </div>
                        <span class="history-confidence">{percent}</span>
                    </button>
                }
            }).collect::<Vec<_>>()}
        </div>
    }
}

/// Local date and time of an ISO-8601 timestamp in the UI language.
pub fn format_timestamp(iso: &str, locale: Locale) -> String {
    let date = js_sys::Date::new(&JsValue::from_str(iso));
    if date.get_time().is_nan() {
        return iso.to_string();
    }
    let options = js_sys::Object::new();
    for (key, value) in [
        ("year", "numeric"),
        ("month", "2-digit"),
        ("day", "2-digit"),
        ("hour", "2-digit"),
        ("minute", "2-digit"),
    ] {
        let _ = js_sys::Reflect::set(&options, &key.into(), &value.into());
    }
    date.to_locale_string(locale.code(), &options).into()
}
