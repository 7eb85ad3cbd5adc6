use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::error_notice::ErrorNotice;
use crate::errors::AppError;
use crate::i18n::{use_locale, Locale, LOCALE_PREFERENCE};
use crate::model_status::use_model;

#[component]
pub fn SettingsPage() -> impl IntoView {
    let i18n = use_locale();
    let model = use_model();
    let (save_error, set_save_error) = signal::<Option<AppError>>(None);

    let on_language = move |ev: leptos::ev::Event| {
        let locale = Locale::from_code(&event_target_value(&ev));
        i18n.set_locale.set(locale);
        spawn_local(async move {
            match commands::set_preference(LOCALE_PREFERENCE, locale.code()).await {
                Ok(()) => set_save_error.set(None),
                Err(e) => set_save_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page settings-page">
            <h2>{move || i18n.text().settings_title}</h2>

            <section class="settings-section">
                <h3>{move || i18n.text().language}</h3>
                <p class="section-description">{move || i18n.text().language_hint}</p>
                <select class="input" on:change=on_language>
                    <option value="en" selected=move || i18n.locale.get() == Locale::En>"English"</option>
                    <option value="zh-CN" selected=move || i18n.locale.get() == Locale::Zh>"简体中文"</option>
                </select>
                {move || save_error.get().map(|e| view! { <ErrorNotice error=e /> })}
            </section>

            <section class="settings-section">
                <h3>{move || i18n.text().model_section}</h3>
                {move || {
                    let text = i18n.text();
                    model.status.get().and_then(|s| s.ready).map(|ready| view! {
                        <dl class="model-facts">
                            <dt>{text.model_path}</dt>
                            <dd><code>{ready.model_path}</code></dd>
                            <dt>{text.load_time}</dt>
                            <dd>{ready.load_ms}" "{text.ms}</dd>
                        </dl>
                    })
                }}
                <button class="btn btn-secondary" on:click=move |_| model.retry()>
                    {move || i18n.text().reload_model}
                </button>
            </section>
        </div>
    }
}
