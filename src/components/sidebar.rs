use leptos::prelude::*;

use crate::components::status_badge::ModelStatusBadge;
use crate::i18n::use_locale;

#[component]
pub fn Sidebar() -> impl IntoView {
    let i18n = use_locale();

    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">{move || i18n.text().app_title}</h1>
                <p class="sidebar-subtitle">{move || i18n.text().app_tagline}</p>
            </div>
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="/" class="nav-link">{move || i18n.text().nav_analyze}</a>
                </li>
                <li class="nav-item">
                    <a href="/history" class="nav-link">{move || i18n.text().nav_history}</a>
                </li>
                <li class="nav-item">
                    <a href="/settings" class="nav-link">{move || i18n.text().nav_settings}</a>
                </li>
            </ul>
            <div class="sidebar-footer">
                <ModelStatusBadge />
            </div>
        </nav>
    }
}
