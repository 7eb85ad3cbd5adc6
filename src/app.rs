use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::sidebar::Sidebar;
use crate::i18n::{apply_locale, Locale, LocaleContext, LOCALE_PREFERENCE};
use crate::model_status::ModelContext;
use crate::pages::analyze::AnalyzePage;
use crate::pages::history::HistoryPage;
use crate::pages::settings::SettingsPage;

#[component]
pub fn App() -> impl IntoView {
    let (locale, set_locale) = signal(Locale::default());
    provide_context(LocaleContext { locale, set_locale });

    let model = ModelContext::new();
    provide_context(model);

    // Load saved language preference on mount
    Effect::new(move |_| {
        spawn_local(async move {
            if let Ok(Some(saved)) = commands::get_preference(LOCALE_PREFERENCE).await {
                set_locale.set(Locale::from_code(&saved));
            }
        });
    });

    Effect::new(move |_| apply_locale(locale.get()));

    // The backend starts loading the model at launch; follow it until it settles.
    Effect::new(move |_| model.watch());

    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=AnalyzePage />
                        <Route path=path!("/history") view=HistoryPage />
                        <Route path=path!("/settings") view=SettingsPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
