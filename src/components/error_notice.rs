use leptos::prelude::*;

use crate::errors::AppError;
use crate::i18n::use_locale;

/// Localized headline for an error with the backend detail underneath.
#[component]
pub fn ErrorNotice(error: AppError) -> impl IntoView {
    let i18n = use_locale();
    let show_detail = !error.is_camera() && !error.message.is_empty();
    let detail = error.message.clone();

    view! {
        <div class="error-message">
            <p class="error-headline">{move || error.headline(i18n.locale.get())}</p>
            {show_detail.then(|| view! { <p class="error-detail">{detail}</p> })}
        </div>
    }
}
