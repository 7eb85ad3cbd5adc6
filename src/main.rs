mod app;
mod camera;
mod commands;
mod components;
mod encoding;
mod errors;
mod i18n;
mod model_status;
mod pages;

use app::App;

fn main() {
    leptos::mount::mount_to_body(App);
}
