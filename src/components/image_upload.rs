//! Image selection: browse, drag-and-drop, or capture from the camera.

use leptos::html::Video;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::camera::{Camera, Frame};
use crate::encoding::read_file_as_base64;
use crate::errors::{AppError, ErrorKind};
use crate::i18n::use_locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CameraMode {
    Off,
    Starting,
    Live,
}

#[component]
pub fn ImageUpload(
    /// Base64 contents of a picked or dropped file.
    on_file: Callback<String>,
    /// Still frame grabbed from the camera.
    on_frame: Callback<Frame>,
    on_error: Callback<AppError>,
) -> impl IntoView {
    let i18n = use_locale();
    let camera = StoredValue::new_local(Camera::default());
    let video_ref = NodeRef::<Video>::new();
    let (mode, set_mode) = signal(CameraMode::Off);
    let (is_over, set_is_over) = signal(false);
    let (is_loading, set_is_loading) = signal(false);
    let file_input_id = "leaf-file-input";

    // Leaving the page releases the camera, including a pending request.
    on_cleanup(move || {
        camera.try_with_value(|c| c.cancel());
    });

    let load_file = move |file: web_sys::File| {
        set_is_loading.set(true);
        spawn_local(async move {
            let result = read_file_as_base64(file).await;
            set_is_loading.set(false);
            match result {
                Ok(base64) => on_file.run(base64),
                Err(e) => on_error.run(e),
            }
        });
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_is_over.set(false);
        if let Some(file) = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0))
        {
            load_file(file);
        }
    };

    let on_input_change = move |ev: web_sys::Event| {
        let file = ev
            .target()
            .and_then(|t| wasm_bindgen::JsCast::dyn_into::<web_sys::HtmlInputElement>(t).ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            load_file(file);
        }
    };

    let start_camera = move |_| {
        set_mode.set(CameraMode::Starting);
        let cam = camera.with_value(|c| c.clone());
        spawn_local(async move {
            match cam.open().await {
                Ok(Some(stream)) => match video_ref.get_untracked() {
                    Some(video) => {
                        video.set_muted(true);
                        let _ = video.set_attribute("playsinline", "");
                        video.set_src_object(Some(&stream));
                        let _ = video.play();
                        set_mode.set(CameraMode::Live);
                    }
                    None => cam.cancel(),
                },
                // Cancelled while the permission prompt was open.
                Ok(None) => {}
                Err(e) => {
                    set_mode.set(CameraMode::Off);
                    on_error.run(e);
                }
            }
        });
    };

    let cancel_camera = move |_| {
        camera.with_value(|c| c.cancel());
        set_mode.set(CameraMode::Off);
    };

    let capture = move |_| {
        let result = camera.with_value(|c| match video_ref.get_untracked() {
            Some(video) => c.capture(&video),
            None => {
                c.cancel();
                Err(AppError::new(ErrorKind::DeviceNotFound, "camera preview is not mounted"))
            }
        });
        set_mode.set(CameraMode::Off);
        match result {
            Ok(frame) => on_frame.run(frame),
            Err(e) => on_error.run(e),
        }
    };

    view! {
        <div class="image-upload">
            <style>{include_str!("image_upload.css")}</style>
            <Show
                when=move || mode.get() != CameraMode::Off
                fallback=move || {
                    let text = i18n.text();
                    view! {
                        <div class="upload-section">
                            <h2 class="upload-title">{text.upload_title}</h2>
                            <p class="upload-subtitle">{text.upload_subtitle}</p>

                            <div
                                class="drop-zone"
                                class:drop-zone-active=move || is_over.get()
                                class:drop-zone-loading=move || is_loading.get()
                                on:dragover=move |ev: web_sys::DragEvent| {
                                    ev.prevent_default();
                                    set_is_over.set(true);
                                }
                                on:dragleave=move |_| set_is_over.set(false)
                                on:drop=on_drop
                            >
                                <Show
                                    when=move || is_loading.get()
                                    fallback=move || view! {
                                        <div class="drop-zone-content">
                                            <p class="drop-main">{text.drop_here}</p>
                                            <div class="button-group">
                                                <button class="btn btn-primary" on:click=start_camera>
                                                    {text.use_camera}
                                                </button>
                                                <label for=file_input_id class="btn btn-secondary">
                                                    {text.upload_image}
                                                </label>
                                            </div>
                                            <input
                                                type="file"
                                                id=file_input_id
                                                accept="image/*"
                                                style="display: none"
                                                on:change=on_input_change
                                            />
                                            <p class="drop-formats">{text.supported_formats}</p>
                                        </div>
                                    }
                                >
                                    <div class="drop-zone-loading-content">
                                        <div class="spinner"></div>
                                    </div>
                                </Show>
                            </div>

                            <div class="tips">
                                <p><strong>{text.tips_title}</strong></p>
                                <ul>
                                    {text.tips.iter().map(|tip| view! { <li>{*tip}</li> }).collect::<Vec<_>>()}
                                </ul>
                            </div>
                        </div>
                    }
                }
            >
                <div class="camera-section">
                    <video node_ref=video_ref class="camera-video"></video>
                    <Show when=move || mode.get() == CameraMode::Starting>
                        <p class="camera-starting">{move || i18n.text().starting_camera}</p>
                    </Show>
                    <div class="camera-controls">
                        <button
                            class="btn btn-primary"
                            disabled=move || mode.get() != CameraMode::Live
                            on:click=capture
                        >
                            {move || i18n.text().capture}
                        </button>
                        <button class="btn btn-secondary" on:click=cancel_camera>
                            {move || i18n.text().cancel}
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
