//! Camera capture through the webview's media devices.
//!
//! [`CameraSession`] owns an acquired stream and stops every track when
//! dropped, so releasing the device is tied to scope: capture, cancel,
//! errors and unmount all release it. [`Camera`] holds at most one session
//! and discards grants that arrive after the request was cancelled.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, DomException, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

use crate::errors::{AppError, ErrorKind};

pub const IDEAL_WIDTH: u32 = 1920;
pub const IDEAL_HEIGHT: u32 = 1080;

/// A still frame at the stream's native resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub struct CameraSession {
    stream: MediaStream,
}

impl CameraSession {
    pub fn stream(&self) -> &MediaStream {
        &self.stream
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        let tracks = self.stream.get_tracks();
        for track in tracks.iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

#[derive(Default)]
struct Inner {
    generation: u64,
    session: Option<CameraSession>,
}

/// Single-session camera handle. Cheap to clone; clones share the session.
#[derive(Clone, Default)]
pub struct Camera {
    inner: Rc<RefCell<Inner>>,
}

impl Camera {
    /// Acquire the camera. Returns `Ok(None)` when [`Camera::cancel`] ran
    /// while the permission prompt was open; the late grant is released.
    pub async fn open(&self) -> Result<Option<MediaStream>, AppError> {
        let generation = {
            let mut inner = self.inner.borrow_mut();
            inner.session = None;
            inner.generation += 1;
            inner.generation
        };

        let session = CameraSession {
            stream: request_stream().await?,
        };

        let mut inner = self.inner.borrow_mut();
        if inner.generation != generation {
            return Ok(None);
        }
        let stream = session.stream().clone();
        inner.session = Some(session);
        Ok(Some(stream))
    }

    /// Release the active session, or abandon a pending request.
    pub fn cancel(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.generation += 1;
        inner.session = None;
    }

    pub fn is_active(&self) -> bool {
        self.inner.borrow().session.is_some()
    }

    /// Grab the current frame and release the camera.
    pub fn capture(&self, video: &HtmlVideoElement) -> Result<Frame, AppError> {
        let session = self.inner.borrow_mut().session.take();
        if session.is_none() {
            return Err(AppError::new(ErrorKind::DeviceNotFound, "camera is not active"));
        }
        grab_frame(video)
    }
}

async fn request_stream() -> Result<MediaStream, AppError> {
    let window = web_sys::window()
        .ok_or_else(|| AppError::new(ErrorKind::DeviceNotFound, "no browser window"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| classify_js_error(&e))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video_constraints());
    constraints.set_audio(&JsValue::FALSE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| classify_js_error(&e))?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(|e| classify_js_error(&e))?;
    stream
        .dyn_into::<MediaStream>()
        .map_err(|_| AppError::new(ErrorKind::DeviceBusy, "camera returned no stream"))
}

/// `{ facingMode: "environment", width: { ideal }, height: { ideal } }`
fn video_constraints() -> JsValue {
    let video = Object::new();
    let _ = Reflect::set(&video, &"facingMode".into(), &"environment".into());
    let _ = Reflect::set(&video, &"width".into(), &ideal(IDEAL_WIDTH));
    let _ = Reflect::set(&video, &"height".into(), &ideal(IDEAL_HEIGHT));
    video.into()
}

fn ideal(value: u32) -> JsValue {
    let obj = Object::new();
    let _ = Reflect::set(&obj, &"ideal".into(), &JsValue::from(value));
    obj.into()
}

fn classify_js_error(value: &JsValue) -> AppError {
    match value.dyn_ref::<DomException>() {
        Some(ex) => classify_camera_error(&ex.name(), &ex.message()),
        None => classify_camera_error(
            "",
            &value.as_string().unwrap_or_else(|| "camera unavailable".to_string()),
        ),
    }
}

/// Map a `getUserMedia` DOMException name to an error kind.
pub fn classify_camera_error(name: &str, message: &str) -> AppError {
    let kind = match name {
        "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => ErrorKind::PermissionDenied,
        "NotFoundError" | "DevicesNotFoundError" | "OverconstrainedError" => ErrorKind::DeviceNotFound,
        "NotReadableError" | "TrackStartError" | "AbortError" => ErrorKind::DeviceBusy,
        // No mediaDevices at all (insecure context or no hardware support).
        "" if message.is_empty() => ErrorKind::DeviceNotFound,
        _ => ErrorKind::DeviceBusy,
    };
    let message = if name.is_empty() {
        message.to_string()
    } else {
        format!("{}: {}", name, message)
    };
    AppError::new(kind, message)
}

fn grab_frame(video: &HtmlVideoElement) -> Result<Frame, AppError> {
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return Err(AppError::new(
            ErrorKind::InvalidImage,
            "camera has not produced a frame yet",
        ));
    }

    let canvas_err = |e: JsValue| {
        AppError::new(
            ErrorKind::InvalidImage,
            format!("failed to read camera frame: {:?}", e),
        )
    };

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::new(ErrorKind::InvalidImage, "no document"))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(canvas_err)?
        .dyn_into()
        .map_err(|_| AppError::new(ErrorKind::InvalidImage, "canvas unavailable"))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(canvas_err)?
        .ok_or_else(|| AppError::new(ErrorKind::InvalidImage, "2d context unavailable"))?
        .dyn_into()
        .map_err(|_| AppError::new(ErrorKind::InvalidImage, "2d context unavailable"))?;
    ctx.draw_image_with_html_video_element(video, 0.0, 0.0)
        .map_err(canvas_err)?;
    let data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(canvas_err)?;

    Ok(Frame {
        width,
        height,
        rgba: data.data().0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_permission() {
        let err = classify_camera_error("NotAllowedError", "Permission denied");
        assert_eq!(err.kind, ErrorKind::PermissionDenied);
        assert!(err.message.contains("Permission denied"));
    }

    #[test]
    fn test_missing_device() {
        assert_eq!(
            classify_camera_error("NotFoundError", "Requested device not found").kind,
            ErrorKind::DeviceNotFound
        );
        assert_eq!(
            classify_camera_error("OverconstrainedError", "").kind,
            ErrorKind::DeviceNotFound
        );
        assert_eq!(classify_camera_error("", "").kind, ErrorKind::DeviceNotFound);
    }

    #[test]
    fn test_busy_device() {
        assert_eq!(
            classify_camera_error("NotReadableError", "Could not start video source").kind,
            ErrorKind::DeviceBusy
        );
        assert_eq!(classify_camera_error("SomethingNew", "x").kind, ErrorKind::DeviceBusy);
    }
}
