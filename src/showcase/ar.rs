//! Rear-camera passthrough: a `<video>` behind the showcase canvas.

use crate::constants::AR_TOGGLE_ID;
use crate::core::MediaTracks;
use crate::dom;
use crate::showcase::Session;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

const VIDEO_CSS: &str = "position:absolute;top:0;left:0;width:100%;height:100%;object-fit:cover;z-index:0;";

/// A granted camera stream and the video element showing it.
pub struct CameraStream {
    stream: web::MediaStream,
    video: web::HtmlVideoElement,
}

impl CameraStream {
    fn tracks(&self) -> Vec<web::MediaStreamTrack> {
        self.stream
            .get_tracks()
            .iter()
            .filter_map(|t| t.dyn_into::<web::MediaStreamTrack>().ok())
            .collect()
    }
}

impl MediaTracks for CameraStream {
    fn stop_all(&mut self) {
        for track in self.tracks() {
            track.stop();
        }
        self.video.set_src_object(None);
        self.video.remove();
    }

    fn live_tracks(&self) -> usize {
        self.tracks()
            .iter()
            .filter(|t| t.ready_state() == web::MediaStreamTrackState::Live)
            .count()
    }
}

async fn open_camera(viewport: &web::Element) -> anyhow::Result<CameraStream> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let video_constraints = js_sys::Object::new();
    js_sys::Reflect::set(&video_constraints, &"facingMode".into(), &"environment".into())
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_video(&video_constraints);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let video: web::HtmlVideoElement = document
        .create_element("video")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    video.set_autoplay(true);
    video.set_muted(true);
    _ = video.set_attribute("playsinline", "");
    video.style().set_css_text(VIDEO_CSS);
    video.set_src_object(Some(&stream));
    _ = viewport.prepend_with_node_1(&video);
    _ = video.play();

    Ok(CameraStream { stream, video })
}

/// Issue a camera request for `session` and hand the result to its backdrop.
pub fn request_camera(session: Rc<RefCell<Session>>, viewport: web::Element) {
    wasm_bindgen_futures::spawn_local(async move {
        match open_camera(&viewport).await {
            Ok(stream) => {
                if !session.borrow_mut().ar_mut().grant(stream) {
                    log::info!("[ar] passthrough was switched off before the camera answered");
                }
            }
            Err(e) => {
                log::error!("[ar] camera unavailable: {:?}", e);
                session.borrow_mut().ar_mut().deny();
                if let Some(doc) = dom::window_document() {
                    dom::set_checked(&doc, AR_TOGGLE_ID, false);
                }
            }
        }
    });
}
