//! GLB model showcase: viewer session, renderer and DOM surface.

pub(crate) mod ar;
pub(crate) mod glb;

use crate::constants::{
    ALL_MODELS_LABEL, ANIMATION_TOGGLE_ROW_ID, AR_TOGGLE_ID, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR,
    DROPDOWN_ITEMS_ID, DROPDOWN_SELECTED_ID, LOADING_MESSAGE_ID, MODEL_SCALE_LABEL_ID,
    ROTATION_SPEED_LABEL_ID, SHOWCASE_VIEWPORT_ID,
};
use crate::core::constants::DIRECTIONAL_LIGHT_POSITION;
use crate::core::{default_catalog, run_batch, FetchedModel, LoadError, ModelEntry, ModelFetch, Selection, ViewerSession};
use crate::dom;
use crate::frame::{self, FrameContext, LoopHandle};
use crate::overlay;
use crate::render::meshes::{self, GpuMesh, InstanceUniforms, MeshRenderer, SceneUniforms};
use crate::render::{self, GpuState};
use ar::CameraStream;
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};
use glb::MeshData;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type Session = ViewerSession<Rc<Vec<MeshData>>, CameraStream>;

const CANVAS_CSS: &str = "position:absolute;top:0;left:0;width:100%;height:100%;z-index:1;display:block;";

/// Fetches GLB files over HTTP and parses them on the main thread.
pub struct GlbFetcher;

impl ModelFetch for GlbFetcher {
    type Gpu = Rc<Vec<MeshData>>;

    async fn fetch(&self, entry: &ModelEntry) -> Result<FetchedModel<Self::Gpu>, LoadError> {
        let path = entry.source_path.as_str();
        let fetch_err = |reason: String| LoadError::Fetch {
            path: path.to_string(),
            reason,
        };
        let resp = gloo_net::http::Request::get(path)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        if !resp.ok() {
            return Err(fetch_err(format!("HTTP {}", resp.status())));
        }
        let bytes = resp.binary().await.map_err(|e| fetch_err(e.to_string()))?;
        let parsed = glb::parse_glb(&bytes, path)?;
        log::info!(
            "[showcase] parsed {} ({} nodes, {} meshes, {} clips)",
            entry.display_name,
            parsed.rig.nodes.len(),
            parsed.meshes.len(),
            parsed.clips.len()
        );
        Ok(FetchedModel {
            rig: parsed.rig,
            clips: parsed.clips,
            gpu: Rc::new(parsed.meshes),
        })
    }
}

/// Shared handle used by the control and pointer wiring.
#[derive(Clone)]
pub struct Showcase {
    pub session: Rc<RefCell<Session>>,
    pub canvas: web::HtmlCanvasElement,
    fetcher: Rc<GlbFetcher>,
    viewport: web::Element,
    document: web::Document,
}

impl Showcase {
    /// Drop whatever is shown and load `selection` from scratch.
    pub fn reload(&self, selection: Selection) {
        sync_mode_rows(&self.document, selection);
        if dom::is_checked(&self.document, AR_TOGGLE_ID) {
            let must_request = self.session.borrow_mut().ar_mut().request();
            if must_request {
                ar::request_camera(self.session.clone(), self.viewport.clone());
            }
        }
        let ticket = match self.session.borrow_mut().reconfigure(selection) {
            Ok(ticket) => ticket,
            Err(e) => {
                log::error!("[showcase] cannot load {:?}: {}", selection, e);
                return;
            }
        };
        let session = self.session.clone();
        let fetcher = self.fetcher.clone();
        spawn_local(async move {
            run_batch(&session, fetcher.as_ref(), ticket).await;
        });
    }

    pub fn set_ar_enabled(&self, enabled: bool) {
        if !enabled {
            self.session.borrow_mut().ar_mut().disable();
        }
        let selection = self.session.borrow().selection();
        self.reload(selection);
    }

    pub fn document(&self) -> &web::Document {
        &self.document
    }
}

fn sync_mode_rows(document: &web::Document, selection: Selection) {
    let single = selection.is_single();
    dom::set_display(document, ANIMATION_TOGGLE_ROW_ID, if single { "flex" } else { "none" });
    dom::set_display(document, MODEL_SCALE_LABEL_ID, if single { "block" } else { "none" });
    dom::set_display(document, ROTATION_SPEED_LABEL_ID, if single { "none" } else { "block" });
}

struct ShowcaseFrame {
    gpu: GpuState<'static>,
    canvas: web::HtmlCanvasElement,
    document: web::Document,
    session: Rc<RefCell<Session>>,
    meshes: MeshRenderer,
    // uploaded meshes by catalog index, kept across reselection
    uploaded: FnvHashMap<usize, Vec<GpuMesh>>,
    last: Instant,
    loading_shown: Option<bool>,
}

/// One queued draw: catalog index, mesh index, primitive index.
type DrawRef = (usize, usize, usize);

impl FrameContext for ShowcaseFrame {
    fn frame(&mut self, _now_ms: f64) {
        let now = Instant::now();
        if self.document.hidden() {
            self.last = now;
            return;
        }
        let dt = now.duration_since(self.last);
        self.last = now;
        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());

        let mut session = self.session.borrow_mut();
        if session.is_disposed() {
            return;
        }
        let eye = session.tick(dt);
        let loading = session.loading_visible();
        if self.loading_shown != Some(loading) {
            overlay::set_shown(&self.document, LOADING_MESSAGE_ID, loading);
            self.loading_shown = Some(loading);
        }
        self.gpu.set_clear_color(session.clear_color());

        let view = Mat4::look_at_rh(eye, session.orbit().target, Vec3::Y);
        let proj = render::perspective(CAMERA_FOV_DEG, self.gpu.aspect(), CAMERA_NEAR, CAMERA_FAR);
        let settings = session.settings();
        let scene = SceneUniforms::new(
            proj * view,
            Vec3::from_array(DIRECTIONAL_LIGHT_POSITION),
            settings.ambient_intensity,
            settings.directional_intensity,
        );
        let wireframe = settings.wireframe;

        let group = session.group_matrix();
        let mut instances: Vec<InstanceUniforms> = Vec::new();
        let mut draws: Vec<DrawRef> = Vec::new();
        for model in session.models() {
            let device = self.gpu.device();
            let gpu_meshes = self
                .uploaded
                .entry(model.catalog_index)
                .or_insert_with(|| model.gpu.iter().map(|m| meshes::upload_mesh(device, m)).collect());
            for (node, world) in model.rig.nodes.iter().zip(model.node_matrices()) {
                let Some(mesh_index) = node.mesh else {
                    continue;
                };
                let Some(mesh) = gpu_meshes.get(mesh_index) else {
                    continue;
                };
                for (prim_index, primitive) in mesh.primitives.iter().enumerate() {
                    instances.push(InstanceUniforms::new(group * world, primitive.color));
                    draws.push((model.catalog_index, mesh_index, prim_index));
                }
            }
        }
        drop(session);

        self.meshes
            .prepare(self.gpu.device(), self.gpu.queue(), &scene, &instances);
        let uploaded = &self.uploaded;
        let renderer = &self.meshes;
        let result = self.gpu.render(|pass| {
            for (slot, &(catalog_index, mesh_index, prim_index)) in draws.iter().enumerate() {
                let primitive = uploaded
                    .get(&catalog_index)
                    .and_then(|m| m.get(mesh_index))
                    .and_then(|m| m.primitives.get(prim_index));
                if let Some(primitive) = primitive {
                    renderer.draw(pass, primitive, slot, wireframe);
                }
            }
        });
        if let Err(e) = result {
            log::debug!("[showcase] frame skipped: {:?}", e);
        }
    }
}

fn ensure_loading_message(document: &web::Document, viewport: &web::Element) {
    if document.get_element_by_id(LOADING_MESSAGE_ID).is_some() {
        return;
    }
    if let Ok(el) = document.create_element("div") {
        el.set_id(LOADING_MESSAGE_ID);
        el.set_inner_html(r#"<div class="loader"></div>"#);
        _ = viewport.append_child(&el);
    }
}

fn create_canvas(document: &web::Document, viewport: &web::Element) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas.style().set_css_text(CANVAS_CSS);
    viewport
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::sync_canvas_to_parent(&canvas);
    let resize_target = canvas.clone();
    dom::observe_resize(viewport, move || dom::sync_canvas_to_parent(&resize_target))?;
    Ok(canvas)
}

fn build_dropdown(showcase: &Showcase) {
    let document = showcase.document();
    let Some(items) = dom::element_by_id::<web::HtmlElement>(document, DROPDOWN_ITEMS_ID) else {
        return;
    };
    let catalog: Vec<ModelEntry> = showcase.session.borrow().catalog().to_vec();
    let mut markup = format!(r#"<div class="dropdown-item" data-value="-1">{}</div>"#, ALL_MODELS_LABEL);
    for (i, entry) in catalog.iter().enumerate() {
        markup.push_str(&format!(
            r#"<div class="dropdown-item" data-value="{}">{}</div>"#,
            i, entry.display_name
        ));
    }
    items.set_inner_html(&markup);

    let toggle_items = items.clone();
    dom::add_click_listener(document, DROPDOWN_SELECTED_ID, move || {
        let shown = dom::display_of(&toggle_items) == "block";
        _ = toggle_items
            .style()
            .set_property("display", if shown { "none" } else { "block" });
    });

    let Ok(nodes) = items.query_selector_all(".dropdown-item") else {
        return;
    };
    for i in 0..nodes.length() {
        let Some(item) = nodes.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let showcase = showcase.clone();
        let items = items.clone();
        let clicked = item.clone();
        dom::add_listener(&item, "click", move |_ev: web::Event| {
            let wire = clicked
                .get_attribute("data-value")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(-1);
            let selection = match Selection::from_wire(wire) {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("[showcase] ignoring dropdown value: {}", e);
                    return;
                }
            };
            let document = showcase.document();
            if let Some(label) = document.get_element_by_id(DROPDOWN_SELECTED_ID) {
                label.set_text_content(clicked.text_content().as_deref());
            }
            _ = items.style().set_property("display", "none");
            showcase.reload(selection);
        });
    }
}

/// Mount the showcase into its viewport. Pages without a viewport get
/// `Ok(None)`.
pub async fn mount(document: &web::Document) -> anyhow::Result<Option<Showcase>> {
    let Some(viewport) = document.get_element_by_id(SHOWCASE_VIEWPORT_ID) else {
        return Ok(None);
    };
    ensure_loading_message(document, &viewport);
    let canvas = create_canvas(document, &viewport)?;
    let Some(gpu) = frame::init_gpu(&canvas).await else {
        return Ok(None);
    };
    let session = Session::create(default_catalog()).map_err(|e| anyhow::anyhow!(e))?;
    let session = Rc::new(RefCell::new(session));

    let meshes = MeshRenderer::new(gpu.device(), gpu.format());
    let frame_ctx = Rc::new(RefCell::new(ShowcaseFrame {
        gpu,
        canvas: canvas.clone(),
        document: document.clone(),
        session: session.clone(),
        meshes,
        uploaded: FnvHashMap::default(),
        last: Instant::now(),
        loading_shown: None,
    }));
    let handle: LoopHandle = frame::start_loop(frame_ctx);

    let showcase = Showcase {
        session: session.clone(),
        canvas,
        fetcher: Rc::new(GlbFetcher),
        viewport,
        document: document.clone(),
    };
    build_dropdown(&showcase);

    if let Some(window) = web::window() {
        dom::add_listener(&window, "pagehide", move |_ev: web::Event| {
            session.borrow_mut().dispose();
            handle.stop();
        });
    }

    showcase.reload(Selection::All);
    Ok(Some(showcase))
}
