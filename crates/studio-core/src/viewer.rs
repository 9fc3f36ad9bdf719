//! Showcase viewer session.
//!
//! Owns everything the model viewer used to keep in page-level globals:
//! catalog, selection, the batch loader and its generation, the loaded model
//! group, viewer settings, orbit controls and the AR backdrop. Lifecycle is
//! `create -> reconfigure(selection) -> settle(..)* -> dispose`.
//!
//! `G` is whatever GPU-side payload the frontend attaches to a model; `S`
//! is the camera stream type for passthrough.

use crate::animation::{AnimationClip, Mixer};
use crate::ar::{ArBackdrop, MediaTracks, NoMedia};
use crate::bounds::Aabb;
use crate::constants::{ALL_CAMERA_EYE, SINGLE_CAMERA_EYE};
use crate::error::{LoadError, SelectionError};
use crate::loader::{Advance, BatchLoader, BatchTicket, LoaderState, ModelEntry, Placement, Selection};
use crate::model::ModelRig;
use crate::orbit::OrbitControls;
use crate::settings::ViewerSettings;
use glam::{Mat4, Vec3};
use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;

/// Parsed asset as returned by a [`ModelFetch`] implementation.
#[derive(Debug)]
pub struct FetchedModel<G> {
    pub rig: ModelRig,
    pub clips: Vec<AnimationClip>,
    pub gpu: G,
}

#[derive(Debug)]
pub struct LoadedModel<G> {
    pub entry: ModelEntry,
    pub catalog_index: usize,
    pub rig: ModelRig,
    pub mixer: Option<Mixer>,
    pub placement: Placement,
    pub rest_bounds: Aabb,
    pub gpu: G,
}

impl<G> LoadedModel<G> {
    /// Bounds after normalization and placement, before group rotation.
    pub fn placed_bounds(&self) -> Aabb {
        self.rest_bounds.transformed(&self.placement.matrix())
    }

    /// Group-local world matrix of every rig node under the current pose.
    pub fn node_matrices(&self) -> Vec<Mat4> {
        let placement = self.placement.matrix();
        let local = match &self.mixer {
            Some(mixer) if mixer.is_playing() => self.rig.world_matrices(mixer.pose()),
            _ => self.rig.world_matrices(&self.rig.rest_pose()),
        };
        local.into_iter().map(|m| placement * m).collect()
    }
}

/// One entry the caller should fetch next.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadRequest {
    pub ticket: BatchTicket,
    /// Position within the batch.
    pub index: usize,
    pub catalog_index: usize,
    pub entry: ModelEntry,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SettleOutcome {
    Next(LoadRequest),
    Complete,
    Stale,
}

/// Source of model assets; the web frontend fetches and parses GLB files.
pub trait ModelFetch {
    type Gpu;

    fn fetch(&self, entry: &ModelEntry) -> impl Future<Output = Result<FetchedModel<Self::Gpu>, LoadError>>;
}

pub struct ViewerSession<G, S = NoMedia> {
    catalog: Vec<ModelEntry>,
    selection: Selection,
    loader: BatchLoader,
    group: Vec<LoadedModel<G>>,
    group_rotation: f32,
    settings: ViewerSettings,
    orbit: OrbitControls,
    ar: ArBackdrop<S>,
    loading_visible: bool,
    first_settled: bool,
    disposed: bool,
}

impl<G, S: MediaTracks> ViewerSession<G, S> {
    pub fn create(catalog: Vec<ModelEntry>) -> Result<Self, SelectionError> {
        if catalog.is_empty() {
            return Err(SelectionError::EmptyCatalog);
        }
        Ok(Self {
            catalog,
            selection: Selection::All,
            loader: BatchLoader::default(),
            group: Vec::new(),
            group_rotation: 0.0,
            settings: ViewerSettings::default(),
            orbit: OrbitControls::new(Vec3::from_array(ALL_CAMERA_EYE), Vec3::ZERO),
            ar: ArBackdrop::new(),
            loading_visible: false,
            first_settled: false,
            disposed: false,
        })
    }

    /// Drop the current group and start loading `selection` from scratch.
    pub fn reconfigure(&mut self, selection: Selection) -> Result<BatchTicket, SelectionError> {
        if self.disposed {
            return Err(SelectionError::Disposed);
        }
        let plan = selection.plan(self.catalog.len())?;
        self.selection = selection;
        self.group.clear();
        self.group_rotation = 0.0;
        self.settings.model_scale = None;
        self.loading_visible = true;
        self.first_settled = false;
        let eye = if selection.is_single() {
            SINGLE_CAMERA_EYE
        } else {
            ALL_CAMERA_EYE
        };
        self.orbit.reset(Vec3::from_array(eye), Vec3::ZERO);
        let ticket = self.loader.begin(plan);
        log::info!(
            "[viewer] batch {} loading {} model(s)",
            ticket.generation,
            self.loader.plan().len()
        );
        Ok(ticket)
    }

    pub fn is_current(&self, ticket: BatchTicket) -> bool {
        self.loader.is_current(ticket)
    }

    pub fn first_request(&self, ticket: BatchTicket) -> Option<LoadRequest> {
        if !self.loader.is_current(ticket) {
            return None;
        }
        self.request_at(ticket, 0)
    }

    fn request_at(&self, ticket: BatchTicket, index: usize) -> Option<LoadRequest> {
        let catalog_index = *self.loader.plan().get(index)?;
        Some(LoadRequest {
            ticket,
            index,
            catalog_index,
            entry: self.catalog.get(catalog_index)?.clone(),
        })
    }

    /// Merge the outcome of `request` into the session.
    pub fn settle(
        &mut self,
        request: &LoadRequest,
        result: Result<FetchedModel<G>, LoadError>,
    ) -> SettleOutcome {
        if !self.loader.is_current(request.ticket) {
            log::debug!(
                "[viewer] dropping stale result for {} (batch {})",
                request.entry.display_name,
                request.ticket.generation
            );
            return SettleOutcome::Stale;
        }
        let ok = result.is_ok();
        match result {
            Ok(fetched) => self.attach(request, fetched),
            Err(err) => log::error!(
                "[viewer] failed to load model {}: {}",
                request.entry.display_name,
                err
            ),
        }
        if !self.first_settled {
            self.first_settled = true;
            self.loading_visible = false;
        }
        match self.loader.settle(request.ticket, request.index, ok) {
            Advance::Next { index } => match self.request_at(request.ticket, index) {
                Some(next) => SettleOutcome::Next(next),
                None => SettleOutcome::Complete,
            },
            Advance::Complete => {
                self.loading_visible = false;
                if !self.selection.is_single() {
                    self.frame_group();
                }
                log::info!(
                    "[viewer] batch {} complete: {} loaded, {} failed",
                    request.ticket.generation,
                    self.loader.loaded(),
                    self.loader.failed()
                );
                SettleOutcome::Complete
            }
            Advance::Stale => SettleOutcome::Stale,
        }
    }

    fn attach(&mut self, request: &LoadRequest, fetched: FetchedModel<G>) {
        let single = self.selection.is_single();
        let rest_bounds = fetched.rig.bounds(&fetched.rig.rest_pose());
        let placement =
            Placement::for_batch(&rest_bounds, request.index, self.loader.plan().len(), single);
        let mixer = if fetched.clips.is_empty() {
            None
        } else {
            let mut mixer = Mixer::new(fetched.clips, fetched.rig.rest_pose());
            if single && self.settings.animation_enabled {
                mixer.play_all();
            }
            Some(mixer)
        };
        let model = LoadedModel {
            entry: request.entry.clone(),
            catalog_index: request.catalog_index,
            rig: fetched.rig,
            mixer,
            placement,
            rest_bounds,
            gpu: fetched.gpu,
        };
        if request.index == 0 {
            self.orbit.retarget(model.placed_bounds().center());
        }
        self.group.push(model);
    }

    fn frame_group(&mut self) {
        let bounds = self.group_bounds();
        if !bounds.is_empty() {
            self.orbit.retarget(bounds.center());
        }
    }

    pub fn group_bounds(&self) -> Aabb {
        let rotation = self.group_matrix();
        self.group
            .iter()
            .map(|m| m.placed_bounds().transformed(&rotation))
            .fold(Aabb::EMPTY, Aabb::union)
    }

    pub fn dispose(&mut self) {
        self.loader.cancel();
        self.group.clear();
        self.ar.disable();
        self.loading_visible = false;
        self.disposed = true;
        log::info!("[viewer] session disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ---------------- per-frame ----------------

    pub fn tick(&mut self, dt: Duration) -> Vec3 {
        if !self.selection.is_single() {
            self.group_rotation += self.settings.rotation_speed;
        }
        for model in &mut self.group {
            if let Some(mixer) = &mut model.mixer {
                mixer.update(dt);
            }
        }
        self.orbit.update()
    }

    pub fn group_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.group_rotation)
    }

    // ---------------- settings ----------------

    pub fn set_wireframe(&mut self, enabled: bool) {
        self.settings.wireframe = enabled;
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.settings.animation_enabled = enabled;
        for mixer in self.group.iter_mut().filter_map(|m| m.mixer.as_mut()) {
            if enabled {
                mixer.play_all();
            } else {
                mixer.stop_all();
            }
        }
    }

    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.settings.rotation_speed = speed;
    }

    pub fn set_ambient_intensity(&mut self, intensity: f32) {
        self.settings.ambient_intensity = intensity.max(0.0);
    }

    /// Returns `false` when passthrough owns the background.
    pub fn set_background(&mut self, rgb: [f32; 3]) -> bool {
        if self.ar.is_live() {
            return false;
        }
        self.settings.background = rgb;
        true
    }

    /// Absolute uniform scale for the focused model. Only meaningful in
    /// single-model mode with a model loaded.
    pub fn set_model_scale(&mut self, scale: f32) -> bool {
        if !self.selection.is_single() || scale <= 0.0 {
            return false;
        }
        let Some(model) = self.group.first_mut() else {
            return false;
        };
        model.placement.scale = scale;
        self.settings.model_scale = Some(scale);
        let center = model.placed_bounds().center();
        self.orbit.retarget(center);
        true
    }

    // ---------------- accessors ----------------

    pub fn catalog(&self) -> &[ModelEntry] {
        &self.catalog
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn loader_state(&self) -> LoaderState {
        self.loader.state()
    }

    pub fn models(&self) -> &[LoadedModel<G>] {
        &self.group
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit
    }

    pub fn ar(&self) -> &ArBackdrop<S> {
        &self.ar
    }

    pub fn ar_mut(&mut self) -> &mut ArBackdrop<S> {
        &mut self.ar
    }

    pub fn loading_visible(&self) -> bool {
        self.loading_visible
    }

    /// Clear colour for the renderer: transparent while passthrough is live.
    pub fn clear_color(&self) -> [f32; 4] {
        if self.ar.clears_transparent() {
            [0.0, 0.0, 0.0, 0.0]
        } else {
            let [r, g, b] = self.settings.background;
            [r, g, b, 1.0]
        }
    }
}

/// Drive one batch to completion, one entry at a time.
///
/// The session is only borrowed between awaits, so input handlers may call
/// [`ViewerSession::reconfigure`] while a fetch is pending; the superseded
/// batch then stops at its next settle.
pub async fn run_batch<F, S>(session: &RefCell<ViewerSession<F::Gpu, S>>, fetcher: &F, ticket: BatchTicket)
where
    F: ModelFetch,
    S: MediaTracks,
{
    let mut next = session.borrow().first_request(ticket);
    while let Some(request) = next {
        let result = fetcher.fetch(&request.entry).await;
        next = match session.borrow_mut().settle(&request, result) {
            SettleOutcome::Next(request) => Some(request),
            SettleOutcome::Complete | SettleOutcome::Stale => None,
        };
    }
}
