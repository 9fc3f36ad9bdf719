//! Catalog, selection and the strictly sequential batch loader.
//!
//! A batch is an ordered list of catalog indices. Entry `i + 1` is only
//! requested once entry `i` has settled, either way. Every batch carries a
//! generation; completions that arrive for an older generation are dropped.

use crate::bounds::Aabb;
use crate::constants::{NORMALIZED_SIZE, RADIAL_RADIUS};
use crate::error::SelectionError;
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::TAU;

const MODEL_BASE_URL: &str =
    "https://cdn.statically.io/gh/Bedo77/3d-model-viewer/main/Science/grade_one/models";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelEntry {
    pub source_path: String,
    pub display_name: String,
}

impl ModelEntry {
    pub fn new(source_path: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            display_name: display_name.into(),
        }
    }
}

/// The showcase's built-in model list.
pub fn default_catalog() -> Vec<ModelEntry> {
    [
        ("3D%20habitat%20explorer.glb", "3D Habitat Explorer"),
        ("3D%20water%20cycle%20model.glb", "3D Water Cycle"),
        ("Drum%20vibration%20simulator.glb", "Drum Vibration Simulator"),
        ("Gas%20particle%20motion%20simulator.glb", "Gas Particle Simulator"),
        ("Insect_Anatomy.glb", "Insect Anatomy"),
        ("Interactive%20force%20simulator.glb", "Interactive Force Simulator"),
    ]
    .iter()
    .map(|(file, name)| ModelEntry::new(format!("{MODEL_BASE_URL}/{file}"), *name))
    .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Single(usize),
}

impl Selection {
    /// Decode the dropdown's `data-value`: `-1` means all models.
    pub fn from_wire(value: i64) -> Result<Self, SelectionError> {
        match value {
            -1 => Ok(Self::All),
            v if v >= 0 => Ok(Self::Single(v as usize)),
            v => Err(SelectionError::Invalid(v)),
        }
    }

    pub fn to_wire(self) -> i64 {
        match self {
            Self::All => -1,
            Self::Single(i) => i as i64,
        }
    }

    pub fn is_single(self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Catalog indices to load, in order.
    pub fn plan(self, catalog_len: usize) -> Result<Vec<usize>, SelectionError> {
        if catalog_len == 0 {
            return Err(SelectionError::EmptyCatalog);
        }
        match self {
            Self::All => Ok((0..catalog_len).collect()),
            Self::Single(i) if i < catalog_len => Ok(vec![i]),
            Self::Single(index) => Err(SelectionError::OutOfRange {
                index,
                len: catalog_len,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchTicket {
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Loading { index: usize },
    Complete,
}

/// Next step after an entry settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Complete,
    Stale,
}

#[derive(Clone, Debug)]
pub struct BatchLoader {
    generation: u64,
    plan: Vec<usize>,
    state: LoaderState,
    loaded: usize,
    failed: usize,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self {
            generation: 0,
            plan: Vec::new(),
            state: LoaderState::Idle,
            loaded: 0,
            failed: 0,
        }
    }
}

impl BatchLoader {
    /// Start a new batch, superseding any batch in flight.
    pub fn begin(&mut self, plan: Vec<usize>) -> BatchTicket {
        self.generation += 1;
        self.state = if plan.is_empty() {
            LoaderState::Complete
        } else {
            LoaderState::Loading { index: 0 }
        };
        self.plan = plan;
        self.loaded = 0;
        self.failed = 0;
        BatchTicket {
            generation: self.generation,
        }
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.plan.clear();
        self.state = LoaderState::Idle;
    }

    pub fn is_current(&self, ticket: BatchTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn plan(&self) -> &[usize] {
        &self.plan
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Record that batch position `index` settled.
    pub fn settle(&mut self, ticket: BatchTicket, index: usize, ok: bool) -> Advance {
        if !self.is_current(ticket) {
            return Advance::Stale;
        }
        match self.state {
            LoaderState::Loading { index: expected } if expected == index => {}
            _ => return Advance::Stale,
        }
        if ok {
            self.loaded += 1;
        } else {
            self.failed += 1;
        }
        let next = index + 1;
        if next < self.plan.len() {
            self.state = LoaderState::Loading { index: next };
            Advance::Next { index: next }
        } else {
            self.state = LoaderState::Complete;
            Advance::Complete
        }
    }
}

/// Position of entry `index` of `count` on the showcase circle.
pub fn radial_position(index: usize, count: usize, radius: f32) -> Vec3 {
    if count == 0 {
        return Vec3::ZERO;
    }
    let angle = TAU / count as f32 * index as f32;
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

/// Uniform scale and translation applied to a loaded model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub scale: f32,
    /// Model-space centre of the rest-pose bounds, cancelled out before placement.
    pub center: Vec3,
    pub position: Vec3,
}

impl Placement {
    /// Scale so the largest edge of `bounds` equals [`NORMALIZED_SIZE`] and
    /// centre the result on `position`.
    pub fn normalized(bounds: &Aabb, position: Vec3) -> Self {
        let max_dim = bounds.max_dimension();
        let scale = if max_dim > f32::EPSILON {
            NORMALIZED_SIZE / max_dim
        } else {
            1.0
        };
        Self {
            scale,
            center: bounds.center(),
            position,
        }
    }

    pub fn for_batch(bounds: &Aabb, index: usize, count: usize, single: bool) -> Self {
        let position = if single {
            Vec3::ZERO
        } else {
            radial_position(index, count, RADIAL_RADIUS)
        };
        Self::normalized(bounds, position)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::IDENTITY,
            self.position - self.center * self.scale,
        )
    }
}
