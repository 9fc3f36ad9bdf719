// Sequential loading, selection changes and AR backdrop handling of the
// showcase session, driven through a fake asset source.

use futures::executor::block_on;
use glam::{Quat, Vec3};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::future::{ready, Future};
use std::rc::Rc;
use std::time::Duration;
use studio_core::*;

type Session = ViewerSession<(), FakeStream>;

struct FakeStream {
    live: Rc<Cell<usize>>,
}

impl FakeStream {
    fn new(tracks: usize) -> (Self, Rc<Cell<usize>>) {
        let live = Rc::new(Cell::new(tracks));
        (Self { live: live.clone() }, live)
    }
}

impl MediaTracks for FakeStream {
    fn stop_all(&mut self) {
        self.live.set(0);
    }

    fn live_tracks(&self) -> usize {
        self.live.get()
    }
}

fn cube(min: Vec3, max: Vec3, clips: Vec<AnimationClip>) -> FetchedModel<()> {
    FetchedModel {
        rig: ModelRig {
            nodes: vec![RigNode {
                mesh: Some(0),
                ..RigNode::default()
            }],
            mesh_bounds: vec![Aabb::new(min, max)],
        },
        clips,
        gpu: (),
    }
}

fn spin_clip() -> AnimationClip {
    AnimationClip::new(
        "spin",
        vec![Channel {
            node: 0,
            times: vec![0.0, 1.0],
            values: ChannelValues::Rotation(vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)]),
            interpolation: Interpolation::Linear,
        }],
    )
}

#[derive(Default)]
struct FakeFetch {
    failing: HashSet<String>,
    requested: RefCell<Vec<String>>,
}

impl FakeFetch {
    fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl ModelFetch for FakeFetch {
    type Gpu = ();

    fn fetch(&self, entry: &ModelEntry) -> impl Future<Output = Result<FetchedModel<()>, LoadError>> {
        self.requested.borrow_mut().push(entry.display_name.clone());
        let result = if self.failing.contains(&entry.display_name) {
            Err(LoadError::Fetch {
                path: entry.source_path.clone(),
                reason: "404".into(),
            })
        } else {
            Ok(cube(Vec3::splat(-1.0), Vec3::splat(1.0), vec![spin_clip()]))
        };
        ready(result)
    }
}

fn names(catalog: &[ModelEntry]) -> Vec<String> {
    catalog.iter().map(|e| e.display_name.clone()).collect()
}

fn session() -> RefCell<Session> {
    RefCell::new(Session::create(default_catalog()).unwrap())
}

#[test]
fn batch_loads_in_catalog_order() {
    let session = session();
    let fetch = FakeFetch::default();
    let ticket = session.borrow_mut().reconfigure(Selection::All).unwrap();
    block_on(run_batch(&session, &fetch, ticket));

    let s = session.borrow();
    assert_eq!(*fetch.requested.borrow(), names(s.catalog()));
    assert_eq!(s.models().len(), 6);
    assert_eq!(s.loader_state(), LoaderState::Complete);
    assert!(!s.loading_visible());
}

#[test]
fn a_failing_entry_does_not_abort_the_batch() {
    let catalog = default_catalog();
    let bad = catalog[2].display_name.clone();
    let session = session();
    let fetch = FakeFetch::failing(&[&bad]);
    let ticket = session.borrow_mut().reconfigure(Selection::All).unwrap();
    block_on(run_batch(&session, &fetch, ticket));

    let s = session.borrow();
    assert_eq!(fetch.requested.borrow().len(), 6);
    assert_eq!(s.models().len(), 5);
    assert!(s.models().iter().all(|m| m.entry.display_name != bad));
    assert_eq!(s.loader_state(), LoaderState::Complete);
    assert!(!s.loading_visible());
}

#[test]
fn loading_indicator_hides_on_first_settle_even_on_failure() {
    let mut s = Session::create(default_catalog()).unwrap();
    let ticket = s.reconfigure(Selection::All).unwrap();
    assert!(s.loading_visible());
    let first = s.first_request(ticket).unwrap();
    let outcome = s.settle(
        &first,
        Err(LoadError::Empty {
            path: first.entry.source_path.clone(),
        }),
    );
    assert!(matches!(outcome, SettleOutcome::Next(LoadRequest { index: 1, .. })));
    assert!(!s.loading_visible());
    assert!(s.models().is_empty());
}

#[test]
fn reselecting_mid_batch_discards_the_old_batch() {
    let mut s = Session::create(default_catalog()).unwrap();
    let old = s.reconfigure(Selection::All).unwrap();
    let first = s.first_request(old).unwrap();
    let SettleOutcome::Next(second) =
        s.settle(&first, Ok(cube(Vec3::ZERO, Vec3::ONE, Vec::new())))
    else {
        panic!("expected a follow-up request");
    };
    assert_eq!(s.models().len(), 1);

    let new = s.reconfigure(Selection::Single(4)).unwrap();
    assert!(s.models().is_empty());
    assert!(!s.is_current(old));

    // The in-flight result of the old batch arrives late.
    let outcome = s.settle(&second, Ok(cube(Vec3::ZERO, Vec3::ONE, Vec::new())));
    assert_eq!(outcome, SettleOutcome::Stale);
    assert!(s.models().is_empty());

    let only = s.first_request(new).unwrap();
    assert_eq!(only.catalog_index, 4);
    assert_eq!(
        s.settle(&only, Ok(cube(Vec3::ZERO, Vec3::ONE, Vec::new()))),
        SettleOutcome::Complete
    );
    assert_eq!(s.models().len(), 1);
    assert_eq!(s.models()[0].catalog_index, 4);
}

/// Switches the session to a single model while the second entry is in flight.
struct ReselectingFetch<'a> {
    session: &'a RefCell<Session>,
    inner: FakeFetch,
    reselected: Cell<Option<BatchTicket>>,
}

impl ModelFetch for ReselectingFetch<'_> {
    type Gpu = ();

    fn fetch(&self, entry: &ModelEntry) -> impl Future<Output = Result<FetchedModel<()>, LoadError>> {
        if self.inner.requested.borrow().len() == 1 && self.reselected.get().is_none() {
            let ticket = self
                .session
                .borrow_mut()
                .reconfigure(Selection::Single(3))
                .unwrap();
            self.reselected.set(Some(ticket));
        }
        self.inner.fetch(entry)
    }
}

#[test]
fn reselection_during_async_batch_leaves_no_residual_models() {
    let session = session();
    let fetch = ReselectingFetch {
        session: &session,
        inner: FakeFetch::default(),
        reselected: Cell::new(None),
    };
    let ticket = session.borrow_mut().reconfigure(Selection::All).unwrap();
    block_on(run_batch(&session, &fetch, ticket));

    // The superseded batch stopped after the entry that was in flight.
    assert_eq!(fetch.inner.requested.borrow().len(), 2);
    assert!(session.borrow().models().is_empty());

    let ticket = fetch.reselected.get().unwrap();
    block_on(run_batch(&session, &fetch, ticket));
    let s = session.borrow();
    assert_eq!(s.models().len(), 1);
    assert_eq!(s.models()[0].catalog_index, 3);
    assert_eq!(s.selection(), Selection::Single(3));
}

#[test]
fn models_are_normalized_and_centered() {
    let mut s = Session::create(default_catalog()).unwrap();
    let ticket = s.reconfigure(Selection::Single(0)).unwrap();
    let req = s.first_request(ticket).unwrap();
    s.settle(
        &req,
        Ok(cube(
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(12.0, 14.0, 10.5),
            Vec::new(),
        )),
    );
    let model = &s.models()[0];
    assert!((model.placement.scale - 1.25).abs() < 1e-5);
    let placed = model.placed_bounds();
    assert!((placed.max_dimension() - 5.0).abs() < 1e-4);
    assert!(placed.center().length() < 1e-4);
    assert!(s.orbit().target.length() < 1e-4);
}

#[test]
fn all_mode_arranges_models_on_a_circle() {
    let session = session();
    let fetch = FakeFetch::default();
    let ticket = session.borrow_mut().reconfigure(Selection::All).unwrap();
    block_on(run_batch(&session, &fetch, ticket));

    let s = session.borrow();
    for (i, model) in s.models().iter().enumerate() {
        let expected = radial_position(i, 6, 12.0);
        assert!(model.placed_bounds().center().distance(expected) < 1e-3);
    }
    // Completion reframes on the whole group.
    assert!(s.orbit().target.distance(s.group_bounds().center()) < 1e-3);
    assert!(s.orbit().target.length() < 1e-3);
}

#[test]
fn animations_autoplay_only_in_single_mode() {
    let session = session();
    let fetch = FakeFetch::default();
    let ticket = session.borrow_mut().reconfigure(Selection::All).unwrap();
    block_on(run_batch(&session, &fetch, ticket));
    assert!(session
        .borrow()
        .models()
        .iter()
        .all(|m| !m.mixer.as_ref().unwrap().is_playing()));

    let ticket = session.borrow_mut().reconfigure(Selection::Single(1)).unwrap();
    block_on(run_batch(&session, &fetch, ticket));
    assert!(session.borrow().models()[0]
        .mixer
        .as_ref()
        .unwrap()
        .is_playing());

    session.borrow_mut().set_animation_enabled(false);
    assert!(!session.borrow().models()[0]
        .mixer
        .as_ref()
        .unwrap()
        .is_playing());

    let ticket = session.borrow_mut().reconfigure(Selection::Single(2)).unwrap();
    block_on(run_batch(&session, &fetch, ticket));
    assert!(!session.borrow().models()[0]
        .mixer
        .as_ref()
        .unwrap()
        .is_playing());
}

#[test]
fn tick_rotates_the_group_only_in_all_mode() {
    let mut s = Session::create(default_catalog()).unwrap();
    s.reconfigure(Selection::All).unwrap();
    for _ in 0..10 {
        s.tick(Duration::from_millis(16));
    }
    let expected = glam::Mat4::from_rotation_y(0.05);
    assert!(s.group_matrix().abs_diff_eq(expected, 1e-5));

    s.reconfigure(Selection::Single(0)).unwrap();
    s.tick(Duration::from_millis(16));
    assert!(s.group_matrix().abs_diff_eq(glam::Mat4::IDENTITY, 1e-6));
}

#[test]
fn camera_eye_depends_on_mode() {
    let mut s = Session::create(default_catalog()).unwrap();
    s.reconfigure(Selection::Single(0)).unwrap();
    assert!(s.orbit().eye().distance(Vec3::new(0.0, 5.0, 10.0)) < 1e-3);
    s.reconfigure(Selection::All).unwrap();
    assert!(s.orbit().eye().distance(Vec3::new(0.0, 5.0, 25.0)) < 1e-3);
}

#[test]
fn model_scale_applies_only_to_a_focused_model() {
    let mut s = Session::create(default_catalog()).unwrap();
    let ticket = s.reconfigure(Selection::All).unwrap();
    let req = s.first_request(ticket).unwrap();
    s.settle(&req, Ok(cube(Vec3::splat(-1.0), Vec3::splat(1.0), Vec::new())));
    assert!(!s.set_model_scale(2.0));

    let ticket = s.reconfigure(Selection::Single(5)).unwrap();
    let req = s.first_request(ticket).unwrap();
    s.settle(&req, Ok(cube(Vec3::splat(-1.0), Vec3::splat(1.0), Vec::new())));
    assert!(s.set_model_scale(2.0));
    assert!(!s.set_model_scale(0.0));
    let placed = s.models()[0].placed_bounds();
    assert!((placed.max_dimension() - 4.0).abs() < 1e-4);
    assert!(placed.center().length() < 1e-4);
    assert_eq!(s.settings().model_scale, Some(2.0));
}

#[test]
fn invalid_selections_are_rejected() {
    assert!(matches!(
        Session::create(Vec::new()),
        Err(SelectionError::EmptyCatalog)
    ));
    let mut s = Session::create(default_catalog()).unwrap();
    assert_eq!(
        s.reconfigure(Selection::Single(99)).unwrap_err(),
        SelectionError::OutOfRange { index: 99, len: 6 }
    );
    assert_eq!(Selection::from_wire(-1).unwrap(), Selection::All);
    assert_eq!(Selection::from_wire(2).unwrap(), Selection::Single(2));
    assert_eq!(
        Selection::from_wire(-3).unwrap_err(),
        SelectionError::Invalid(-3)
    );
    s.dispose();
    assert_eq!(
        s.reconfigure(Selection::All).unwrap_err(),
        SelectionError::Disposed
    );
}

#[test]
fn ar_grant_makes_background_transparent() {
    let mut s = Session::create(default_catalog()).unwrap();
    assert!(s.set_background([0.2, 0.3, 0.4]));
    assert_eq!(s.clear_color(), [0.2, 0.3, 0.4, 1.0]);

    assert!(s.ar_mut().request());
    let (stream, live) = FakeStream::new(1);
    assert!(s.ar_mut().grant(stream));
    assert_eq!(s.clear_color()[3], 0.0);
    assert!(!s.set_background([1.0, 1.0, 1.0]));

    // A live stream is reused instead of asking again.
    assert!(!s.ar_mut().request());

    s.ar_mut().disable();
    assert_eq!(live.get(), 0);
    assert_eq!(s.ar().live_tracks(), 0);
    assert_eq!(s.clear_color(), [0.2, 0.3, 0.4, 1.0]);
}

#[test]
fn ar_denial_reverts_to_off() {
    let mut ar: ArBackdrop<FakeStream> = ArBackdrop::new();
    assert!(ar.request());
    assert!(ar.is_enabled());
    ar.deny();
    assert!(!ar.is_enabled());
    assert!(!ar.clears_transparent());
}

#[test]
fn late_grant_after_disable_is_released() {
    let mut ar: ArBackdrop<FakeStream> = ArBackdrop::new();
    ar.request();
    ar.disable();
    let (stream, live) = FakeStream::new(2);
    assert!(!ar.grant(stream));
    assert_eq!(live.get(), 0);
    assert!(!ar.is_live());
}

#[test]
fn dispose_releases_the_camera() {
    let mut s = Session::create(default_catalog()).unwrap();
    s.ar_mut().request();
    let (stream, live) = FakeStream::new(1);
    s.ar_mut().grant(stream);
    s.dispose();
    assert_eq!(live.get(), 0);
    assert!(s.is_disposed());
}
