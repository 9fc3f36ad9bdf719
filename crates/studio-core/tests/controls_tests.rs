// Orbit controls, keyframe sampling and rig hierarchy.

use glam::{Mat4, Quat, Vec3};
use std::f32::consts::PI;
use std::time::Duration;
use studio_core::constants::{ORBIT_MAX_RADIUS, ORBIT_MIN_RADIUS};
use studio_core::*;

fn slide_clip(interpolation: Interpolation) -> AnimationClip {
    AnimationClip::new(
        "slide",
        vec![Channel {
            node: 0,
            times: vec![0.0, 1.0, 2.0],
            values: ChannelValues::Translation(vec![
                Vec3::ZERO,
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(20.0, 0.0, 0.0),
            ]),
            interpolation,
        }],
    )
}

fn sample_x(clip: &AnimationClip, t: f32) -> f32 {
    let mut pose = vec![NodeTransform::default()];
    clip.sample(t, &mut pose);
    pose[0].translation.x
}

#[test]
fn orbit_reproduces_its_initial_eye() {
    let eye = Vec3::new(0.0, 5.0, 25.0);
    let orbit = OrbitControls::new(eye, Vec3::ZERO);
    assert!(orbit.eye().distance(eye) < 1e-4);
    let view = orbit.view_matrix();
    assert!(view.transform_point3(Vec3::ZERO).x.abs() < 1e-4);
}

#[test]
fn orbit_motion_is_damped() {
    let mut orbit = OrbitControls::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    let start = orbit.azimuth();
    orbit.rotate_by_pixels(100.0, 0.0, 500.0);
    orbit.update();
    let first = orbit.azimuth() - start;
    let before = orbit.azimuth();
    orbit.update();
    let second = orbit.azimuth() - before;
    assert!(first.abs() > 0.0);
    assert!(second.abs() < first.abs());
    assert_eq!(first.signum(), second.signum());
}

#[test]
fn orbit_never_reaches_the_poles() {
    let mut orbit = OrbitControls::new(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO);
    for _ in 0..50 {
        orbit.rotate_by_pixels(0.0, -10_000.0, 400.0);
        let eye = orbit.update();
        assert!(eye.is_finite());
        assert!(orbit.polar() > 0.0 && orbit.polar() < PI);
    }
    for _ in 0..50 {
        orbit.rotate_by_pixels(0.0, 10_000.0, 400.0);
        orbit.update();
        assert!(orbit.polar() > 0.0 && orbit.polar() < PI);
    }
}

#[test]
fn zoom_respects_radius_limits() {
    let mut orbit = OrbitControls::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    orbit.zoom(-1.0);
    orbit.update();
    assert!((orbit.radius() - 9.5).abs() < 1e-4);
    for _ in 0..500 {
        orbit.zoom(-1.0);
        orbit.update();
    }
    assert!(orbit.radius() >= ORBIT_MIN_RADIUS);
    for _ in 0..2000 {
        orbit.zoom(1.0);
        orbit.update();
    }
    assert!(orbit.radius() <= ORBIT_MAX_RADIUS);
}

#[test]
fn retarget_keeps_the_eye_in_place() {
    let mut orbit = OrbitControls::new(Vec3::new(0.0, 5.0, 25.0), Vec3::ZERO);
    let eye = orbit.eye();
    orbit.retarget(Vec3::new(2.0, 1.0, -3.0));
    assert!(orbit.eye().distance(eye) < 1e-3);
    assert_eq!(orbit.target, Vec3::new(2.0, 1.0, -3.0));
}

#[test]
fn clip_clamps_outside_its_range() {
    let clip = slide_clip(Interpolation::Linear);
    assert!((clip.duration - 2.0).abs() < 1e-6);
    assert_eq!(sample_x(&clip, -1.0), 0.0);
    assert_eq!(sample_x(&clip, 5.0), 20.0);
    assert!((sample_x(&clip, 0.5) - 5.0).abs() < 1e-5);
    assert!((sample_x(&clip, 1.5) - 15.0).abs() < 1e-5);
}

#[test]
fn step_interpolation_holds_the_previous_key() {
    let clip = slide_clip(Interpolation::Step);
    assert_eq!(sample_x(&clip, 1.5), 10.0);
    assert_eq!(sample_x(&clip, 0.99), 0.0);
}

#[test]
fn mixer_loops_and_rewinds_on_stop() {
    let rest = vec![NodeTransform {
        translation: Vec3::new(0.0, 3.0, 0.0),
        ..NodeTransform::default()
    }];
    let mut mixer = Mixer::new(vec![slide_clip(Interpolation::Linear)], rest.clone());
    assert_eq!(mixer.clip_count(), 1);

    mixer.update(Duration::from_millis(500));
    assert_eq!(mixer.pose(), rest.as_slice());

    mixer.play_all();
    mixer.update(Duration::from_millis(2500));
    assert!((mixer.pose()[0].translation.x - 5.0).abs() < 1e-4);

    mixer.stop_all();
    assert!(!mixer.is_playing());
    assert_eq!(mixer.pose(), rest.as_slice());
}

#[test]
fn rotation_channel_slerps() {
    let clip = AnimationClip::new(
        "turn",
        vec![Channel {
            node: 0,
            times: vec![0.0, 1.0],
            values: ChannelValues::Rotation(vec![Quat::IDENTITY, Quat::from_rotation_y(PI / 2.0)]),
            interpolation: Interpolation::Linear,
        }],
    );
    let mut pose = vec![NodeTransform::default()];
    clip.sample(0.5, &mut pose);
    assert!(pose[0].rotation.abs_diff_eq(Quat::from_rotation_y(PI / 4.0), 1e-5));
}

#[test]
fn world_matrices_compose_parent_chain() {
    let rig = ModelRig {
        nodes: vec![
            RigNode {
                rest: NodeTransform {
                    translation: Vec3::new(1.0, 0.0, 0.0),
                    scale: Vec3::splat(2.0),
                    ..NodeTransform::default()
                },
                ..RigNode::default()
            },
            RigNode {
                parent: Some(0),
                rest: NodeTransform {
                    translation: Vec3::new(0.0, 2.0, 0.0),
                    ..NodeTransform::default()
                },
                mesh: Some(0),
                ..RigNode::default()
            },
        ],
        mesh_bounds: vec![Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))],
    };
    let world = rig.world_matrices(&rig.rest_pose());
    assert!(world[1]
        .transform_point3(Vec3::ZERO)
        .abs_diff_eq(Vec3::new(1.0, 4.0, 0.0), 1e-5));

    let bounds = rig.bounds(&rig.rest_pose());
    assert!(bounds.center().abs_diff_eq(Vec3::new(1.0, 4.0, 0.0), 1e-5));
    assert!((bounds.max_dimension() - 2.0).abs() < 1e-5);
    assert_eq!(rig.mesh_instance_count(), 1);
}

#[test]
fn bounds_transform_and_union() {
    let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
    let b = a.transformed(&Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));
    let both = a.union(b);
    assert_eq!(both.min, Vec3::ZERO);
    assert_eq!(both.max, Vec3::new(3.0, 1.0, 1.0));
    assert!(Aabb::EMPTY.is_empty());
    assert_eq!(Aabb::EMPTY.union(a), a);
}

#[test]
fn radial_positions_share_the_circle() {
    for i in 0..6 {
        let p = radial_position(i, 6, 12.0);
        assert!((p.length() - 12.0).abs() < 1e-4);
        assert_eq!(p.y, 0.0);
    }
    assert!(radial_position(0, 4, 12.0).abs_diff_eq(Vec3::new(12.0, 0.0, 0.0), 1e-5));
    assert!(radial_position(1, 4, 12.0).abs_diff_eq(Vec3::new(0.0, 0.0, 12.0), 1e-4));
}
