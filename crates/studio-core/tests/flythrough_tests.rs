// Flythrough timing, path and fade behaviour.

use glam::Vec3;
use studio_core::constants::SLOGAN_LEFT_GLOW;
use studio_core::easing::{clamp01, lerp, sinusoidal_in_out};
use studio_core::*;

const EPS: f32 = 1e-4;

fn hero() -> Flythrough {
    Flythrough::new(TimingConfig::default(), CameraPath::hero().unwrap()).unwrap()
}

#[test]
fn easing_hits_endpoints_and_midpoint() {
    assert!(sinusoidal_in_out(0.0).abs() < EPS);
    assert!((sinusoidal_in_out(1.0) - 1.0).abs() < EPS);
    assert!((sinusoidal_in_out(0.5) - 0.5).abs() < EPS);
    let mut prev = 0.0;
    for i in 1..=100 {
        let v = sinusoidal_in_out(i as f32 / 100.0);
        assert!(v >= prev, "easing not monotonic at step {i}");
        prev = v;
    }
    assert_eq!(clamp01(1.7), 1.0);
    assert!((lerp(2.0, 4.0, 0.25) - 2.5).abs() < EPS);
}

#[test]
fn driver_runs_pauses_and_restarts() {
    let mut driver = ProgressDriver::new(1000.0, 7000.0);
    assert_eq!(driver.phase(), DriverPhase::Idle);
    let gen = driver.start(0.0);
    assert_eq!(gen, 1);
    assert!((driver.progress() - 0.05).abs() < EPS);

    assert_eq!(driver.update(500.0), DriverEvent::None);
    assert!((driver.progress() - 0.525).abs() < EPS);

    assert_eq!(driver.update(1000.0), DriverEvent::Completed);
    assert_eq!(driver.progress(), 1.0);

    assert_eq!(driver.update(5000.0), DriverEvent::None);
    assert!(matches!(driver.phase(), DriverPhase::Pausing { .. }));

    assert_eq!(driver.update(8000.0), DriverEvent::Restarted { generation: 2 });
    assert!((driver.progress() - 0.05).abs() < EPS);
    assert_eq!(driver.cycle_start_ms(), 8000.0);
}

#[test]
fn progress_stays_within_bounds() {
    let mut driver = ProgressDriver::new(15_000.0, 7000.0);
    driver.start(0.0);
    let mut prev = driver.progress();
    let mut now = 0.0;
    while now <= 15_000.0 {
        driver.update(now);
        let p = driver.progress();
        assert!((0.05..=1.0).contains(&p));
        assert!(p >= prev);
        prev = p;
        now += 16.0;
    }
}

#[test]
fn manual_restart_during_pause_does_not_double_restart() {
    let mut driver = ProgressDriver::new(1000.0, 7000.0);
    driver.start(0.0);
    assert_eq!(driver.update(1000.0), DriverEvent::Completed);
    driver.start(2000.0);
    let mut now = 2000.0;
    while now < 15_000.0 {
        let event = driver.update(now);
        assert!(
            !matches!(event, DriverEvent::Restarted { .. }),
            "stale pause restarted the tween at {now}"
        );
        now += 250.0;
    }
}

#[test]
fn stop_cancels_pending_restart_and_ensure_running_starts_fresh() {
    let mut driver = ProgressDriver::new(1000.0, 7000.0);
    driver.start(0.0);
    driver.update(1000.0);
    driver.stop();
    assert_eq!(driver.phase(), DriverPhase::Stopped);
    assert_eq!(driver.update(9000.0), DriverEvent::None);
    assert_eq!(driver.progress(), 1.0);

    assert!(driver.ensure_running(10_000.0));
    assert!((driver.progress() - 0.05).abs() < EPS);
    assert!(!driver.ensure_running(10_100.0));
    assert_eq!(driver.generation(), 3);
}

#[test]
fn path_passes_through_control_points() {
    let path = CameraPath::hero().unwrap();
    assert!(path.point(0.0).distance(Vec3::new(0.0, 0.0, 50.0)) < EPS);
    assert!(path.point(0.2).distance(Vec3::new(10.0, 2.0, 0.0)) < 1e-3);
    assert!(path.point(1.0).distance(Vec3::new(0.0, 0.0, -320.0)) < 1e-3);
    assert!(path.point_at(0.0).distance(Vec3::new(0.0, 0.0, 50.0)) < 1e-3);
    assert!(path.point_at(1.0).distance(Vec3::new(0.0, 0.0, -320.0)) < 1e-2);
    assert!(path.length() > 370.0);
}

#[test]
fn path_follows_centripetal_curve_with_mirrored_ends() {
    let path = CameraPath::hero().unwrap();
    let expected = [
        (0.1, Vec3::new(6.4153, 1.2831, 25.7095)),
        (0.3, Vec3::new(-0.2102, -0.0420, -38.8522)),
        (0.5, Vec3::new(0.0, 0.0, -120.0)),
        (0.7, Vec3::new(0.6066, 0.1213, -199.9407)),
        (0.933, Vec3::new(-4.4542, -0.8908, -293.1654)),
        (0.95, Vec3::new(-3.1936, -0.6387, -299.9783)),
    ];
    for (t, want) in expected {
        let got = path.point(t);
        assert!(got.distance(want) < 2e-3, "t={t}: got {got:?}, want {want:?}");
    }
}

#[test]
fn arc_length_sampling_is_even_and_continuous() {
    let path = CameraPath::hero().unwrap();
    let steps = 1000;
    let expected = path.length() / steps as f32;
    let mut prev = path.point_at(0.0);
    for i in 1..=steps {
        let cur = path.point_at(i as f32 / steps as f32);
        let d = cur.distance(prev);
        assert!(
            d > expected * 0.75 && d < expected * 1.25,
            "uneven step {d} (expected ~{expected}) at sample {i}"
        );
        prev = cur;
    }
}

#[test]
fn degenerate_paths_are_rejected() {
    assert_eq!(
        CameraPath::new(vec![Vec3::ZERO]).unwrap_err(),
        PathError::TooFewPoints(1)
    );
    assert_eq!(
        CameraPath::new(vec![Vec3::ONE, Vec3::ONE]).unwrap_err(),
        PathError::ZeroLength
    );
}

#[test]
fn section_delay_grows_with_index() {
    let cfg = TimingConfig::default();
    assert!((cfg.image_delay_for_section(0) - 1000.0).abs() < 1e-9);
    assert!((cfg.image_delay_for_section(1) - 1120.0).abs() < 1e-9);
    for s in 0..10 {
        assert!(cfg.image_delay_for_section(s + 1) > cfg.image_delay_for_section(s));
    }
}

#[test]
fn config_validation_rejects_bad_values() {
    assert!(TimingConfig::default().validate().is_ok());
    let cfg = TimingConfig {
        animation_duration_ms: 0.0,
        ..TimingConfig::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::NonPositive {
            field: "animation_duration_ms",
            ..
        })
    ));
    let cfg = TimingConfig {
        text_fade_speed: 1.5,
        ..TimingConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ConfigError::OutOfUnitRange { .. })));

    let cfg = TimingConfig {
        image_delay_ms: 0.0,
        ..TimingConfig::default()
    };
    assert!(cfg.validate().is_ok());
    let cfg = TimingConfig {
        image_delay_ms: -5.0,
        ..TimingConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert_eq!(
        err,
        ConfigError::Negative {
            field: "image_delay_ms",
            value: -5.0
        }
    );
    assert_eq!(err.to_string(), "image_delay_ms must be zero or greater, got -5");
}

#[test]
fn text_fades_with_camera_distance() {
    let cfg = TimingConfig::default();
    let mut text = DiscoveryPoint::text(Vec3::ZERO);
    text.step(Vec3::new(0.0, 0.0, 100.0), 0.0, 0.0, &cfg);
    assert_eq!(text.opacity(), 0.0);
    text.step(Vec3::ZERO, 16.0, 0.0, &cfg);
    assert!((text.opacity() - 0.1).abs() < EPS);
    for i in 0..200 {
        text.step(Vec3::ZERO, 32.0 + i as f64 * 16.0, 0.0, &cfg);
        assert!((0.0..=1.0).contains(&text.opacity()));
    }
    assert!(text.opacity() > 0.99);
}

#[test]
fn image_waits_for_section_delay_then_ramps_once() {
    let cfg = TimingConfig::default();
    let mut image = DiscoveryPoint::image(Vec3::ZERO, 0, &cfg);
    let near = Vec3::new(0.0, 0.0, 10.0);
    let far = Vec3::new(0.0, 0.0, 100.0);

    let mut now = 0.0;
    while now < 1000.0 {
        image.step(near, now, 0.0, &cfg);
        assert_eq!(image.opacity(), 0.0, "visible before its delay at {now}");
        now += 50.0;
    }
    assert!(matches!(image.image_phase(), Some(ImagePhase::Eligible { .. })));

    image.step(near, 1000.0, 0.0, &cfg);
    assert_eq!(image.image_phase(), Some(ImagePhase::Fading { start_ms: 1000.0 }));

    image.step(near, 2000.0, 0.0, &cfg);
    assert!((image.opacity() - 0.025).abs() < EPS);

    // Leaving the range drops the target but never rewinds the phase.
    image.step(far, 2500.0, 0.0, &cfg);
    assert!(matches!(image.image_phase(), Some(ImagePhase::Fading { .. })));
    image.step(far, 3500.0, 0.0, &cfg);
    assert_eq!(image.image_phase(), Some(ImagePhase::Steady));

    // Coming back into range resumes at full target instead of replaying the ramp.
    let before = image.opacity();
    image.step(near, 3600.0, 0.0, &cfg);
    assert_eq!(image.image_phase(), Some(ImagePhase::Steady));
    let resumed = lerp(before, 1.0, cfg.image_fade_speed);
    assert!((image.opacity() - resumed).abs() < EPS);
    assert!(image.opacity() > before);

    image.reset_for_cycle();
    assert_eq!(image.image_phase(), Some(ImagePhase::Pending));
    assert_eq!(image.opacity(), 0.0);
}

#[test]
fn later_sections_wait_longer() {
    let cfg = TimingConfig::default();
    let mut image = DiscoveryPoint::image(Vec3::ZERO, 3, &cfg);
    let near = Vec3::new(5.0, 0.0, 0.0);
    image.step(near, 1200.0, 0.0, &cfg);
    assert!(matches!(image.image_phase(), Some(ImagePhase::Eligible { .. })));
    image.step(near, 1400.0, 0.0, &cfg);
    assert!(matches!(image.image_phase(), Some(ImagePhase::Fading { .. })));
}

#[test]
fn terminal_reveal_switches_at_threshold() {
    let hidden = TerminalReveal::at(0.95);
    assert!(!hidden.visible);
    assert_eq!(hidden.opacity, 0.0);

    let partial = TerminalReveal::at(0.97);
    assert!(partial.visible);
    assert!((partial.opacity - 0.4).abs() < 1e-3);

    let full = TerminalReveal::at(1.0);
    assert!(full.visible);
    assert!((full.opacity - 1.0).abs() < 1e-3);
}

#[test]
fn glow_pulses_around_its_base() {
    assert!((text_glow(0.0) - 1.1).abs() < EPS);
    for i in 0..100 {
        let t = i as f32 * 0.1;
        let g = text_glow(t);
        assert!((0.7 - EPS..=1.5 + EPS).contains(&g));
        let s = slogan_glow(1.2, t);
        assert!((0.84 - EPS..=1.56 + EPS).contains(&s));
    }
}

#[test]
fn rig_turns_toward_the_look_ahead_target() {
    let path = CameraPath::hero().unwrap();
    let mut rig = CameraRig::default();
    for _ in 0..150 {
        rig.follow(&path, 0.05);
    }
    let ahead = (path.look_target(0.05) - rig.position).normalize();
    assert!(rig.forward().dot(ahead) > 0.99);
}

#[test]
fn flythrough_frames_follow_the_tween() {
    let mut fly = hero();
    fly.start(0.0);
    let state = fly.frame(7500.0, 7.5);
    assert!((state.progress - 0.525).abs() < EPS);
    assert!(!state.terminal.visible);
    assert!(state.camera_position.distance(fly.path().point_at(0.525)) < EPS);

    let state = fly.frame(15_000.0, 15.0);
    assert_eq!(state.event, DriverEvent::Completed);
    assert!(state.terminal.visible);
}

#[test]
fn restart_resets_images_and_slogan() {
    let mut fly = hero();
    let img = fly.add_image(Vec3::new(0.0, 0.0, -30.0), 0);
    fly.add_slogan_part(SLOGAN_LEFT_GLOW);
    fly.start(0.0);
    let mut now = 0.0;
    while now <= 15_000.0 {
        fly.frame(now, (now / 1000.0) as f32);
        now += 100.0;
    }
    assert_ne!(fly.points()[img].image_phase(), Some(ImagePhase::Pending));
    assert!(fly.slogan()[0].opacity() > 0.99);

    let state = fly.frame(22_000.0, 22.0);
    assert!(matches!(state.event, DriverEvent::Restarted { .. }));
    assert_eq!(fly.points()[img].image_phase(), Some(ImagePhase::Pending));
    assert_eq!(fly.points()[img].opacity(), 0.0);
    assert_eq!(fly.slogan()[0].opacity(), 0.0);
}

#[test]
fn leaving_and_reentering_viewport_starts_fresh() {
    let mut fly = hero();
    fly.start(0.0);
    fly.frame(5000.0, 5.0);
    fly.set_visible(false, 6000.0);
    let frozen = fly.frame(9000.0, 9.0).progress;
    assert_eq!(fly.frame(12_000.0, 12.0).progress, frozen);

    fly.set_visible(true, 13_000.0);
    let state = fly.frame(13_000.0, 13.0);
    assert!((state.progress - 0.05).abs() < EPS);
}

#[test]
fn particle_field_fills_its_cube() {
    use rand::{rngs::StdRng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(7);
    let field = ParticleField::scatter(HERO_PARTICLES, &mut rng);
    assert_eq!(field.positions.len(), 7000);
    let half = HERO_PARTICLES.spread / 2.0;
    assert!(field
        .positions
        .iter()
        .flatten()
        .all(|c| (-half..=half).contains(c)));

    let mut spin = Spin::default();
    for _ in 0..10 {
        spin.advance_ambient();
    }
    assert!((spin.y - 0.005).abs() < 1e-6);
}
