// Host-side tests for page constants and scene content.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use studio_core::constants::{HERO_PATH, TERMINAL_THRESHOLD};

#[test]
fn rgb_unpacks_hex_channels() {
    assert_eq!(rgb(0xffffff), [1.0, 1.0, 1.0]);
    assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0]);
    let orange = rgb(0xf46c27);
    assert!((orange[0] - 244.0 / 255.0).abs() < 1e-6);
    assert!((orange[1] - 108.0 / 255.0).abs() < 1e-6);
    assert!((orange[2] - 39.0 / 255.0).abs() < 1e-6);
}

#[test]
fn hero_labels_alternate_sides_and_colours() {
    for pair in HERO_TEXTS.windows(2) {
        assert_eq!(pair[0].position[0], -pair[1].position[0]);
        assert_ne!(pair[0].color, pair[1].color);
        // each label sits further down the path than the previous one
        assert!(pair[1].position[2] < pair[0].position[2]);
    }
}

#[test]
fn hero_panels_lie_within_the_camera_path() {
    let first_z = HERO_PATH[0][2];
    let last_z = HERO_PATH[HERO_PATH.len() - 1][2];
    for label in &HERO_TEXTS {
        assert!(label.position[2] < first_z && label.position[2] > last_z);
    }
    for (_, pos) in &HERO_IMAGES {
        assert!(pos[2] < first_z && pos[2] > last_z);
        assert_eq!(pos[0], 0.0);
    }
}

#[test]
fn terminal_group_sits_beyond_the_path_end() {
    let last_z = HERO_PATH[HERO_PATH.len() - 1][2];
    assert!(LOGO_POSITION[2] < last_z);
    assert_eq!(LOGO_POSITION[2], SLOGAN_ORIGIN[2]);
    assert!(LOGO_POSITION[1] > SLOGAN_ORIGIN[1]);
    assert!(TERMINAL_THRESHOLD < 1.0);
}

#[test]
fn slogan_parts_are_mirrored() {
    let [(_, left, _), (_, right, _)] = SLOGAN_PARTS;
    assert_eq!(left, -right);
    assert_eq!(SLOGAN_PARTS[1].2, ORANGE);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_planes_are_ordered() {
    assert!(CAMERA_NEAR > 0.0);
    assert!(CAMERA_FAR > CAMERA_NEAR);
    assert!(CAMERA_FOV_DEG > 0.0 && CAMERA_FOV_DEG < 180.0);
    assert!(IMAGE_ALPHA_TEST > 0.0 && IMAGE_ALPHA_TEST < 1.0);
    assert!(TEXT_LINE_SCALE >= 1.0);
}
