//! Per-element visibility fades for the flythrough.
//!
//! Text fades purely on camera distance. Images run a small timer state
//! machine (`Pending -> Eligible -> Fading -> Steady`) so the delay gating
//! and the one-shot ramp are explicit: once an image has begun fading it
//! does not go back to `Pending` until the next flythrough cycle.

use crate::constants::{
    GLOW_PULSE_RATE, SLOGAN_GLOW_AMPLITUDE, SLOGAN_GLOW_BASE, TERMINAL_RAMP, TERMINAL_THRESHOLD,
    TEXT_FADE_SPAN, TEXT_GLOW_AMPLITUDE, TEXT_GLOW_BASE,
};
use crate::easing::{clamp01, lerp};
use crate::timing::TimingConfig;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImagePhase {
    /// Camera has not yet come within the image visibility distance.
    Pending,
    /// In range at least once since `since_ms`, still waiting on the delay.
    Eligible { since_ms: f64 },
    /// Ramping 0 -> 1 since `start_ms`.
    Fading { start_ms: f64 },
    /// Ramp finished.
    Steady,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiscoveryPoint {
    Text {
        position: Vec3,
        opacity: f32,
    },
    Image {
        position: Vec3,
        opacity: f32,
        section_index: usize,
        delay_ms: f64,
        phase: ImagePhase,
    },
    SloganPart {
        opacity: f32,
        base_glow: f32,
    },
}

impl DiscoveryPoint {
    pub fn text(position: Vec3) -> Self {
        Self::Text {
            position,
            opacity: 0.0,
        }
    }

    pub fn image(position: Vec3, section_index: usize, config: &TimingConfig) -> Self {
        Self::Image {
            position,
            opacity: 0.0,
            section_index,
            delay_ms: config.image_delay_for_section(section_index),
            phase: ImagePhase::Pending,
        }
    }

    pub fn slogan_part(base_glow: f32) -> Self {
        Self::SloganPart {
            opacity: 0.0,
            base_glow,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Self::Text { opacity, .. }
            | Self::Image { opacity, .. }
            | Self::SloganPart { opacity, .. } => *opacity,
        }
    }

    pub fn position(&self) -> Option<Vec3> {
        match self {
            Self::Text { position, .. } | Self::Image { position, .. } => Some(*position),
            Self::SloganPart { .. } => None,
        }
    }

    pub fn image_phase(&self) -> Option<ImagePhase> {
        match self {
            Self::Image { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Advance this element's fade by one frame.
    ///
    /// `cycle_start_ms` is the wall-clock start of the current flythrough
    /// cycle; image delays are measured from it, not from eligibility.
    pub fn step(&mut self, camera: Vec3, now_ms: f64, cycle_start_ms: f64, config: &TimingConfig) {
        match self {
            Self::Text { position, opacity } => {
                let distance = camera.distance(*position);
                let target =
                    clamp01(1.0 - (distance - config.text_visibility_distance) / TEXT_FADE_SPAN);
                *opacity = clamp01(lerp(*opacity, target, config.text_fade_speed));
            }
            Self::Image {
                position,
                opacity,
                delay_ms,
                phase,
                ..
            } => {
                let in_range = camera.distance(*position) < config.image_visibility_distance;
                *phase = advance_image_phase(
                    *phase,
                    in_range,
                    now_ms,
                    cycle_start_ms,
                    *delay_ms,
                    config.image_fade_in_duration_ms,
                );
                let target = image_target(*phase, in_range, now_ms, config.image_fade_in_duration_ms);
                *opacity = clamp01(lerp(*opacity, target, config.image_fade_speed));
            }
            Self::SloganPart { .. } => {}
        }
    }

    /// Forget image fade progress at the start of a new cycle.
    pub fn reset_for_cycle(&mut self) {
        if let Self::Image { opacity, phase, .. } = self {
            *phase = ImagePhase::Pending;
            *opacity = 0.0;
        }
    }

    pub(crate) fn set_opacity(&mut self, value: f32) {
        match self {
            Self::Text { opacity, .. }
            | Self::Image { opacity, .. }
            | Self::SloganPart { opacity, .. } => *opacity = clamp01(value),
        }
    }
}

fn advance_image_phase(
    phase: ImagePhase,
    in_range: bool,
    now_ms: f64,
    cycle_start_ms: f64,
    delay_ms: f64,
    fade_in_ms: f64,
) -> ImagePhase {
    let mut phase = phase;
    if phase == ImagePhase::Pending && in_range {
        phase = ImagePhase::Eligible { since_ms: now_ms };
    }
    if let ImagePhase::Eligible { .. } = phase {
        if in_range && now_ms - cycle_start_ms >= delay_ms {
            phase = ImagePhase::Fading { start_ms: now_ms };
        }
    }
    if let ImagePhase::Fading { start_ms } = phase {
        if now_ms - start_ms >= fade_in_ms {
            phase = ImagePhase::Steady;
        }
    }
    phase
}

fn image_target(phase: ImagePhase, in_range: bool, now_ms: f64, fade_in_ms: f64) -> f32 {
    if !in_range {
        return 0.0;
    }
    match phase {
        ImagePhase::Fading { start_ms } => (((now_ms - start_ms) / fade_in_ms) as f32).min(1.0),
        ImagePhase::Steady => 1.0,
        ImagePhase::Pending | ImagePhase::Eligible { .. } => 0.0,
    }
}

/// Two-state switch for the closing logo + slogan group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalReveal {
    pub visible: bool,
    pub opacity: f32,
}

impl TerminalReveal {
    pub fn at(progress: f32) -> Self {
        if progress > TERMINAL_THRESHOLD {
            Self {
                visible: true,
                opacity: ((progress - TERMINAL_THRESHOLD) / TERMINAL_RAMP).min(1.0),
            }
        } else {
            Self {
                visible: false,
                opacity: 0.0,
            }
        }
    }
}

/// Emissive multiplier shared by the path text materials.
#[inline]
pub fn text_glow(elapsed_sec: f32) -> f32 {
    (elapsed_sec * GLOW_PULSE_RATE).sin() * TEXT_GLOW_AMPLITUDE + TEXT_GLOW_BASE
}

#[inline]
pub fn slogan_glow(base_glow: f32, elapsed_sec: f32) -> f32 {
    base_glow * ((elapsed_sec * GLOW_PULSE_RATE).sin() * SLOGAN_GLOW_AMPLITUDE + SLOGAN_GLOW_BASE)
}
