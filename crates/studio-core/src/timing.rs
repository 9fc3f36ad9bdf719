//! Flythrough timing table.

use crate::constants::SECTION_DELAY_SCALE;
use crate::error::ConfigError;

/// Durations, distances and fade coefficients for the hero flythrough.
///
/// Read-only once the flythrough is built. Distances are world units,
/// durations milliseconds, fade speeds the per-frame lerp factor.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    pub animation_duration_ms: f64,
    pub image_delay_ms: f64,
    pub image_fade_in_duration_ms: f64,
    pub text_visibility_distance: f32,
    pub image_visibility_distance: f32,
    pub text_fade_speed: f32,
    pub image_fade_speed: f32,
    pub image_delay_multiplier: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: 15_000.0,
            image_delay_ms: 1_000.0,
            image_fade_in_duration_ms: 2_000.0,
            text_visibility_distance: 35.0,
            image_visibility_distance: 25.0,
            text_fade_speed: 0.1,
            image_fade_speed: 0.05,
            image_delay_multiplier: 1.2,
        }
    }
}

impl TimingConfig {
    /// Delay before images of `section_index` may start fading, measured
    /// from the start of the current flythrough cycle.
    pub fn image_delay_for_section(&self, section_index: usize) -> f64 {
        self.image_delay_ms
            * (1.0 + section_index as f64 * self.image_delay_multiplier * SECTION_DELAY_SCALE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("animation_duration_ms", self.animation_duration_ms)?;
        positive("image_fade_in_duration_ms", self.image_fade_in_duration_ms)?;
        non_negative("image_delay_ms", self.image_delay_ms)?;
        non_negative("image_delay_multiplier", self.image_delay_multiplier)?;
        positive("text_visibility_distance", self.text_visibility_distance as f64)?;
        positive("image_visibility_distance", self.image_visibility_distance as f64)?;
        unit("text_fade_speed", self.text_fade_speed)?;
        unit("image_fade_speed", self.image_fade_speed)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange {
            field,
            value: value as f64,
        })
    }
}
