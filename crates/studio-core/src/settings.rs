use crate::constants::{
    DEFAULT_AMBIENT_INTENSITY, DEFAULT_DIRECTIONAL_INTENSITY, DEFAULT_ROTATION_SPEED,
};
use crate::error::ColorParseError;

/// User-tunable viewer parameters driven by the showcase controls.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerSettings {
    pub wireframe: bool,
    pub animation_enabled: bool,
    pub rotation_speed: f32,
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    pub background: [f32; 3],
    /// Absolute scale override for the focused model; `None` keeps the
    /// normalized size.
    pub model_scale: Option<f32>,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            wireframe: false,
            animation_enabled: true,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            ambient_intensity: DEFAULT_AMBIENT_INTENSITY,
            directional_intensity: DEFAULT_DIRECTIONAL_INTENSITY,
            background: [0.0, 0.0, 0.0],
            model_scale: None,
        }
    }
}

/// Parse a `#rrggbb` colour input value into linear-ish 0..1 floats.
pub fn parse_hex_color(value: &str) -> Result<[f32; 3], ColorParseError> {
    let malformed = || ColorParseError::Malformed(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(malformed)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(malformed());
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| malformed())
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}
