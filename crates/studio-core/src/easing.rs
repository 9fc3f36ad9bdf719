use std::f32::consts::PI;

/// Sinusoidal ease-in/ease-out over `t` in [0, 1].
#[inline]
pub fn sinusoidal_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    0.5 * (1.0 - (PI * t).cos())
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}
