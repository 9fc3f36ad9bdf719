use crate::constants::*;
use rand::Rng;

/// Shape of a particle cloud: how many points, how wide a cube they fill,
/// and how they are drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSpec {
    pub count: usize,
    pub spread: f32,
    pub size: f32,
    pub opacity: f32,
}

pub const HERO_PARTICLES: ParticleSpec = ParticleSpec {
    count: HERO_PARTICLE_COUNT,
    spread: HERO_PARTICLE_SPREAD,
    size: HERO_PARTICLE_SIZE,
    opacity: HERO_PARTICLE_OPACITY,
};

pub const AMBIENT_PARTICLES: ParticleSpec = ParticleSpec {
    count: AMBIENT_PARTICLE_COUNT,
    spread: AMBIENT_PARTICLE_SPREAD,
    size: AMBIENT_PARTICLE_SIZE,
    opacity: AMBIENT_PARTICLE_OPACITY,
};

#[derive(Clone, Debug)]
pub struct ParticleField {
    pub spec: ParticleSpec,
    pub positions: Vec<[f32; 3]>,
}

impl ParticleField {
    /// Scatter `spec.count` points uniformly inside a cube of side
    /// `spec.spread` centred on the origin.
    pub fn scatter<R: Rng + ?Sized>(spec: ParticleSpec, rng: &mut R) -> Self {
        let half = 0.5;
        let positions = (0..spec.count)
            .map(|_| {
                [
                    (rng.gen::<f32>() - half) * spec.spread,
                    (rng.gen::<f32>() - half) * spec.spread,
                    (rng.gen::<f32>() - half) * spec.spread,
                ]
            })
            .collect();
        Self { spec, positions }
    }
}

/// Accumulated Euler rotation of a particle cloud.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spin {
    pub x: f32,
    pub y: f32,
}

impl Spin {
    /// Fixed per-frame drift used by the footer and call-to-action canvases.
    pub fn advance_ambient(&mut self) {
        self.x += AMBIENT_SPIN_PER_FRAME[0];
        self.y += AMBIENT_SPIN_PER_FRAME[1];
    }

    /// Hero cloud rotation is a function of elapsed time.
    pub fn hero_at(elapsed_sec: f32) -> Self {
        Self {
            x: 0.0,
            y: elapsed_sec * HERO_PARTICLE_SPIN,
        }
    }
}
