// Shared tuning constants for the hero flythrough, the showcase viewer and
// the page chrome. Everything the web frontend needs to agree on with the
// core logic lives here.

// ---------------- Flythrough ----------------
pub const START_PROGRESS: f32 = 0.05;
pub const RESTART_PAUSE_MS: f64 = 7000.0; // idle time at the end of a cycle
pub const LOOK_AHEAD: f32 = 0.01; // progress offset sampled for the look-at target
pub const CAMERA_SLERP_FACTOR: f32 = 0.08; // orientation blend per frame
pub const TEXT_FADE_SPAN: f32 = 30.0; // distance over which text goes 1 -> 0
pub const SECTION_DELAY_SCALE: f64 = 0.1;
pub const TERMINAL_THRESHOLD: f32 = 0.95;
pub const TERMINAL_RAMP: f32 = 0.05;

// Emissive pulse: base + amplitude * sin(t * rate)
pub const GLOW_PULSE_RATE: f32 = 2.5;
pub const TEXT_GLOW_BASE: f32 = 1.1;
pub const TEXT_GLOW_AMPLITUDE: f32 = 0.4;
pub const SLOGAN_GLOW_BASE: f32 = 1.0;
pub const SLOGAN_GLOW_AMPLITUDE: f32 = 0.3;
pub const SLOGAN_LEFT_GLOW: f32 = 1.0;
pub const SLOGAN_RIGHT_GLOW: f32 = 1.2;

pub const HERO_PATH: [[f32; 3]; 6] = [
    [0.0, 0.0, 50.0],
    [10.0, 2.0, 0.0],
    [-10.0, -2.0, -80.0],
    [10.0, 2.0, -160.0],
    [-10.0, -2.0, -240.0],
    [0.0, 0.0, -320.0],
];

// ---------------- Particles ----------------
pub const HERO_PARTICLE_COUNT: usize = 7000;
pub const HERO_PARTICLE_SPREAD: f32 = 400.0;
pub const HERO_PARTICLE_SIZE: f32 = 0.25;
pub const HERO_PARTICLE_OPACITY: f32 = 0.8;
pub const HERO_PARTICLE_SPIN: f32 = 0.02; // radians per second around Y

pub const AMBIENT_PARTICLE_COUNT: usize = 2000;
pub const AMBIENT_PARTICLE_SPREAD: f32 = 20.0;
pub const AMBIENT_PARTICLE_SIZE: f32 = 0.05;
pub const AMBIENT_PARTICLE_OPACITY: f32 = 0.7;
pub const AMBIENT_SPIN_PER_FRAME: [f32; 2] = [0.0002, 0.0005]; // (x, y)
pub const AMBIENT_CAMERA_Z: f32 = 10.0;

// ---------------- Showcase ----------------
pub const RADIAL_RADIUS: f32 = 12.0;
pub const NORMALIZED_SIZE: f32 = 5.0; // largest bounding-box edge after normalization
pub const SINGLE_CAMERA_EYE: [f32; 3] = [0.0, 5.0, 10.0];
pub const ALL_CAMERA_EYE: [f32; 3] = [0.0, 5.0, 25.0];
pub const DEFAULT_ROTATION_SPEED: f32 = 0.005; // radians per frame in "all models" mode
pub const DEFAULT_AMBIENT_INTENSITY: f32 = 2.0;
pub const DEFAULT_DIRECTIONAL_INTENSITY: f32 = 3.0;
pub const DIRECTIONAL_LIGHT_POSITION: [f32; 3] = [5.0, 10.0, 7.5];

// Orbit controls
pub const ORBIT_DAMPING: f32 = 0.05;
pub const ORBIT_ZOOM_STEP: f32 = 0.95;
pub const ORBIT_MIN_RADIUS: f32 = 0.5;
pub const ORBIT_MAX_RADIUS: f32 = 500.0;
pub const ORBIT_POLAR_EPSILON: f32 = 1e-3;

// ---------------- Page chrome ----------------
pub const TYPEWRITER_WORDS: [&str; 5] = ["Science", "Technology", "Engineering", "Arts", "Mathematics"];
pub const TYPE_LETTER_MS: u32 = 200;
pub const DELETE_LETTER_MS: u32 = 100;
pub const WORD_HOLD_MS: u32 = 2000;
pub const NEXT_WORD_MS: u32 = 500;

pub const NOTIFICATION_DURATION_MS: u32 = 5000;
pub const FORM_FAILURE_MESSAGE: &str =
    "Oops! There was a problem submitting your form. Please try again.";
