// Page wiring and scene content for the web frontend. Tuning that the core
// logic depends on lives in `studio_core::constants`.

// ---------------- DOM ids ----------------
pub const HERO_CANVAS_ID: &str = "hero-canvas";
pub const AMBIENT_CANVAS_IDS: [&str; 2] = ["footer-canvas", "cta-canvas"];
pub const TYPING_TEXT_ID: &str = "typing-text";
pub const FEATURE_CARD_SELECTOR: &str = ".feature-card";
pub const FEATURE_VISIBLE_CLASS: &str = "is-visible";

pub const CTA_BUTTON_ID: &str = "main-cta-button";
pub const CONTACT_MODAL_ID: &str = "contactModal";
pub const CONTACT_FORM_ID: &str = "contactForm";
pub const CLOSE_MODAL_ID: &str = "closeModalBtn";
pub const SUCCESS_NOTIFICATION_ID: &str = "successNotification";
pub const MODAL_VISIBLE_CLASS: &str = "visible";
pub const NOTIFICATION_SHOW_CLASS: &str = "show";

pub const SHOWCASE_VIEWPORT_ID: &str = "showcaseViewport";
pub const LOADING_MESSAGE_ID: &str = "loadingMessage";
pub const WIREFRAME_TOGGLE_ID: &str = "wireframeToggle";
pub const ANIMATION_TOGGLE_ID: &str = "animationToggle";
pub const AR_TOGGLE_ID: &str = "arToggle";
pub const DROPDOWN_SELECTED_ID: &str = "dropdownSelected";
pub const DROPDOWN_ITEMS_ID: &str = "dropdownItems";
pub const ANIMATION_TOGGLE_ROW_ID: &str = "animationToggleRow";
pub const MODEL_SCALE_LABEL_ID: &str = "modelScaleLabel";
pub const ROTATION_SPEED_LABEL_ID: &str = "rotationSpeedLabel";
pub const AMBIENT_LIGHT_INPUT_ID: &str = "ambientLight";
pub const ROTATION_SPEED_INPUT_ID: &str = "rotationSpeed";
pub const BACKGROUND_COLOR_INPUT_ID: &str = "backgroundColor";
pub const MODEL_SCALE_INPUT_ID: &str = "modelScale";
pub const ALL_MODELS_LABEL: &str = "All Models";

// ---------------- Camera ----------------
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// ---------------- Palette ----------------
pub const ORANGE: [f32; 3] = rgb(0xf46c27);
pub const WHITE: [f32; 3] = rgb(0xffffff);
pub const SLOGAN_LIGHT: [f32; 3] = rgb(0xf0f0f0);

pub const fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

// ---------------- Hero content ----------------
pub struct HeroText {
    pub text: &'static str,
    pub position: [f32; 3],
    pub color: [f32; 3],
}

pub const HERO_TEXTS: [HeroText; 4] = [
    HeroText { text: "SCIENCE", position: [25.0, 0.0, -25.0], color: ORANGE },
    HeroText { text: "TECHNOLOGY", position: [-25.0, 0.0, -105.0], color: WHITE },
    HeroText { text: "ENGINEERING", position: [25.0, 0.0, -185.0], color: ORANGE },
    HeroText { text: "ART", position: [-25.0, 0.0, -265.0], color: WHITE },
];
pub const HERO_TEXT_SIZE: f32 = 5.0; // glyph em height in world units

pub const HERO_IMAGES: [(&str, [f32; 3]); 4] = [
    ("assets/dna1.png", [0.0, 0.0, -30.0]),
    ("assets/chip1.png", [0.0, 0.0, -110.0]),
    ("assets/gear1.png", [0.0, 0.0, -190.0]),
    ("assets/geometry1.png", [0.0, 0.0, -270.0]),
];
pub const HERO_IMAGE_SIZE: [f32; 2] = [10.0, 10.0];
pub const IMAGE_ALPHA_TEST: f32 = 0.1;

pub const LOGO_URL: &str = "assets/Logo.png";
pub const LOGO_POSITION: [f32; 3] = [0.0, 8.0, -380.0];
pub const LOGO_SIZE: [f32; 2] = [120.0, 60.0];

pub const SLOGAN_ORIGIN: [f32; 3] = [0.0, -20.0, -380.0];
pub const SLOGAN_TEXT_SIZE: f32 = 4.5;
// (text, x offset within the slogan group, colour)
pub const SLOGAN_PARTS: [(&str, f32, [f32; 3]); 2] = [
    ("Learning", -17.0, SLOGAN_LIGHT),
    ("Re-imagined", 17.0, ORANGE),
];

// ---------------- Text rasterization ----------------
pub const TEXT_FONT_PX: u32 = 128;
pub const TEXT_FONT_FAMILY: &str = "bold Helvetica, Arial, sans-serif";
pub const TEXT_LINE_SCALE: f32 = 1.25; // canvas height per em
