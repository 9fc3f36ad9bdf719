//! Hero flythrough canvas: labelled panels along the camera path, the
//! closing logo and slogan, and a particle cloud that travels with the camera.

use crate::constants::{
    CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, HERO_IMAGES, HERO_IMAGE_SIZE, HERO_TEXTS, HERO_TEXT_SIZE,
    IMAGE_ALPHA_TEST, LOGO_POSITION, LOGO_SIZE, LOGO_URL, SLOGAN_ORIGIN, SLOGAN_PARTS, SLOGAN_TEXT_SIZE,
    TEXT_FONT_PX, TEXT_LINE_SCALE,
};
use crate::core::constants::{SLOGAN_LEFT_GLOW, SLOGAN_RIGHT_GLOW};
use crate::core::{CameraPath, Flythrough, ParticleField, Spin, TimingConfig, HERO_PARTICLES};
use crate::dom;
use crate::frame::{self, FrameContext};
use crate::render::points::{self, PointsResources, PointsUniforms};
use crate::render::sprites::{self, Sprite, SpriteLook, SpritePipeline};
use crate::render::{self, GpuState};
use crate::texture::{self, RgbaImage};
use glam::{Mat4, Vec2, Vec3};
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Where a sprite's opacity comes from each frame.
#[derive(Clone, Copy, Debug)]
enum Slot {
    Text(usize),
    Image(usize),
    Logo,
    Slogan(usize),
}

struct HeroSprite {
    slot: Slot,
    position: Vec3,
    color: [f32; 3],
    size: Vec2,
    // filled in once the texture is on the GPU
    sprite: Option<Sprite>,
}

/// Decoded images waiting for upload, keyed by sprite index.
type PendingImages = Rc<RefCell<Vec<(usize, RgbaImage)>>>;

struct HeroFrame {
    gpu: GpuState<'static>,
    canvas: web::HtmlCanvasElement,
    flythrough: Rc<RefCell<Flythrough>>,
    particles: PointsResources,
    sprite_pipeline: SpritePipeline,
    sprites: Vec<HeroSprite>,
    pending: PendingImages,
    first_frame_ms: Option<f64>,
}

impl HeroFrame {
    fn upload_pending(&mut self) {
        let ready: Vec<(usize, RgbaImage)> = self.pending.borrow_mut().drain(..).collect();
        for (index, image) in ready {
            let Some(entry) = self.sprites.get_mut(index) else {
                continue;
            };
            let view = texture::upload_rgba(self.gpu.device(), self.gpu.queue(), "hero_image", &image);
            entry.sprite = Some(self.sprite_pipeline.create_sprite(self.gpu.device(), &view, entry.size));
        }
    }
}

impl FrameContext for HeroFrame {
    fn frame(&mut self, now_ms: f64) {
        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        self.upload_pending();
        let start = *self.first_frame_ms.get_or_insert(now_ms);
        let elapsed = ((now_ms - start) / 1000.0) as f32;

        let fly = self.flythrough.borrow_mut().frame(now_ms, elapsed);
        let flythrough = self.flythrough.borrow();
        let view = flythrough.rig().view_matrix();
        let proj = render::perspective(CAMERA_FOV_DEG, self.gpu.aspect(), CAMERA_NEAR, CAMERA_FAR);
        let view_proj = proj * view;

        let spin = Spin::hero_at(elapsed);
        let cloud = Mat4::from_translation(fly.camera_position)
            * Mat4::from_rotation_x(spin.x)
            * Mat4::from_rotation_y(spin.y);
        self.particles
            .write(self.gpu.queue(), &PointsUniforms::new(view, proj, cloud, &HERO_PARTICLES));

        let mut visible: Vec<(f32, usize)> = Vec::with_capacity(self.sprites.len());
        for (i, entry) in self.sprites.iter().enumerate() {
            let Some(sprite) = &entry.sprite else {
                continue;
            };
            let (opacity, glow, alpha_test) = match entry.slot {
                Slot::Text(p) => (
                    flythrough.points().get(p).map_or(0.0, |pt| pt.opacity()),
                    fly.text_glow,
                    0.0,
                ),
                Slot::Image(p) => (
                    flythrough.points().get(p).map_or(0.0, |pt| pt.opacity()),
                    1.0,
                    IMAGE_ALPHA_TEST,
                ),
                Slot::Logo if fly.terminal.visible => (1.0, 1.0, IMAGE_ALPHA_TEST),
                Slot::Slogan(s) if fly.terminal.visible => (
                    flythrough.slogan().get(s).map_or(0.0, |pt| pt.opacity()),
                    flythrough.slogan_glow(s, elapsed),
                    0.0,
                ),
                Slot::Logo | Slot::Slogan(_) => continue,
            };
            if opacity <= f32::EPSILON {
                continue;
            }
            sprite.write(
                self.gpu.queue(),
                view_proj,
                &SpriteLook {
                    position: entry.position,
                    color: entry.color,
                    opacity,
                    glow,
                    alpha_test,
                },
            );
            visible.push((entry.position.distance_squared(fly.camera_position), i));
        }
        drop(flythrough);
        // back to front
        visible.sort_by(|a, b| b.0.total_cmp(&a.0));

        let particles = &self.particles;
        let pipeline = &self.sprite_pipeline;
        let sprites = &self.sprites;
        let result = self.gpu.render(|pass| {
            particles.draw(pass);
            for &(_, i) in &visible {
                if let Some(sprite) = sprites.get(i).and_then(|s| s.sprite.as_ref()) {
                    sprite.draw(pass, pipeline);
                }
            }
        });
        if let Err(e) = result {
            log::debug!("[hero] frame skipped: {:?}", e);
        }
    }
}

fn text_sprite(
    gpu: &GpuState<'_>,
    pipeline: &SpritePipeline,
    text: &str,
    em: f32,
) -> anyhow::Result<(Sprite, Vec2)> {
    let image = texture::rasterize_text(text, TEXT_FONT_PX)?;
    let height = em * TEXT_LINE_SCALE;
    let size = Vec2::new(height * image.aspect(), height);
    let view = texture::upload_rgba(gpu.device(), gpu.queue(), text, &image);
    Ok((pipeline.create_sprite(gpu.device(), &view, size), size))
}

fn load_image(url: &'static str, index: usize, pending: PendingImages) {
    spawn_local(async move {
        match texture::fetch_rgba(url).await {
            Ok(image) => pending.borrow_mut().push((index, image)),
            Err(e) => log::error!("[hero] texture {} failed: {:?}", url, e),
        }
    });
}

/// Build the hero scene on `canvas` and start its frame loop.
pub async fn mount(canvas: &web::HtmlCanvasElement) -> anyhow::Result<()> {
    dom::sync_canvas_backing_size(canvas);
    let Some(gpu) = frame::init_gpu(canvas).await else {
        return Ok(());
    };
    let mut flythrough = Flythrough::new(TimingConfig::default(), CameraPath::hero()?)?;
    let sprite_pipeline = sprites::create_sprite_pipeline(gpu.device(), gpu.format());
    let pending: PendingImages = Rc::new(RefCell::new(Vec::new()));
    let mut sprites: Vec<HeroSprite> = Vec::new();

    for label in &HERO_TEXTS {
        let position = Vec3::from_array(label.position);
        let slot = Slot::Text(flythrough.add_text(position));
        let (sprite, size) = match text_sprite(&gpu, &sprite_pipeline, label.text, HERO_TEXT_SIZE) {
            Ok((sprite, size)) => (Some(sprite), size),
            Err(e) => {
                log::error!("[hero] could not rasterize {}: {:?}", label.text, e);
                (None, Vec2::ZERO)
            }
        };
        sprites.push(HeroSprite {
            slot,
            position,
            color: label.color,
            size,
            sprite,
        });
    }

    for (section, (url, pos)) in HERO_IMAGES.iter().enumerate() {
        let position = Vec3::from_array(*pos);
        let slot = Slot::Image(flythrough.add_image(position, section));
        load_image(*url, sprites.len(), pending.clone());
        sprites.push(HeroSprite {
            slot,
            position,
            color: [1.0; 3],
            size: Vec2::from_array(HERO_IMAGE_SIZE),
            sprite: None,
        });
    }

    load_image(LOGO_URL, sprites.len(), pending.clone());
    sprites.push(HeroSprite {
        slot: Slot::Logo,
        position: Vec3::from_array(LOGO_POSITION),
        color: [1.0; 3],
        size: Vec2::from_array(LOGO_SIZE),
        sprite: None,
    });

    let origin = Vec3::from_array(SLOGAN_ORIGIN);
    for ((text, x, color), base_glow) in SLOGAN_PARTS.iter().zip([SLOGAN_LEFT_GLOW, SLOGAN_RIGHT_GLOW]) {
        let slot = Slot::Slogan(flythrough.add_slogan_part(base_glow));
        let (sprite, size) = match text_sprite(&gpu, &sprite_pipeline, text, SLOGAN_TEXT_SIZE) {
            Ok((sprite, size)) => (Some(sprite), size),
            Err(e) => {
                log::error!("[hero] could not rasterize {}: {:?}", text, e);
                (None, Vec2::ZERO)
            }
        };
        sprites.push(HeroSprite {
            slot,
            position: origin + Vec3::new(*x, 0.0, 0.0),
            color: *color,
            size,
            sprite,
        });
    }

    let mut rng = rand::rngs::StdRng::from_entropy();
    let field = ParticleField::scatter(HERO_PARTICLES, &mut rng);
    let particles = points::create_points_resources(gpu.device(), gpu.format(), &field.positions);

    flythrough.start(frame::now_ms());
    log::info!(
        "[hero] {} discovery points, {} particles",
        flythrough.points().len(),
        field.positions.len()
    );
    let flythrough = Rc::new(RefCell::new(flythrough));

    let observed = flythrough.clone();
    let element: &web::Element = canvas.as_ref();
    dom::observe_intersection(std::slice::from_ref(element), 0.1, move |_el, visible| {
        observed.borrow_mut().set_visible(visible, frame::now_ms());
    })?;

    let frame_ctx = Rc::new(RefCell::new(HeroFrame {
        gpu,
        canvas: canvas.clone(),
        flythrough,
        particles,
        sprite_pipeline,
        sprites,
        pending,
        first_frame_ms: None,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
