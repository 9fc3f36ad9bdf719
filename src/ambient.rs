//! Slowly drifting particle backdrops behind the footer and call-to-action.

use crate::constants::{AMBIENT_CANVAS_IDS, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};
use crate::core::constants::AMBIENT_CAMERA_Z;
use crate::core::{ParticleField, Spin, AMBIENT_PARTICLES};
use crate::dom;
use crate::frame::{self, FrameContext};
use crate::render::points::{self, PointsResources, PointsUniforms};
use crate::render::{self, GpuState};
use glam::{Mat4, Vec3};
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

struct AmbientFrame {
    gpu: GpuState<'static>,
    canvas: web::HtmlCanvasElement,
    particles: PointsResources,
    spin: Spin,
    view: Mat4,
}

impl FrameContext for AmbientFrame {
    fn frame(&mut self, _now_ms: f64) {
        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        self.spin.advance_ambient();
        let model = Mat4::from_rotation_x(self.spin.x) * Mat4::from_rotation_y(self.spin.y);
        let proj = render::perspective(CAMERA_FOV_DEG, self.gpu.aspect(), CAMERA_NEAR, CAMERA_FAR);
        self.particles.write(
            self.gpu.queue(),
            &PointsUniforms::new(self.view, proj, model, &AMBIENT_PARTICLES),
        );
        let particles = &self.particles;
        if let Err(e) = self.gpu.render(|pass| particles.draw(pass)) {
            log::debug!("[ambient] frame skipped: {:?}", e);
        }
    }
}

async fn mount_canvas(canvas: web::HtmlCanvasElement) -> anyhow::Result<()> {
    dom::sync_canvas_to_parent(&canvas);
    if let Some(parent) = canvas.parent_element() {
        let resize_target = canvas.clone();
        dom::observe_resize(&parent, move || dom::sync_canvas_to_parent(&resize_target))?;
    }
    let Some(gpu) = frame::init_gpu(&canvas).await else {
        return Ok(());
    };
    let mut rng = rand::rngs::StdRng::from_entropy();
    let field = ParticleField::scatter(AMBIENT_PARTICLES, &mut rng);
    let particles = points::create_points_resources(gpu.device(), gpu.format(), &field.positions);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, AMBIENT_CAMERA_Z), Vec3::ZERO, Vec3::Y);

    frame::start_loop(Rc::new(RefCell::new(AmbientFrame {
        gpu,
        canvas,
        particles,
        spin: Spin::default(),
        view,
    })));
    Ok(())
}

/// Start a backdrop on every ambient canvas present on the page.
pub async fn mount_all(document: &web::Document) {
    for id in AMBIENT_CANVAS_IDS {
        let Some(canvas) = dom::element_by_id::<web::HtmlCanvasElement>(document, id) else {
            continue;
        };
        if let Err(e) = mount_canvas(canvas).await {
            log::error!("[ambient] {} init error: {:?}", id, e);
        }
    }
}
