use glam::Vec2;
use web_sys as web;

/// Pointer drag tracked in canvas pixels; each move yields the delta since
/// the previous event.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub pointer_id: i32,
    pub last: Vec2,
}

impl DragState {
    pub fn begin(&mut self, pointer_id: i32, pos: Vec2) {
        self.active = true;
        self.pointer_id = pointer_id;
        self.last = pos;
    }

    /// Delta for a move of `pointer_id`, or `None` when not dragging with it.
    pub fn update(&mut self, pointer_id: i32, pos: Vec2) -> Option<Vec2> {
        if !self.active || pointer_id != self.pointer_id {
            return None;
        }
        let delta = pos - self.last;
        self.last = pos;
        Some(delta)
    }

    pub fn end(&mut self, pointer_id: i32) -> bool {
        if self.active && pointer_id == self.pointer_id {
            self.active = false;
            return true;
        }
        false
    }
}

/// Pixel-mode wheel deltas are used as is; line and page modes are scaled
/// to pixels so the zoom direction is consistent.
#[inline]
pub fn wheel_pixels(delta_y: f64, delta_mode: u32) -> f32 {
    const DOM_DELTA_LINE: u32 = 1;
    const DOM_DELTA_PAGE: u32 = 2;
    let scale = match delta_mode {
        DOM_DELTA_LINE => 16.0,
        DOM_DELTA_PAGE => 800.0,
        _ => 1.0,
    };
    (delta_y * scale) as f32
}

/// Parse a range/number input value, ignoring anything non-finite.
pub fn parse_slider(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

// ---------------- Pointer helpers ----------------
#[inline]
pub fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    canvas_px_from_css(
        x_css,
        y_css,
        [rect.width() as f32, rect.height() as f32],
        [canvas.width() as f32, canvas.height() as f32],
    )
}

/// Map CSS pixels within an element of `css_size` onto a backing store of
/// `backing_size`.
#[inline]
pub fn canvas_px_from_css(x_css: f32, y_css: f32, css_size: [f32; 2], backing_size: [f32; 2]) -> Vec2 {
    if css_size[0] <= 0.0 || css_size[1] <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        x_css / css_size[0] * backing_size[0],
        y_css / css_size[1] * backing_size[1],
    )
}
