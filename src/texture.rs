//! Image and text textures.
//!
//! PNGs are fetched over HTTP, decoded by the browser with
//! `createImageBitmap` and read back through a 2D canvas. Labels are
//! rasterized with canvas `fillText` in white and tinted on the GPU.

use crate::constants::{TEXT_FONT_FAMILY, TEXT_LINE_SCALE};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Decoded straight-alpha RGBA8 pixels.
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaImage {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

pub async fn fetch_rgba(url: &str) -> anyhow::Result<RgbaImage> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("fetch {url}: {e}"))?;
    if !resp.ok() {
        anyhow::bail!("fetch {url}: HTTP {}", resp.status());
    }
    let bytes = resp
        .binary()
        .await
        .map_err(|e| anyhow::anyhow!("read {url}: {e}"))?;

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes.as_slice()));
    let blob = web::Blob::new_with_u8_array_sequence(&parts).map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let promise = window
        .create_image_bitmap_with_blob(&blob)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let bitmap: web::ImageBitmap = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("decode {url}: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let (width, height) = (bitmap.width(), bitmap.height());
    let ctx = scratch_context(width, height)?;
    ctx.draw_image_with_image_bitmap(&bitmap, 0.0, 0.0)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    read_pixels(&ctx, width, height)
}

/// Render `text` in white on a transparent canvas `font_px` high.
pub fn rasterize_text(text: &str, font_px: u32) -> anyhow::Result<RgbaImage> {
    let font = format!("{font_px}px {TEXT_FONT_FAMILY}");
    let measure = scratch_context(1, 1)?;
    measure.set_font(&font);
    let text_width = measure
        .measure_text(text)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .width();
    let pad = font_px as f64 * 0.1;
    let width = (text_width + pad * 2.0).ceil().max(1.0) as u32;
    let height = (font_px as f32 * TEXT_LINE_SCALE).ceil() as u32;

    let ctx = scratch_context(width, height)?;
    ctx.set_font(&font);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_text_baseline("middle");
    ctx.set_text_align("center");
    ctx.fill_text(text, width as f64 / 2.0, height as f64 / 2.0)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    read_pixels(&ctx, width, height)
}

fn scratch_context(width: u32, height: u32) -> anyhow::Result<web::CanvasRenderingContext2d> {
    let document = crate::dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas.set_width(width.max(1));
    canvas.set_height(height.max(1));
    canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

fn read_pixels(ctx: &web::CanvasRenderingContext2d, width: u32, height: u32) -> anyhow::Result<RgbaImage> {
    let image = ctx
        .get_image_data(0.0, 0.0, width.max(1) as f64, height.max(1) as f64)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    Ok(RgbaImage {
        width: width.max(1),
        height: height.max(1),
        data: image.data().0,
    })
}

pub fn upload_rgba(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, image: &RgbaImage) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
