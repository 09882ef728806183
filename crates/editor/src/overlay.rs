//! Field outlines drawn over a rendered page

use crate::{Result, HEIGHT_HANDLE, WIDTH_HANDLE};
use form::{Field, Layout};
use image::{ImageFormat, ImageReader, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use std::io::Cursor;

const OUTLINE: Rgba<u8> = Rgba([220, 40, 40, 255]);
const HANDLE: Rgba<u8> = Rgba([190, 190, 190, 255]);

/// Draw every field of `layout` over a page image
///
/// `page_image` is a PNG or JPEG of the page rendered at the canvas scale,
/// so field coordinates are image pixels. Each field gets an outline and
/// its two resize strips. Returns PNG bytes.
pub fn render_overlay(page_image: &[u8], layout: &Layout) -> Result<Vec<u8>> {
    let mut canvas = ImageReader::new(Cursor::new(page_image))
        .with_guessed_format()?
        .decode()?
        .to_rgba8();

    for field in layout.fields() {
        draw_field(&mut canvas, field);
    }

    let mut buffer = Cursor::new(Vec::new());
    canvas.write_to(&mut buffer, ImageFormat::Png)?;
    tracing::debug!(
        width = canvas.width(),
        height = canvas.height(),
        fields = layout.len(),
        "rendered overlay"
    );
    Ok(buffer.into_inner())
}

fn draw_field(canvas: &mut RgbaImage, field: &Field) {
    let Some(outline) = pixel_rect(field.x, field.y, field.width, field.height) else {
        return;
    };

    let handle_width = WIDTH_HANDLE.min(field.width);
    if let Some(strip) = pixel_rect(
        field.x + field.width - handle_width,
        field.y,
        handle_width,
        field.height,
    ) {
        draw_filled_rect_mut(canvas, strip, HANDLE);
    }

    let handle_height = HEIGHT_HANDLE.min(field.height);
    if let Some(strip) = pixel_rect(
        field.x,
        field.y + field.height - handle_height,
        field.width,
        handle_height,
    ) {
        draw_filled_rect_mut(canvas, strip, HANDLE);
    }

    draw_hollow_rect_mut(canvas, outline, OUTLINE);
}

/// Whole-pixel rectangle; `None` when it would be empty
fn pixel_rect(x: f64, y: f64, width: f64, height: f64) -> Option<Rect> {
    let width = width.round() as u32;
    let height = height.round() as u32;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Rect::at(x.round() as i32, y.round() as i32).of_size(width, height))
}
