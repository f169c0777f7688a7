//! Raster export of the current canvas state.
//!
//! A small software rasterizer, not a rendering engine: axis-aligned
//! fills, filter chains on images, workspace fill as the export
//! background. Output bounds are the workspace dimensions; objects
//! outside them are clipped. Text glyphs are left to the UI layer's
//! renderer and do not appear in exports.

use std::io::Cursor;

use egui::{Pos2, Rect};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

use crate::object::{Fill, ImageFilter, ObjectKind, SceneObject};
use crate::scene::Scene;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode export: {0}")]
    Encode(#[from] image::ImageError),
}

/// Render the scene into an RGBA buffer of the workspace dimensions
pub fn render(scene: &Scene) -> RgbaImage {
    let workspace = scene.workspace();
    let mut canvas = RgbaImage::new(workspace.width, workspace.height);
    let bounds = Rect::from_min_size(
        Pos2::ZERO,
        egui::Vec2::new(workspace.width as f32, workspace.height as f32),
    );
    fill_rect(&mut canvas, bounds, &workspace.fill, 1.0);
    for object in scene.objects() {
        draw_object(&mut canvas, object, 1.0);
    }
    canvas
}

/// Export the scene as PNG bytes
pub fn export_png(scene: &Scene) -> Result<Vec<u8>, ExportError> {
    let canvas = render(scene);
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Export the scene as JPEG bytes (alpha flattened)
pub fn export_jpeg(scene: &Scene) -> Result<Vec<u8>, ExportError> {
    let canvas = render(scene);
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
        .write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}

fn draw_object(canvas: &mut RgbaImage, object: &SceneObject, parent_opacity: f32) {
    if !object.visible {
        return;
    }
    let opacity = object.opacity * parent_opacity;
    let rect = object.rect();
    match &object.kind {
        ObjectKind::Rect => fill_rect(canvas, rect, &object.fill, opacity),
        ObjectKind::Circle => fill_shape(canvas, rect, &object.fill, opacity, |u, v| {
            let dx = u - 0.5;
            let dy = v - 0.5;
            dx * dx + dy * dy <= 0.25
        }),
        ObjectKind::Triangle => {
            // Apex top-center, base along the bottom edge
            fill_shape(canvas, rect, &object.fill, opacity, |u, v| {
                u >= 0.5 - v / 2.0 && u <= 0.5 + v / 2.0
            })
        }
        ObjectKind::Polygon { points } | ObjectKind::Path { points } => {
            let local = normalized_points(points);
            fill_shape(canvas, rect, &object.fill, opacity, |u, v| {
                point_in_polygon(u, v, &local)
            })
        }
        ObjectKind::Text(_) => {}
        ObjectKind::Image(props) => {
            if let Some(pixels) = &props.pixels {
                let mut source =
                    match RgbaImage::from_raw(pixels.width, pixels.height, pixels.rgba.to_vec()) {
                        Some(buffer) => buffer,
                        None => return,
                    };
                for filter in &props.filters {
                    source = apply_filter(source, *filter);
                }
                blit(canvas, rect, &source, opacity);
            }
        }
        ObjectKind::Group { children } => {
            for child in children {
                draw_object(canvas, child, opacity);
            }
        }
    }
}

/// Scale polygon points into the unit square so objects can be
/// resized without touching the stored points
fn normalized_points(points: &[Pos2]) -> Vec<Pos2> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min = min.min(*p);
        max = max.max(*p);
    }
    let span_x = (max.x - min.x).max(f32::EPSILON);
    let span_y = (max.y - min.y).max(f32::EPSILON);
    points
        .iter()
        .map(|p| Pos2::new((p.x - min.x) / span_x, (p.y - min.y) / span_y))
        .collect()
}

fn point_in_polygon(u: f32, v: f32, points: &[Pos2]) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let a = points[i];
        let b = points[j];
        if (a.y > v) != (b.y > v) && u < (b.x - a.x) * (v - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn fill_rect(canvas: &mut RgbaImage, rect: Rect, fill: &Fill, opacity: f32) {
    fill_shape(canvas, rect, fill, opacity, |_, _| true)
}

/// Fill the region of `rect` where `inside(u, v)` holds, with `(u, v)`
/// normalized to the rect
fn fill_shape(
    canvas: &mut RgbaImage,
    rect: Rect,
    fill: &Fill,
    opacity: f32,
    inside: impl Fn(f32, f32) -> bool,
) {
    let (x0, y0, x1, y1) = clipped_span(canvas, rect);
    for y in y0..y1 {
        for x in x0..x1 {
            let u = (x as f32 + 0.5 - rect.min.x) / rect.width().max(f32::EPSILON);
            let v = (y as f32 + 0.5 - rect.min.y) / rect.height().max(f32::EPSILON);
            if inside(u, v) {
                let [r, g, b, a] = sample_fill(fill, u, v);
                blend_pixel(canvas, x, y, r, g, b, a as f32 / 255.0 * opacity);
            }
        }
    }
}

fn blit(canvas: &mut RgbaImage, rect: Rect, source: &RgbaImage, opacity: f32) {
    let target_w = rect.width().max(1.0) as u32;
    let target_h = rect.height().max(1.0) as u32;
    let scaled = imageops::resize(source, target_w, target_h, FilterType::Triangle);
    let (x0, y0, x1, y1) = clipped_span(canvas, rect);
    for y in y0..y1 {
        for x in x0..x1 {
            let sx = (x as f32 - rect.min.x) as u32;
            let sy = (y as f32 - rect.min.y) as u32;
            if sx < scaled.width() && sy < scaled.height() {
                let Rgba([r, g, b, a]) = *scaled.get_pixel(sx, sy);
                blend_pixel(canvas, x, y, r, g, b, a as f32 / 255.0 * opacity);
            }
        }
    }
}

/// Pixel span of `rect` clipped to the canvas
fn clipped_span(canvas: &RgbaImage, rect: Rect) -> (u32, u32, u32, u32) {
    let x0 = rect.min.x.max(0.0) as u32;
    let y0 = rect.min.y.max(0.0) as u32;
    let x1 = (rect.max.x.ceil().max(0.0) as u32).min(canvas.width());
    let y1 = (rect.max.y.ceil().max(0.0) as u32).min(canvas.height());
    (x0, y0, x1, y1)
}

fn sample_fill(fill: &Fill, u: f32, v: f32) -> [u8; 4] {
    match fill {
        Fill::Solid { color } => color.to_srgba_unmultiplied(),
        Fill::Linear { start, end, stops } => {
            if stops.is_empty() {
                return [0, 0, 0, 0];
            }
            let axis = *end - *start;
            let len_sq = axis.length_sq().max(f32::EPSILON);
            let t = ((Pos2::new(u, v) - *start).dot(axis) / len_sq).clamp(0.0, 1.0);
            let mut below = &stops[0];
            let mut above = &stops[stops.len() - 1];
            for stop in stops {
                if stop.offset <= t && stop.offset >= below.offset {
                    below = stop;
                }
                if stop.offset >= t && stop.offset <= above.offset {
                    above = stop;
                }
            }
            let span = (above.offset - below.offset).max(f32::EPSILON);
            let k = ((t - below.offset) / span).clamp(0.0, 1.0);
            let a = below.color.to_srgba_unmultiplied();
            let b = above.color.to_srgba_unmultiplied();
            [
                lerp_u8(a[0], b[0], k),
                lerp_u8(a[1], b[1], k),
                lerp_u8(a[2], b[2], k),
                lerp_u8(a[3], b[3], k),
            ]
        }
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}

fn blend_pixel(canvas: &mut RgbaImage, x: u32, y: u32, r: u8, g: u8, b: u8, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let Rgba([dr, dg, db, da]) = *canvas.get_pixel(x, y);
    let over = |src: u8, dst: u8| lerp_u8(dst, src, alpha);
    let out_a = (alpha + da as f32 / 255.0 * (1.0 - alpha)) * 255.0;
    canvas.put_pixel(
        x,
        y,
        Rgba([
            over(r, dr),
            over(g, dg),
            over(b, db),
            out_a.round().clamp(0.0, 255.0) as u8,
        ]),
    );
}

/// Apply one named filter to decoded image pixels. The mappings
/// approximate the canvas filters the sidebar previews.
pub(crate) fn apply_filter(image: RgbaImage, filter: ImageFilter) -> RgbaImage {
    match filter {
        ImageFilter::Grayscale => map_pixels(image, |[r, g, b, a]| {
            let l = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) as u8;
            [l, l, l, a]
        }),
        ImageFilter::Sepia => map_pixels(image, |[r, g, b, a]| {
            let (rf, gf, bf) = (r as f32, g as f32, b as f32);
            [
                (0.393 * rf + 0.769 * gf + 0.189 * bf).min(255.0) as u8,
                (0.349 * rf + 0.686 * gf + 0.168 * bf).min(255.0) as u8,
                (0.272 * rf + 0.534 * gf + 0.131 * bf).min(255.0) as u8,
                a,
            ]
        }),
        ImageFilter::Invert => map_pixels(image, |[r, g, b, a]| [255 - r, 255 - g, 255 - b, a]),
        ImageFilter::Brightness => map_pixels(image, |[r, g, b, a]| {
            [
                r.saturating_add(26),
                g.saturating_add(26),
                b.saturating_add(26),
                a,
            ]
        }),
        ImageFilter::Contrast => map_pixels(image, |[r, g, b, a]| {
            let adjust = |c: u8| ((c as f32 - 128.0) * 1.25 + 128.0).clamp(0.0, 255.0) as u8;
            [adjust(r), adjust(g), adjust(b), a]
        }),
        ImageFilter::Saturation => map_pixels(image, |[r, g, b, a]| {
            let l = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
            let boost = |c: u8| (l + (c as f32 - l) * 1.5).clamp(0.0, 255.0) as u8;
            [boost(r), boost(g), boost(b), a]
        }),
        ImageFilter::Blur => imageops::blur(&image, 4.0),
        ImageFilter::Sharpen => imageops::unsharpen(&image, 1.0, 2),
        ImageFilter::Pixelate => {
            let (w, h) = image.dimensions();
            let block = 8;
            let small = imageops::resize(
                &image,
                (w / block).max(1),
                (h / block).max(1),
                FilterType::Nearest,
            );
            imageops::resize(&small, w, h, FilterType::Nearest)
        }
        ImageFilter::Vintage => {
            let sepia = apply_filter(image, ImageFilter::Sepia);
            map_pixels(sepia, |[r, g, b, a]| {
                let fade = |c: u8| ((c as f32 - 128.0) * 0.9 + 128.0).clamp(0.0, 255.0) as u8;
                [fade(r), fade(g), fade(b), a]
            })
        }
        ImageFilter::Huerotate => imageops::huerotate(&image, 90),
        ImageFilter::Gamma => map_pixels(image, |[r, g, b, a]| {
            let correct = |c: u8| ((c as f32 / 255.0).powf(1.0 / 1.5) * 255.0) as u8;
            [correct(r), correct(g), correct(b), a]
        }),
    }
}

fn map_pixels(mut image: RgbaImage, f: impl Fn([u8; 4]) -> [u8; 4]) -> RgbaImage {
    for pixel in image.pixels_mut() {
        let Rgba(rgba) = *pixel;
        *pixel = Rgba(f(rgba));
    }
    image
}
