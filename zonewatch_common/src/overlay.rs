//! Immediate-mode frame annotation: detection boxes with class-colored
//! labels, the danger treatment for in-zone persons, and the ROI
//! rectangle styled from the current [`VisualState`].

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::alert::VisualState;
use crate::detection::Detection;
use crate::geometry::VideoRect;
use crate::palette::{color_for_class, hsl_to_rgb};

const DANGER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const DANGER_MARKER: &str = "! DANGER";

const LABEL_HEIGHT: u32 = 20;
const LABEL_SCALE: f32 = 16.0;
const BOX_THICKNESS: u32 = 2;
const DANGER_THICKNESS: u32 = 6;
const ROI_DASH: f32 = 5.0;

/// Drawing configuration. The font is optional: without one, boxes and
/// label backgrounds are still drawn and text width falls back to a
/// per-character estimate.
#[derive(Debug, Clone, Default)]
pub struct OverlayStyle {
    font: Option<FontArc>,
}

impl OverlayStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_bytes(bytes: Vec<u8>) -> anyhow::Result<Self> {
        let font = FontArc::try_from_vec(bytes)?;
        Ok(Self { font: Some(font) })
    }

    /// Measured pixel width of `text` at the label scale.
    pub fn text_width(&self, text: &str) -> f32 {
        match &self.font {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(LABEL_SCALE));
                text.chars()
                    .map(|c| scaled.h_advance(font.glyph_id(c)))
                    .sum()
            }
            // Rough monospace estimate when no font is configured.
            None => text.chars().count() as f32 * LABEL_SCALE * 0.5,
        }
    }
}

/// Draw every detection's box and label. `in_zone` flags (parallel to
/// `detections`) select the danger treatment: thicker red border and an
/// inline warning marker above the box. `mirrored` flips each box
/// horizontally to match a front-facing camera feed.
pub fn draw_detections(
    image: &mut RgbImage,
    detections: &[Detection],
    in_zone: &[bool],
    mirrored: bool,
    style: &OverlayStyle,
) {
    let frame_width = image.width() as f32;

    for (i, det) in detections.iter().enumerate() {
        let bbox = if mirrored {
            det.bbox.mirror_horizontal(frame_width)
        } else {
            det.bbox
        };
        let danger = in_zone.get(i).copied().unwrap_or(false);

        let (color, thickness) = if danger {
            (DANGER_COLOR, DANGER_THICKNESS)
        } else {
            (color_for_class(&det.class_name), BOX_THICKNESS)
        };

        stroke_rect(image, bbox.x, bbox.y, bbox.width, bbox.height, thickness, color);

        // Label background sized to the text, then the text itself.
        let label = det.class_name.as_str();
        let label_width = style.text_width(label) + 4.0;
        fill_rect(image, bbox.x, bbox.y, label_width, LABEL_HEIGHT as f32, color);
        draw_label(image, style, label, bbox.x, bbox.y, LABEL_TEXT_COLOR);

        if danger {
            draw_label(
                image,
                style,
                DANGER_MARKER,
                bbox.x,
                bbox.y - 25.0,
                DANGER_COLOR,
            );
        }
    }
}

/// Draw the ROI rectangle styled from the frame's visual state: dashed
/// border in the state's hue, fill blended at the state's alpha.
pub fn draw_roi(image: &mut RgbImage, roi: &VideoRect, visual: &VisualState) {
    let color = hsl_to_rgb(visual.border_hue, 1.0, 0.5);
    blend_rect(image, roi.x, roi.y, roi.width, roi.height, color, visual.fill_alpha);
    dashed_rect(image, roi.x, roi.y, roi.width, roi.height, color);
}

fn draw_label(
    image: &mut RgbImage,
    style: &OverlayStyle,
    text: &str,
    x: f32,
    y: f32,
    color: Rgb<u8>,
) {
    if let Some(font) = &style.font {
        draw_text_mut(
            image,
            color,
            x as i32,
            y as i32,
            PxScale::from(LABEL_SCALE),
            font,
            text,
        );
    }
}

/// Hollow rectangle with the given border thickness, drawn inward.
fn stroke_rect(image: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, thickness: u32, color: Rgb<u8>) {
    let t = thickness as f32;
    // Top, bottom, left, right bands.
    fill_rect(image, x, y, w, t, color);
    fill_rect(image, x, y + h - t, w, t, color);
    fill_rect(image, x, y, t, h, color);
    fill_rect(image, x + w - t, y, t, h, color);
}

fn fill_rect(image: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, color: Rgb<u8>) {
    if let Some(rect) = clipped(image, x, y, w, h) {
        draw_filled_rect_mut(image, rect, color);
    }
}

fn blend_rect(image: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, color: Rgb<u8>, alpha: f32) {
    let Some(rect) = clipped(image, x, y, w, h) else {
        return;
    };
    let alpha = alpha.clamp(0.0, 1.0);
    for py in rect.top()..=rect.bottom() {
        for px in rect.left()..=rect.right() {
            let pixel = image.get_pixel_mut(px as u32, py as u32);
            for (channel, target) in pixel.0.iter_mut().zip(color.0) {
                *channel =
                    (*channel as f32 * (1.0 - alpha) + target as f32 * alpha).round() as u8;
            }
        }
    }
}

fn dashed_rect(image: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, color: Rgb<u8>) {
    dashed_line(image, (x, y), (x + w, y), color);
    dashed_line(image, (x + w, y), (x + w, y + h), color);
    dashed_line(image, (x + w, y + h), (x, y + h), color);
    dashed_line(image, (x, y + h), (x, y), color);
}

fn dashed_line(image: &mut RgbImage, start: (f32, f32), end: (f32, f32), color: Rgb<u8>) {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);

    let mut offset = 0.0;
    while offset < length {
        let seg_end = (offset + ROI_DASH).min(length);
        draw_line_segment_mut(
            image,
            (start.0 + ux * offset, start.1 + uy * offset),
            (start.0 + ux * seg_end, start.1 + uy * seg_end),
            color,
        );
        // Skip a gap the size of a dash.
        offset = seg_end + ROI_DASH;
    }
}

/// Clip a float rect against the image bounds; `None` when fully outside
/// or degenerate.
fn clipped(image: &RgbImage, x: f32, y: f32, w: f32, h: f32) -> Option<Rect> {
    let (img_w, img_h) = (image.width() as f32, image.height() as f32);
    let left = x.max(0.0);
    let top = y.max(0.0);
    let right = (x + w).min(img_w);
    let bottom = (y + h).min(img_h);
    if right - left < 1.0 || bottom - top < 1.0 {
        return None;
    }
    Some(Rect::at(left as i32, top as i32).of_size((right - left) as u32, (bottom - top) as u32))
}
