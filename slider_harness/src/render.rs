//! Rendering of scan results onto `image` buffers.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use slider::geometry::{Rect, Window};
use slider::heatmap::Heatmap;

/// Shapes that can be outlined on an image.
pub trait PixelBounds {
    /// Inclusive `(left, top, right, bottom)` pixel coordinates.
    fn pixel_bounds(&self) -> (i64, i64, i64, i64);
}

impl PixelBounds for Rect {
    fn pixel_bounds(&self) -> (i64, i64, i64, i64) {
        (self.left(), self.top(), self.right(), self.bottom())
    }
}

/// Windows are half-open, so the last covered pixel is one before the end.
impl PixelBounds for Window {
    fn pixel_bounds(&self) -> (i64, i64, i64, i64) {
        (self.left(), self.top(), self.right() - 1, self.bottom() - 1)
    }
}

/// Inclusive pixel box as an imageproc rectangle, clipped to one pixel beyond
/// each side of a `width` x `height` image.
///
/// Edges that fall outside the image land just outside it, so what is drawn
/// inside the image is unchanged while every coordinate fits an `i32`.
/// Returns `None` for inverted boxes.
pub fn clipped_rect(
    (left, top, right, bottom): (i64, i64, i64, i64),
    width: u32,
    height: u32,
) -> Option<imageproc::rect::Rect> {
    if right < left || bottom < top {
        return None;
    }
    let clip = |v: i64, len: u32| v.clamp(-1, i64::from(len)).min(i64::from(i32::MAX));
    let (l, r) = (clip(left, width), clip(right, width));
    let (t, b) = (clip(top, height), clip(bottom, height));
    Some(
        imageproc::rect::Rect::at(l as i32, t as i32)
            .of_size((r - l + 1) as u32, (b - t + 1) as u32),
    )
}

/// Copy of `image` with an outline of `thickness` pixels around every box.
///
/// The outline is centered on the box edge. Parts falling outside the image
/// are clipped, and boxes with inverted edges are skipped.
pub fn draw_boxes<B: PixelBounds>(
    image: &RgbImage,
    boxes: &[B],
    color: Rgb<u8>,
    thickness: u32,
) -> RgbImage {
    let mut canvas = image.clone();
    let (width, height) = canvas.dimensions();
    let inner = i64::from(thickness / 2);
    let outer = i64::from(thickness) - inner;

    for bounds in boxes.iter().map(PixelBounds::pixel_bounds) {
        let (left, top, right, bottom) = bounds;
        if right < left || bottom < top {
            continue;
        }
        for grow in -inner..outer {
            let ring = (
                left.saturating_sub(grow),
                top.saturating_sub(grow),
                right.saturating_add(grow),
                bottom.saturating_add(grow),
            );
            if let Some(rect) = clipped_rect(ring, width, height) {
                draw_hollow_rect_mut(&mut canvas, rect, color);
            }
        }
    }

    canvas
}

/// Grayscale rendering of a heatmap, scaled so the hottest pixel is white.
pub fn heatmap_to_gray_image(heatmap: &Heatmap) -> GrayImage {
    let counts = heatmap.counts();
    let (height, width) = counts.dim();
    let peak = heatmap.max().max(1) as f64;

    let mut img = GrayImage::new(width as u32, height as u32);
    for ((y, x), &count) in counts.indexed_iter() {
        let level = (count as f64 / peak * 255.0).round() as u8;
        img.put_pixel(x as u32, y as u32, Luma([level]));
    }
    img
}

/// Black image with `mask` pixels set to white.
pub fn mask_to_gray_image(mask: ndarray::ArrayView2<bool>) -> GrayImage {
    let (height, width) = mask.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([if mask[[y as usize, x as usize]] { 255 } else { 0 }])
    })
}
