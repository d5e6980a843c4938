//! Pixel extraction for a committed crop rectangle.
//!
//! Converts a canvas-space rectangle to whole pixels and copies that region
//! out of an RGB image.
//!
//! # Coordinate System
//!
//! - Canvas units equal image pixels
//! - Edges are rounded to the nearest pixel
//! - The region is clamped to the image before copying

use super::SurfaceError;
use crate::geometry::Rectangle;
use image::{imageops, RgbImage};

/// Copy the pixels inside `rect` out of `image`.
///
/// # Arguments
///
/// * `image` - Source image
/// * `rect` - Crop rectangle in canvas (pixel) coordinates
///
/// # Returns
///
/// A new `RgbImage` containing only the cropped region.
///
/// # Behavior
///
/// - If the rectangle extends beyond the image, it is clamped
/// - A rectangle with positive area yields at least a 1x1 image
/// - A zero-area rectangle, or one entirely outside the image, is an error
pub fn extract_region(image: &RgbImage, rect: &Rectangle) -> Result<RgbImage, SurfaceError> {
    let empty = || SurfaceError::EmptyRegion {
        left: rect.left,
        top: rect.top,
        width: rect.width,
        height: rect.height,
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(SurfaceError::NoImage);
    }
    if !rect.is_valid() || !rect.left.is_finite() || !rect.top.is_finite() {
        return Err(empty());
    }

    let img_w = image.width();
    let img_h = image.height();

    let px_left = rect.left.max(0.0).round() as u32;
    let px_top = rect.top.max(0.0).round() as u32;
    if px_left >= img_w || px_top >= img_h {
        return Err(empty());
    }

    let px_width = rect.width.round() as u32;
    let px_height = rect.height.round() as u32;

    // Clamp to image bounds
    let px_right = px_left.saturating_add(px_width).min(img_w);
    let px_bottom = px_top.saturating_add(px_height).min(img_h);

    // Ensure minimum dimensions
    let out_width = px_right.saturating_sub(px_left).max(1);
    let out_height = px_bottom.saturating_sub(px_top).max(1);

    Ok(imageops::crop_imm(image, px_left, px_top, out_width, out_height).to_image())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
