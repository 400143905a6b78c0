//! Brightness scoring for the confirmation-bubble region.
//!
//! The bubble is a bright near-white overlay on a darker board, so a plain
//! average-brightness threshold separates "overlay present" from "overlay
//! absent" without any pattern matching.

use crate::services::CapturedFrame;

// Perceived-brightness channel weights (0.299 R + 0.587 G + 0.114 B).
const WEIGHT_R: f64 = 0.299;
const WEIGHT_G: f64 = 0.587;
const WEIGHT_B: f64 = 0.114;

/// Average perceptual luminance of the frame, normalized to [0, 1].
pub fn average_luminance(frame: &CapturedFrame) -> f64 {
    let step = frame.bytes_per_pixel() as usize;
    let mut sum = 0.0;
    for pixel in frame.data().chunks_exact(step) {
        sum += WEIGHT_R * f64::from(pixel[0])
            + WEIGHT_G * f64::from(pixel[1])
            + WEIGHT_B * f64::from(pixel[2]);
    }

    let pixel_count = (frame.width() * frame.height()) as f64;
    sum / pixel_count / 255.0
}
