//! Window-relative probe geometry for the squelch attempt.
//!
//! The click positions were tuned against the 4:3 reference layout the game
//! centers inside wider windows, so horizontal placement is rescaled by the
//! window's aspect ratio while vertical placement and the capture size scale
//! with height alone.

use crate::services::{ClientRect, Point, RegionSize};

const REFERENCE_ASPECT: f64 = 4.0 / 3.0;

const HERO_X: f64 = 0.5;
const HERO_Y: f64 = 0.17;
const BUBBLE_X: f64 = 0.4;
const BUBBLE_Y: f64 = 0.10;

// 55x27 px at a 1080 px tall window.
const CAPTURE_WIDTH_SCALE: f64 = 0.051;
const CAPTURE_HEIGHT_SCALE: f64 = 0.025;

/// The two probe points and capture size for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeLayout {
    /// Where to hover/click to surface the squelch menu (opponent hero).
    pub hero: Point,
    /// Where the confirmation bubble appears, and where the committing
    /// click lands.
    pub bubble: Point,
    /// Size of the region sampled at the bubble point.
    pub capture_size: RegionSize,
}

/// Map a window client rectangle to the probe layout.
///
/// Precondition: the rectangle is non-degenerate (`width > 0 && height > 0`).
pub fn probe_layout(rect: &ClientRect) -> ProbeLayout {
    let width = f64::from(rect.width);
    let height = f64::from(rect.height);
    let ratio = REFERENCE_ASPECT / (width / height);

    ProbeLayout {
        hero: Point::new(
            scaled_x(HERO_X, width, ratio) as i32,
            (HERO_Y * height) as i32,
        ),
        bubble: Point::new(
            scaled_x(BUBBLE_X, width, ratio) as i32,
            (BUBBLE_Y * height) as i32,
        ),
        capture_size: RegionSize {
            width: (height * CAPTURE_WIDTH_SCALE).round() as u32,
            height: (height * CAPTURE_HEIGHT_SCALE).round() as u32,
        },
    }
}

/// Horizontal position of `rel` inside the aspect-corrected reference
/// region, centered in the window.
fn scaled_x(rel: f64, width: f64, ratio: f64) -> f64 {
    width * ratio * rel + width * (1.0 - ratio) / 2.0
}
