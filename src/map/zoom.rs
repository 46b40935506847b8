//! Zoom slider to map span conversion.
//!
//! `delta = 10^(z / ZOOM_SCALE + ZOOM_OFFSET)`. With a negative scale the
//! span shrinks as the slider value grows: `z = 30` is one degree, each
//! further 10 divides the span by ten.

use crate::constants::{ZOOM_OFFSET, ZOOM_SCALE, ZOOM_SLIDER_MAX, ZOOM_SLIDER_MIN};

pub fn clamp_zoom(z: f64) -> f64 {
    if z.is_nan() {
        return ZOOM_SLIDER_MIN;
    }
    z.clamp(ZOOM_SLIDER_MIN, ZOOM_SLIDER_MAX)
}

pub fn zoom_to_delta(z: f64) -> f64 {
    10f64.powf(z / ZOOM_SCALE + ZOOM_OFFSET)
}

/// Inverse of [`zoom_to_delta`]; not clamped to the slider range.
pub fn delta_to_zoom(delta: f64) -> f64 {
    ZOOM_SCALE * (delta.log10() - ZOOM_OFFSET)
}
