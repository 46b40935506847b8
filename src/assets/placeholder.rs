//! Placeholder image for places without a usable photo.
//!
//! Draws a simple "photo" glyph: a framed card with a sun and a mountain.

use bevy::prelude::*;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

use crate::constants::PLACEHOLDER_SIZE;

/// Resource holding the shared placeholder image.
#[derive(Resource, Clone)]
pub struct PlaceholderImage(pub Arc<RgbaImage>);

impl Default for PlaceholderImage {
    fn default() -> Self {
        Self(Arc::new(create_placeholder_image()))
    }
}

pub fn create_placeholder_image() -> RgbaImage {
    let size = PLACEHOLDER_SIZE;
    let frame = Rgba([110, 110, 120, 255]);
    let sky = Rgba([200, 215, 235, 255]);
    let sun = Rgba([245, 200, 80, 255]);
    let mountain = Rgba([90, 130, 100, 255]);

    let (sun_x, sun_y, sun_r) = (size as i32 * 3 / 4, size as i32 / 4, size as i32 / 10);

    RgbaImage::from_fn(size, size, |x, y| {
        // Frame (3px)
        if x < 3 || x >= size - 3 || y < 3 || y >= size - 3 {
            return frame;
        }

        let (xi, yi) = (x as i32, y as i32);
        if (xi - sun_x).pow(2) + (yi - sun_y).pow(2) <= sun_r.pow(2) {
            return sun;
        }

        // Mountain peak at the centre, base along the bottom of the frame
        let peak = size as i32 / 3;
        let half = size as i32 / 2;
        if yi >= peak + (xi - half).abs() {
            return mountain;
        }

        sky
    })
}
