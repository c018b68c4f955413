//! Color helpers for the final composite.

use lava_core::Rgb;

use crate::raster::Pixel;

/// Composite a premultiplied pixel over an opaque background.
pub fn over(pixel: Pixel, background: Rgb) -> Rgb {
    let [r, g, b, a] = pixel;
    let a = a.clamp(0.0, 1.0);
    let [br, bg, bb] = background.to_unit();
    Rgb::from_unit([r + br * (1.0 - a), g + bg * (1.0 - a), b + bb * (1.0 - a)])
}
