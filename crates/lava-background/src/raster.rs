//! Software pixel surface the circles are composited into.

use lava_core::Rgb;

/// Premultiplied `[r, g, b, a]`, each in `0.0..=1.0`.
pub type Pixel = [f32; 4];

pub const TRANSPARENT: Pixel = [0.0; 4];

/// A transparent layer of premultiplied pixels, row-major.
#[derive(Debug, Clone, Default)]
pub struct Raster {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) pixels: Vec<Pixel>,
    /// Intermediate buffer reused by the blur passes.
    pub(crate) scratch: Vec<Pixel>,
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width * height],
            scratch: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, TRANSPARENT);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT);
    }

    /// Pixel at `(x, y)`, transparent when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        if x >= self.width || y >= self.height {
            return TRANSPARENT;
        }
        self.pixels[y * self.width + x]
    }

    /// Sum of every channel over the whole surface.
    pub fn total(&self) -> Pixel {
        self.pixels.iter().fold(TRANSPARENT, |mut acc, p| {
            for (a, c) in acc.iter_mut().zip(p) {
                *a += c;
            }
            acc
        })
    }

    /// Paint an opaque filled disc over whatever is already there.
    ///
    /// A pixel is covered when its center lies inside the circle. Parts
    /// outside the surface are clipped.
    pub fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        if self.width == 0 || self.height == 0 || radius <= 0.0 {
            return;
        }

        let [r, g, b] = color.to_unit();
        let paint: Pixel = [r, g, b, 1.0];
        let r2 = radius * radius;

        let y_start = (cy - radius - 0.5).ceil().max(0.0) as usize;
        let y_end = (cy + radius - 0.5).floor();
        if y_end < 0.0 {
            return;
        }
        let y_end = (y_end as usize).min(self.height - 1);

        for y in y_start..=y_end {
            let dy = y as f32 + 0.5 - cy;
            let span2 = r2 - dy * dy;
            if span2 < 0.0 {
                continue;
            }
            let half = span2.sqrt();

            let x_start = (cx - half - 0.5).ceil().max(0.0) as usize;
            let x_end = (cx + half - 0.5).floor();
            if x_end < 0.0 {
                continue;
            }
            let x_end = (x_end as usize).min(self.width - 1);
            if x_start > x_end {
                continue;
            }

            let row = y * self.width;
            self.pixels[row + x_start..=row + x_end].fill(paint);
        }
    }
}
