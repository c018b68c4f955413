//! Terminal rendering of the blurred circle layer.

use lava_core::{Point, Rgb};
use ratatui::{
    Frame,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use tracing::debug;

use crate::color::over;
use crate::raster::Raster;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: &str = "▀";

/// Background render state.
///
/// Each terminal cell holds two stacked pixels, so a `W×H` cell area is a
/// `W×2H` pixel surface with roughly square pixels.
#[derive(Debug, Default)]
pub struct BackgroundState {
    /// Circle layer, reused across frames.
    raster: Raster,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
}

impl BackgroundState {
    /// Create a new background state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The composited layer from the last render, before the background.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Render the circles, blurred and composited over `background`.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        discs: impl IntoIterator<Item = (Rgb, Point)>,
        background: Rgb,
        blur_radius: f32,
    ) {
        let area = frame.area();
        let width = area.width;
        let height = area.height;
        if width == 0 || height == 0 {
            return;
        }

        if width != self.last_width || height != self.last_height {
            debug!(width, height, "resizing background raster");
            self.raster.resize(width as usize, height as usize * 2);
            self.last_width = width;
            self.last_height = height;
        }

        self.composite(discs, blur_radius);

        let lines: Vec<Line> = (0..height as usize)
            .map(|y| {
                let spans: Vec<Span> = (0..width as usize)
                    .map(|x| {
                        let top = over(self.raster.pixel(x, y * 2), background);
                        let bottom = over(self.raster.pixel(x, y * 2 + 1), background);
                        Span::styled(HALF_BLOCK, Style::new().fg(top.into()).bg(bottom.into()))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    /// Draw every disc into the layer, then blur the whole layer.
    ///
    /// Disc radius is half the smaller surface dimension; later discs are
    /// painted on top of earlier ones.
    fn composite(&mut self, discs: impl IntoIterator<Item = (Rgb, Point)>, blur_radius: f32) {
        let w = self.raster.width() as f32;
        let h = self.raster.height() as f32;
        let radius = w.min(h) / 2.0;

        self.raster.clear();
        for (color, center) in discs {
            self.raster.fill_disc(center.x * w, center.y * h, radius, color);
        }
        self.raster.blur(blur_radius);
    }
}
