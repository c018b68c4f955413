//! Blurred drifting-circle background.
//!
//! A [`PositionAnimator`] owns a fixed set of colored points and moves them
//! to random positions. A [`PresentationDriver`] calls it on a repeating
//! timer while the view is visible and eases the points from their old to
//! their new positions. [`BackgroundState`] paints the points as large
//! discs, blurs the composite and writes it to a ratatui frame.

mod animator;
mod blur;
mod color;
mod driver;
mod raster;
mod state;
mod transition;

pub use animator::{ColoredPoint, PointId, PositionAnimator, WillChange, random_position};
pub use color::over;
pub use driver::PresentationDriver;
pub use raster::{Pixel, Raster};
pub use state::BackgroundState;
pub use transition::{Retarget, Transition};
