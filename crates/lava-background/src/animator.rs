//! The colored points and the logic that re-randomizes their positions.

use lava_core::{Point, Rgb};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Stable identifier of a [`ColoredPoint`] within its animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(usize);

impl PointId {
    /// Slot of the point in the animator's list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A circle: fixed identity and color, movable position.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredPoint {
    id: PointId,
    color: Rgb,
    /// Target position, normalized to the drawing surface.
    pub(crate) position: Point,
}

impl ColoredPoint {
    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// Receives a notification right before the animator moves its points.
///
/// The slice still holds the pre-mutation positions, so an implementation
/// can capture them as the start of an interpolation.
pub trait WillChange {
    fn will_change(&mut self, points: &[ColoredPoint]);
}

impl WillChange for () {
    fn will_change(&mut self, _: &[ColoredPoint]) {}
}

/// Draw an independent uniform position, each axis in `[0, 1]`.
pub fn random_position<R: Rng>(rng: &mut R) -> Point {
    Point::new(rng.gen_range(0.0..=1.0), rng.gen_range(0.0..=1.0))
}

/// Owns the list of colored points.
///
/// Points are created once, one per color in input order, and are never
/// added, removed or reordered afterwards. Only their positions change.
#[derive(Debug)]
pub struct PositionAnimator<R = StdRng> {
    points: Vec<ColoredPoint>,
    rng: R,
    generation: u64,
}

impl PositionAnimator<StdRng> {
    /// Create an animator seeded from the operating system.
    pub fn from_entropy(colors: impl IntoIterator<Item = Rgb>) -> Self {
        Self::new(colors, StdRng::from_entropy())
    }
}

impl<R: Rng> PositionAnimator<R> {
    /// Create one point per color at a random position.
    pub fn new(colors: impl IntoIterator<Item = Rgb>, mut rng: R) -> Self {
        let points = colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| ColoredPoint {
                id: PointId(i),
                color,
                position: random_position(&mut rng),
            })
            .collect();

        Self {
            points,
            rng,
            generation: 0,
        }
    }

    /// Read-only view of the points, in construction order.
    pub fn points(&self) -> &[ColoredPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of completed reassignments.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Move every point to a new random position.
    pub fn reassign(&mut self) {
        self.reassign_with(&mut ());
    }

    /// Notify `observer` with the current positions, then move every point
    /// to a new random position.
    pub fn reassign_with<W: WillChange + ?Sized>(&mut self, observer: &mut W) {
        observer.will_change(&self.points);

        for point in &mut self.points {
            point.position = random_position(&mut self.rng);
        }
        self.generation += 1;
    }
}
