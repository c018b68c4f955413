//! Explicit interpolation between old and new point positions.

use lava_core::{Easing, Point};

use crate::animator::{ColoredPoint, WillChange};

/// An eased move from captured start positions to the animator's targets.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Start position per point slot; empty until the first transition.
    from: Vec<Point>,
    /// Time the current transition started, if one was ever started.
    started_ms: Option<u64>,
    duration_ms: u64,
    /// Curve of the move in progress.
    active_easing: Easing,
    /// Curve the next move will use.
    next_easing: Easing,
}

impl Transition {
    pub fn new(duration_ms: u64, easing: Easing) -> Self {
        Self {
            from: Vec::new(),
            started_ms: None,
            duration_ms,
            active_easing: easing,
            next_easing: easing,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Curve for upcoming moves.
    pub fn easing(&self) -> Easing {
        self.next_easing
    }

    /// Change the curve for upcoming moves. A move in progress keeps its
    /// own curve.
    pub fn set_easing(&mut self, easing: Easing) {
        self.next_easing = easing;
    }

    /// Linear progress of the current transition in `[0, 1]`.
    pub fn progress(&self, now_ms: u64) -> f32 {
        let Some(started) = self.started_ms else {
            return 1.0;
        };
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(started);
        (elapsed as f64 / self.duration_ms as f64).min(1.0) as f32
    }

    /// Whether a transition is still moving at `now_ms`.
    pub fn is_active(&self, now_ms: u64) -> bool {
        self.progress(now_ms) < 1.0
    }

    /// Displayed position of the point in `slot` heading to `target`.
    pub fn sample(&self, slot: usize, target: Point, now_ms: u64) -> Point {
        let Some(&from) = self.from.get(slot) else {
            return target;
        };
        let weight = self.active_easing.apply(self.progress(now_ms));
        if weight >= 1.0 {
            return target;
        }
        from.lerp(target, weight)
    }

    /// Observer that restarts this transition at `now_ms` from whatever is
    /// on screen at that instant.
    pub fn retarget_at(&mut self, now_ms: u64) -> Retarget<'_> {
        Retarget {
            transition: self,
            now_ms,
        }
    }
}

/// Captures displayed positions before the animator moves its targets.
#[derive(Debug)]
pub struct Retarget<'a> {
    transition: &'a mut Transition,
    now_ms: u64,
}

impl WillChange for Retarget<'_> {
    fn will_change(&mut self, points: &[ColoredPoint]) {
        let now_ms = self.now_ms;
        let displayed: Vec<Point> = points
            .iter()
            .enumerate()
            .map(|(slot, point)| self.transition.sample(slot, point.position(), now_ms))
            .collect();

        self.transition.from = displayed;
        self.transition.started_ms = Some(now_ms);
        self.transition.active_easing = self.transition.next_easing;
    }
}
