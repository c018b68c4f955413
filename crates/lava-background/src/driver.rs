//! Schedules periodic reassignment while the view is visible.

use lava_core::{Easing, Point, Rgb, Timing};
use rand::{Rng, rngs::StdRng};
use tracing::{debug, info};

use crate::animator::PositionAnimator;
use crate::transition::Transition;

/// Ties a [`PositionAnimator`] to a repeating timer and a [`Transition`].
///
/// Time is passed in as milliseconds since an arbitrary epoch, the same
/// clock for every call.
#[derive(Debug)]
pub struct PresentationDriver<R = StdRng> {
    animator: PositionAnimator<R>,
    transition: Transition,
    tick_ms: u64,
    blur_radius: f32,
    /// Deadline of the next tick. `None` while hidden.
    next_tick_ms: Option<u64>,
}

impl<R: Rng> PresentationDriver<R> {
    /// Create a hidden driver. Nothing moves until [`Self::appear`].
    pub fn new(animator: PositionAnimator<R>, timing: &Timing) -> Self {
        Self {
            animator,
            transition: Transition::new(timing.transition_ms, timing.easing),
            tick_ms: timing.tick_ms.max(1),
            blur_radius: timing.blur_radius,
            next_tick_ms: None,
        }
    }

    pub fn animator(&self) -> &PositionAnimator<R> {
        &self.animator
    }

    pub fn is_visible(&self) -> bool {
        self.next_tick_ms.is_some()
    }

    /// Whether points are still moving at `now_ms`.
    pub fn is_animating(&self, now_ms: u64) -> bool {
        self.transition.is_active(now_ms)
    }

    /// Blur radius the points are drawn with, in raster pixels.
    pub fn blur_radius(&self) -> f32 {
        self.blur_radius
    }

    pub fn easing(&self) -> Easing {
        self.transition.easing()
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.transition.set_easing(easing);
    }

    /// The view became visible: move once right away and start the timer.
    pub fn appear(&mut self, now_ms: u64) {
        if self.is_visible() {
            return;
        }
        info!(points = self.animator.len(), "background visible");
        self.animate(now_ms);
        self.next_tick_ms = Some(now_ms.saturating_add(self.tick_ms));
    }

    /// The view was hidden: stop the timer. A running transition is left
    /// where it is.
    pub fn disappear(&mut self) {
        if self.next_tick_ms.take().is_some() {
            info!(generation = self.animator.generation(), "background hidden");
        }
    }

    pub fn set_visible(&mut self, visible: bool, now_ms: u64) {
        if visible {
            self.appear(now_ms);
        } else {
            self.disappear();
        }
    }

    /// Fire the timer if it is due. Returns whether the points were moved.
    ///
    /// Ticks missed by a late call are coalesced into one move and the
    /// schedule keeps its original phase.
    pub fn update(&mut self, now_ms: u64) -> bool {
        let Some(deadline) = self.next_tick_ms else {
            return false;
        };
        if now_ms < deadline {
            return false;
        }

        let missed = (now_ms - deadline) / self.tick_ms;
        if missed > 0 {
            debug!(missed, "coalescing late ticks");
        }
        self.next_tick_ms = Some(deadline + (missed + 1) * self.tick_ms);
        self.animate(now_ms);
        true
    }

    /// Move the points now, outside the timer. Ignored while hidden.
    pub fn shuffle(&mut self, now_ms: u64) -> bool {
        if !self.is_visible() {
            return false;
        }
        self.animate(now_ms);
        true
    }

    /// Color and on-screen position of every point at `now_ms`.
    pub fn displayed(&self, now_ms: u64) -> impl Iterator<Item = (Rgb, Point)> + '_ {
        self.animator
            .points()
            .iter()
            .enumerate()
            .map(move |(slot, point)| {
                (
                    point.color(),
                    self.transition.sample(slot, point.position(), now_ms),
                )
            })
    }

    fn animate(&mut self, now_ms: u64) {
        self.animator
            .reassign_with(&mut self.transition.retarget_at(now_ms));
        debug!(
            generation = self.animator.generation(),
            duration_ms = self.transition.duration_ms(),
            "points reassigned"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn driver() -> PresentationDriver {
        let animator = PositionAnimator::new(
            [Rgb::RED, Rgb::BLUE, Rgb::YELLOW, Rgb::RED],
            StdRng::seed_from_u64(17),
        );
        PresentationDriver::new(animator, &Timing::default())
    }

    #[test]
    fn test_starts_hidden_and_idle() {
        let mut d = driver();
        assert!(!d.is_visible());
        assert!(!d.update(10_000));
        assert!(!d.shuffle(10_000));
        assert_eq!(d.animator().generation(), 0);
        assert!(!d.is_animating(0));
    }

    #[test]
    fn test_appear_moves_once_immediately() {
        let mut d = driver();
        d.appear(1000);
        assert!(d.is_visible());
        assert_eq!(d.animator().generation(), 1);
        assert!(d.is_animating(1000));

        // Appearing again while visible does nothing.
        d.appear(1500);
        assert_eq!(d.animator().generation(), 1);
    }

    #[test]
    fn test_timer_fires_every_interval() {
        let mut d = driver();
        d.appear(0);
        assert!(!d.update(2999));
        assert!(d.update(3000));
        assert!(!d.update(3001));
        assert!(d.update(6000));
        assert_eq!(d.animator().generation(), 3);
    }

    #[test]
    fn test_late_update_coalesces_ticks() {
        let mut d = driver();
        d.appear(0);
        assert!(d.update(10_500));
        assert_eq!(d.animator().generation(), 2);
        // The schedule stays on multiples of the interval.
        assert!(!d.update(11_999));
        assert!(d.update(12_000));
    }

    #[test]
    fn test_hidden_then_visible_again() {
        let mut d = driver();
        d.appear(0);
        assert!(d.update(3000));
        let before_hide = d.animator().generation();

        d.disappear();
        assert!(!d.is_visible());
        for now in (3000..30_000).step_by(250) {
            assert!(!d.update(now));
        }
        assert!(!d.shuffle(20_000));
        assert_eq!(d.animator().generation(), before_hide);

        d.appear(30_000);
        assert_eq!(d.animator().generation(), before_hide + 1);
        // The timer restarts relative to the new appearance.
        assert!(!d.update(32_999));
        assert!(d.update(33_000));
    }

    #[test]
    fn test_set_visible_toggles() {
        let mut d = driver();
        d.set_visible(true, 0);
        assert!(d.is_visible());
        d.set_visible(false, 100);
        assert!(!d.is_visible());
        assert_eq!(d.animator().generation(), 1);
    }

    #[test]
    fn test_shuffle_while_visible() {
        let mut d = driver();
        d.appear(0);
        assert!(d.shuffle(500));
        assert_eq!(d.animator().generation(), 2);
        // Manual moves do not shift the timer.
        assert!(d.update(3000));
    }

    #[test]
    fn test_displayed_positions_stay_normalized_while_moving() {
        let mut d = driver();
        d.appear(0);
        for now in (0..20_000).step_by(100) {
            d.update(now);
            let shown: Vec<(Rgb, Point)> = d.displayed(now).collect();
            assert_eq!(shown.len(), 4);
            assert!(shown.iter().all(|(_, p)| p.is_normalized()));
            assert_eq!(shown[0].0, Rgb::RED);
            assert_eq!(shown[3].0, Rgb::RED);
        }
    }

    #[test]
    fn test_settles_on_targets() {
        let mut d = driver();
        d.appear(0);
        let settled: Vec<Point> = d.displayed(4000).map(|(_, p)| p).collect();
        let targets: Vec<Point> = d.animator().points().iter().map(|p| p.position()).collect();
        assert_eq!(settled, targets);
        assert!(!d.is_animating(4000));
    }

    #[test]
    fn test_easing_change_does_not_jump() {
        let mut d = driver();
        d.appear(0);
        let before: Vec<(Rgb, Point)> = d.displayed(1000).collect();
        d.set_easing(Easing::Linear);
        let after: Vec<(Rgb, Point)> = d.displayed(1000).collect();
        assert_eq!(before, after);
        assert_eq!(d.easing(), Easing::Linear);
    }

    #[test]
    fn test_timing_is_taken_from_config() {
        let timing = Timing {
            blur_radius: 2.5,
            easing: Easing::EaseOut,
            ..Timing::default()
        };
        let d = PresentationDriver::new(
            PositionAnimator::new([Rgb::BLUE], StdRng::seed_from_u64(2)),
            &timing,
        );
        assert_eq!(d.blur_radius(), 2.5);
        assert_eq!(d.easing(), Easing::EaseOut);
    }
}
