use crate::entropy::{Entropy, Selector};
use std::f64::consts::PI;

/// Wall-clock length of a spin.
pub const SPIN_DURATION_MS: u64 = 10_000;
/// Fraction of the spin spent accelerating before the long deceleration.
pub const ACCEL_FRACTION: f64 = 0.20;
/// Fraction of a slice reserved on each edge so the wheel never appears to
/// stop exactly on a boundary.
pub const MARGIN_FRACTION: f64 = 0.15;
/// Rim detents per revolution, shared by the rim dots and the click track.
pub const DETENT_COUNT: u32 = 24;
/// Minimum spacing between audible detent clicks.
pub const DETENT_MIN_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone)]
struct SpinSession {
    winner_index: usize,
    start_rotation: f64,
    target_rotation: f64,
    start_ms: u64,
    duration_ms: u64,
    accel_fraction: f64,
}

/// What a frame tick asks of the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickAction {
    pub should_redraw: bool,
    /// Winner slice index, reported exactly once when a spin completes.
    pub winner: Option<usize>,
}

/// Wheel rotation state plus the active spin session, advanced by the
/// caller's frame driver.
///
/// Rotation is unbounded and accumulates across spins; consumers take it
/// modulo `2π` when they need a pointer angle. At most one session is active
/// at a time, and `spin` is a no-op while one is.
#[derive(Debug, Default)]
pub struct SpinEngine {
    rotation: f64,
    previous_rotation: f64,
    rotation_velocity: f64,
    session: Option<SpinSession>,
}

impl SpinEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Per-tick rotation delta, for motion-blur style effects. Zero while
    /// the wheel is at rest.
    pub fn rotation_velocity(&self) -> f64 {
        self.rotation_velocity
    }

    pub fn is_spinning(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a spin over `item_count` slices using the OS-backed selector.
    /// Returns false (and changes nothing) while a spin is already running
    /// or when there is nothing to spin for.
    pub fn spin(&mut self, item_count: usize, now_ms: u64) -> bool {
        self.spin_with(item_count, &mut Entropy, now_ms)
    }

    /// `spin` with an explicit selector, the seam the tests use to force a
    /// winner.
    pub fn spin_with(
        &mut self,
        item_count: usize,
        selector: &mut impl Selector,
        now_ms: u64,
    ) -> bool {
        if self.session.is_some() || item_count == 0 {
            return false;
        }

        let slice = 2.0 * PI / item_count as f64;
        let winner_index = selector.random_index(item_count);

        // 14..=20 full revolutions, always an even count
        let full_spins = (7 + selector.random_index(4)) * 2;

        // Land inside the winner's slice, jittered but clear of both edges
        let margin = MARGIN_FRACTION * slice;
        let jitter_span = slice - 2.0 * margin;
        let jitter = selector.random_unit() * jitter_span - jitter_span / 2.0;

        let center = 2.0 * PI - (winner_index as f64 + 0.5) * slice;
        let left_edge = 2.0 * PI - (winner_index as f64 + 1.0) * slice + margin;
        let right_edge = 2.0 * PI - winner_index as f64 * slice - margin;
        let final_angle = (center + jitter).clamp(left_edge, right_edge);

        // Smallest whole-turn lift that still moves forward by at least
        // `full_spins` revolutions from wherever the wheel currently rests
        let turn = 2.0 * PI;
        let mut k = ((self.rotation - final_angle + full_spins as f64 * turn) / turn).ceil();
        if !k.is_finite() {
            k = full_spins as f64;
        }

        self.session = Some(SpinSession {
            winner_index,
            start_rotation: self.rotation,
            target_rotation: final_angle + k * turn,
            start_ms: now_ms,
            duration_ms: SPIN_DURATION_MS,
            accel_fraction: ACCEL_FRACTION,
        });
        true
    }

    /// Advances the animation. Meant to be called unconditionally from a
    /// perpetual frame callback; ticking while idle is a no-op.
    pub fn tick(&mut self, now_ms: u64) -> TickAction {
        let Some(session) = &self.session else {
            return TickAction::default();
        };

        let elapsed = now_ms.saturating_sub(session.start_ms);
        let progress = (elapsed as f64 / session.duration_ms as f64).min(1.0);
        let eased = eased_progress(progress, session.accel_fraction);

        self.previous_rotation = self.rotation;
        self.rotation =
            session.start_rotation + (session.target_rotation - session.start_rotation) * eased;
        self.rotation_velocity = self.rotation - self.previous_rotation;

        if progress >= 1.0 {
            // Snap to the exact target so no floating-point drift survives
            self.rotation = session.target_rotation;
            self.rotation_velocity = 0.0;
            let winner = session.winner_index;
            self.session = None;
            return TickAction {
                should_redraw: true,
                winner: Some(winner),
            };
        }

        TickAction {
            should_redraw: true,
            winner: None,
        }
    }
}

/// Two-phase easing: a quadratic spin-up over the first `accel` of the
/// timeline covering the same fraction of the sweep, then a long cubic
/// ease-out over the remainder. Continuous at the splice.
fn eased_progress(progress: f64, accel: f64) -> f64 {
    if progress < accel {
        let t = progress / accel;
        t * t * accel
    } else {
        let t = (progress - accel) / (1.0 - accel);
        accel + (1.0 - (1.0 - t).powi(3)) * (1.0 - accel)
    }
}

/// Detent-crossing detector for click feedback, throttled so fast
/// revolutions cannot flood the audio sink.
#[derive(Debug, Default)]
pub struct DetentChime {
    last_rotation: f64,
    last_click_ms: u64,
}

impl DetentChime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the rotation crossed a detent boundary since the
    /// previous observation, at most once per [`DETENT_MIN_INTERVAL_MS`].
    pub fn observe(&mut self, rotation: f64, now_ms: u64) -> bool {
        let step = 2.0 * PI / f64::from(DETENT_COUNT);
        let crossed = (rotation / step).floor() != (self.last_rotation / step).floor();
        self.last_rotation = rotation;

        if crossed && now_ms.saturating_sub(self.last_click_ms) >= DETENT_MIN_INTERVAL_MS {
            self.last_click_ms = now_ms;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Selector that replays queued draws; used to force winners.
    struct Scripted {
        indices: VecDeque<usize>,
        units: VecDeque<f64>,
    }

    impl Scripted {
        fn new(indices: &[usize], units: &[f64]) -> Self {
            Self {
                indices: indices.iter().copied().collect(),
                units: units.iter().copied().collect(),
            }
        }
    }

    impl Selector for Scripted {
        fn random_index(&mut self, _n: usize) -> usize {
            self.indices.pop_front().unwrap_or(0)
        }

        fn random_unit(&mut self) -> f64 {
            self.units.pop_front().unwrap_or(0.5)
        }
    }

    /// Angle under a pointer fixed at the top, measured clockwise from
    /// slice 0's leading edge.
    fn pointer_angle(rotation: f64) -> f64 {
        (2.0 * PI - rotation.rem_euclid(2.0 * PI)).rem_euclid(2.0 * PI)
    }

    #[test]
    fn spin_needs_items() {
        let mut engine = SpinEngine::new();
        assert!(!engine.spin(0, 0));
        assert!(!engine.is_spinning());
        assert_eq!(engine.rotation(), 0.0);
    }

    #[test]
    fn spin_is_a_noop_while_spinning() {
        let mut engine = SpinEngine::new();
        assert!(engine.spin(5, 0));
        let (target, started) = {
            let s = engine.session.as_ref().unwrap();
            (s.target_rotation, s.start_ms)
        };

        assert!(!engine.spin(5, 4_000));
        let s = engine.session.as_ref().unwrap();
        assert_eq!(s.target_rotation, target);
        assert_eq!(s.start_ms, started);
    }

    #[test]
    fn every_spin_travels_forward_at_least_fourteen_turns() {
        let mut engine = SpinEngine::new();
        let mut now = 0;
        for _ in 0..50 {
            assert!(engine.spin(6, now));
            let s = engine.session.as_ref().unwrap();
            assert!(s.target_rotation > s.start_rotation);
            assert!(s.target_rotation - s.start_rotation >= 14.0 * 2.0 * PI - 1e-9);

            now += SPIN_DURATION_MS;
            engine.tick(now);
            assert!(!engine.is_spinning());
        }
    }

    #[test]
    fn wheel_always_rests_inside_the_winner_slice() {
        let mut engine = SpinEngine::new();
        let mut now = 0;
        for n in [1usize, 2, 3, 5, 8, 12] {
            let slice = 2.0 * PI / n as f64;
            let margin = MARGIN_FRACTION * slice;
            for _ in 0..40 {
                assert!(engine.spin(n, now));
                now += SPIN_DURATION_MS;
                let winner = engine.tick(now).winner.expect("spin must complete");

                let pointer = pointer_angle(engine.rotation());
                assert!(winner < n);
                assert!(
                    pointer >= winner as f64 * slice + margin - 1e-9
                        && pointer <= (winner as f64 + 1.0) * slice - margin + 1e-9,
                    "pointer {} outside slice {} of {}",
                    pointer,
                    winner,
                    n
                );
            }
        }
    }

    #[test]
    fn lone_item_always_wins() {
        let mut engine = SpinEngine::new();
        assert!(engine.spin(1, 0));
        assert_eq!(engine.tick(SPIN_DURATION_MS).winner, Some(0));
    }

    #[test]
    fn forced_winner_runs_end_to_end() {
        // Eight slices, winner forced to index 3, zero jitter, 14 turns:
        // the slice center sits at 0.5625 of a revolution, so the target is
        // exactly (14 + 0.5625) revolutions.
        let mut engine = SpinEngine::new();
        let mut selector = Scripted::new(&[3, 0], &[0.5]);
        assert!(engine.spin_with(8, &mut selector, 5_000));
        let target = engine.session.as_ref().unwrap().target_rotation;
        assert!((target - 2.0 * PI * 14.5625).abs() < 1e-9);

        // Start of the timeline: no movement yet
        let action = engine.tick(5_000);
        assert!(action.should_redraw);
        assert_eq!(action.winner, None);
        assert_eq!(engine.rotation(), 0.0);

        // End of the acceleration phase covers the same fraction of sweep
        engine.tick(5_000 + 2_000);
        assert!((engine.rotation() - ACCEL_FRACTION * target).abs() < 1e-9);

        // One tick short of the end: still spinning
        assert_eq!(engine.tick(5_000 + SPIN_DURATION_MS - 1).winner, None);
        assert!(engine.is_spinning());

        // Completion: exact snap, winner reported once
        let action = engine.tick(5_000 + SPIN_DURATION_MS);
        assert_eq!(action.winner, Some(3));
        assert_eq!(engine.rotation(), target);
        assert_eq!(engine.rotation_velocity(), 0.0);
        assert!(!engine.is_spinning());

        // The driver keeps ticking after completion; nothing more comes out
        let action = engine.tick(5_000 + SPIN_DURATION_MS + 16);
        assert!(!action.should_redraw);
        assert_eq!(action.winner, None);
        assert_eq!(engine.rotation(), target);
    }

    #[test]
    fn velocity_is_the_per_tick_delta() {
        let mut engine = SpinEngine::new();
        let mut selector = Scripted::new(&[2, 1], &[0.5]);
        assert!(engine.spin_with(4, &mut selector, 0));

        let mut previous = engine.rotation();
        for now in [400, 1_000, 3_000, 7_500] {
            engine.tick(now);
            assert!((engine.rotation_velocity() - (engine.rotation() - previous)).abs() < 1e-12);
            assert!(engine.rotation_velocity() > 0.0);
            previous = engine.rotation();
        }
    }

    #[test]
    fn easing_is_continuous_and_monotonic() {
        assert_eq!(eased_progress(0.0, ACCEL_FRACTION), 0.0);
        assert_eq!(eased_progress(1.0, ACCEL_FRACTION), 1.0);

        // Both phases agree at the splice point
        let below = eased_progress(ACCEL_FRACTION - 1e-12, ACCEL_FRACTION);
        let at = eased_progress(ACCEL_FRACTION, ACCEL_FRACTION);
        assert!((at - ACCEL_FRACTION).abs() < 1e-12);
        assert!((below - at).abs() < 1e-9);

        let mut last = 0.0;
        for i in 0..=1_000 {
            let eased = eased_progress(f64::from(i) / 1_000.0, ACCEL_FRACTION);
            assert!(eased >= last);
            last = eased;
        }
    }

    #[test]
    fn chime_fires_on_detent_crossings() {
        let step = 2.0 * PI / f64::from(DETENT_COUNT);
        let mut chime = DetentChime::new();

        assert!(!chime.observe(step * 0.5, 60), "no boundary crossed yet");
        assert!(chime.observe(step * 1.5, 120));
        assert!(!chime.observe(step * 1.8, 180), "still inside the detent");
        assert!(chime.observe(step * 2.5, 260));
    }

    #[test]
    fn chime_is_throttled() {
        let step = 2.0 * PI / f64::from(DETENT_COUNT);
        let mut chime = DetentChime::new();

        assert!(chime.observe(step * 1.5, 100));
        // Crossings inside the 50 ms window stay silent
        assert!(!chime.observe(step * 2.5, 120));
        assert!(!chime.observe(step * 3.5, 140));
        // ...and the window reopens afterwards
        assert!(chime.observe(step * 4.5, 160));
    }
}
