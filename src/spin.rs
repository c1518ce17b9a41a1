//! Spin lifecycle: `Idle -> Spinning -> Idle`.
//!
//! The controller never schedules anything itself. A host loop calls
//! [`SpinController::step`] with the current time once per frame and redraws
//! with the returned angle.

use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::SpinConfig;
use crate::error::Result;

/// Fast start, smooth deceleration.
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// One in-flight spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinSession {
    pub initial_angle: f64,
    pub target_angle: f64,
    pub started_at: Instant,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionStep {
    Continue(f64),
    Done(f64),
}

impl SpinSession {
    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        let total = self.duration.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f64();
        (elapsed / total).min(1.0)
    }

    pub fn angle_at(&self, progress: f64) -> f64 {
        self.initial_angle + (self.target_angle - self.initial_angle) * ease_out_cubic(progress)
    }

    pub fn step(&self, now: Instant) -> SessionStep {
        let t = self.progress(now);
        let angle = self.angle_at(t);
        if t < 1.0 {
            SessionStep::Continue(angle)
        } else {
            SessionStep::Done(angle)
        }
    }
}

/// Rotation state shared by the controller and the renderer.
///
/// `current_angle` accumulates across spins and only ever grows while spinning.
/// At most one session exists at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelState {
    current_angle: f64,
    session: Option<SpinSession>,
}

impl WheelState {
    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    pub fn is_spinning(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }
}

/// Result of advancing the controller by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinStep {
    Idle,
    Continue { angle: f64 },
    Done { angle: f64 },
}

#[derive(Debug, Clone)]
pub struct SpinController {
    state: WheelState,
    timing: SpinConfig,
}

impl SpinController {
    /// Rejects timing ranges that `request_spin` could not sample from.
    pub fn new(timing: SpinConfig) -> Result<Self> {
        timing.validate()?;
        Ok(Self {
            state: WheelState::default(),
            timing,
        })
    }

    pub fn state(&self) -> &WheelState {
        &self.state
    }

    pub fn current_angle(&self) -> f64 {
        self.state.current_angle
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning()
    }

    /// Place the wheel at `angle`. Refused while a spin is running.
    pub fn set_angle(&mut self, angle: f64) -> bool {
        if self.is_spinning() || !angle.is_finite() {
            return false;
        }
        self.state.current_angle = angle;
        true
    }

    /// Start a spin unless one is already running. Returns whether a session was created.
    pub fn request_spin<R: Rng>(&mut self, now: Instant, rng: &mut R) -> bool {
        if self.is_spinning() {
            return false;
        }
        let full_rotations = rng.random_range(self.timing.min_rotations..self.timing.max_rotations);
        let extra_angle = rng.random_range(0.0..TAU);
        let duration_ms = rng.random_range(
            self.timing.min_duration_ms as f64..self.timing.max_duration_ms as f64,
        );
        let initial_angle = self.state.current_angle;
        self.state.session = Some(SpinSession {
            initial_angle,
            target_angle: initial_angle + full_rotations * TAU + extra_angle,
            started_at: now,
            duration: Duration::from_secs_f64(duration_ms / 1000.0),
        });
        true
    }

    /// Advance the running spin to `now`.
    pub fn step(&mut self, now: Instant) -> SpinStep {
        let Some(session) = self.state.session else {
            return SpinStep::Idle;
        };
        match session.step(now) {
            SessionStep::Continue(angle) => {
                self.state.current_angle = angle;
                SpinStep::Continue { angle }
            }
            SessionStep::Done(angle) => {
                self.state.current_angle = angle;
                self.state.session = None;
                SpinStep::Done { angle }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FRAME: Duration = Duration::from_millis(16);

    fn run_to_completion(controller: &mut SpinController, start: Instant) -> (f64, usize) {
        let mut now = start;
        let mut frames = 0;
        loop {
            now += FRAME;
            frames += 1;
            match controller.step(now) {
                SpinStep::Continue { .. } => continue,
                SpinStep::Done { angle } => return (angle, frames),
                SpinStep::Idle => panic!("controller went idle without finishing"),
            }
        }
    }

    #[test]
    fn test_ease_out_cubic_shape() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        // Decelerating: equal time steps cover less distance later on.
        let early = ease_out_cubic(0.2) - ease_out_cubic(0.1);
        let late = ease_out_cubic(0.9) - ease_out_cubic(0.8);
        assert!(early > late);
    }

    #[test]
    fn test_session_progress_and_angle() {
        let start = Instant::now();
        let session = SpinSession {
            initial_angle: 1.0,
            target_angle: 11.0,
            started_at: start,
            duration: Duration::from_millis(1000),
        };
        assert_eq!(session.step(start), SessionStep::Continue(1.0));
        match session.step(start + Duration::from_millis(500)) {
            SessionStep::Continue(angle) => assert!((angle - 9.75).abs() < 1e-9),
            other => panic!("{other:?}"),
        }
        assert_eq!(session.step(start + Duration::from_millis(1000)), SessionStep::Done(11.0));
        assert_eq!(session.step(start + Duration::from_secs(30)), SessionStep::Done(11.0));
    }

    #[test]
    fn test_spin_travel_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut controller = SpinController::new(SpinConfig::default()).unwrap();
        let start = Instant::now();
        for _ in 0..25 {
            let before = controller.current_angle();
            assert!(controller.request_spin(start, &mut rng));
            let (angle, _) = run_to_completion(&mut controller, start);
            let travel = angle - before;
            assert!(travel >= 6.0 * TAU, "travel {travel}");
            assert!(travel < 10.0 * TAU + TAU, "travel {travel}");
            assert_eq!(controller.current_angle(), angle);
            assert!(!controller.is_spinning());
        }
    }

    #[test]
    fn test_session_parameters_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Instant::now();
        for _ in 0..200 {
            let mut controller = SpinController::new(SpinConfig::default()).unwrap();
            controller.request_spin(start, &mut rng);
            let session = *controller.state().session().unwrap();
            assert_eq!(session.initial_angle, 0.0);
            assert_eq!(session.started_at, start);
            assert!(session.duration >= Duration::from_millis(4800));
            assert!(session.duration < Duration::from_millis(5500));
        }
    }

    #[test]
    fn test_second_request_while_spinning_is_ignored() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut controller = SpinController::new(SpinConfig::default()).unwrap();
        let start = Instant::now();
        assert!(controller.request_spin(start, &mut rng));
        let session = *controller.state().session().unwrap();
        assert!(!controller.request_spin(start, &mut rng));
        assert!(!controller.request_spin(start + Duration::from_secs(2), &mut rng));
        assert_eq!(controller.state().session(), Some(&session));

        let mut now = start;
        while controller.is_spinning() {
            now += FRAME;
            controller.step(now);
            if let Some(current) = controller.state().session() {
                assert_eq!(current.target_angle, session.target_angle);
            }
        }
        assert_eq!(controller.current_angle(), session.angle_at(1.0));
    }

    #[test]
    fn test_angle_is_monotonic_while_spinning() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut controller = SpinController::new(SpinConfig::default()).unwrap();
        let start = Instant::now();
        controller.request_spin(start, &mut rng);
        let mut last = controller.current_angle();
        let mut now = start;
        while controller.is_spinning() {
            now += FRAME;
            controller.step(now);
            assert!(controller.current_angle() >= last);
            last = controller.current_angle();
        }
    }

    #[test]
    fn test_spins_accumulate_angle() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut controller = SpinController::new(SpinConfig::default()).unwrap();
        let start = Instant::now();
        controller.request_spin(start, &mut rng);
        let (first, _) = run_to_completion(&mut controller, start);
        controller.request_spin(start, &mut rng);
        let session = *controller.state().session().unwrap();
        assert_eq!(session.initial_angle, first);
        let (second, _) = run_to_completion(&mut controller, start);
        assert!(second > first + 6.0 * TAU);
    }

    #[test]
    fn test_controller_rejects_unusable_timing() {
        let empty = SpinConfig {
            min_rotations: 8.0,
            max_rotations: 8.0,
            ..SpinConfig::default()
        };
        assert!(SpinController::new(empty).is_err());
        let unbounded = SpinConfig {
            max_rotations: f64::INFINITY,
            ..SpinConfig::default()
        };
        assert!(SpinController::new(unbounded).is_err());
        let instant = SpinConfig {
            min_duration_ms: 0,
            ..SpinConfig::default()
        };
        assert!(SpinController::new(instant).is_err());
    }

    #[test]
    fn test_step_when_idle() {
        let mut controller = SpinController::new(SpinConfig::default()).unwrap();
        assert_eq!(controller.step(Instant::now()), SpinStep::Idle);
        assert!(controller.set_angle(2.5));
        assert_eq!(controller.current_angle(), 2.5);
        assert!(!controller.set_angle(f64::NAN));
    }

    #[test]
    fn test_set_angle_refused_mid_spin() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut controller = SpinController::new(SpinConfig::default()).unwrap();
        controller.request_spin(Instant::now(), &mut rng);
        assert!(!controller.set_angle(0.0));
    }

    #[test]
    fn test_frame_count_matches_duration() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut controller = SpinController::new(SpinConfig::default()).unwrap();
        let start = Instant::now();
        controller.request_spin(start, &mut rng);
        let duration = controller.state().session().unwrap().duration;
        let (_, frames) = run_to_completion(&mut controller, start);
        let expected = (duration.as_secs_f64() / FRAME.as_secs_f64()).ceil() as usize;
        assert!(frames == expected || frames == expected + 1, "{frames} vs {expected}");
    }
}
