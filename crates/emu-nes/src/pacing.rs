//! Wall-clock pacing.
//!
//! The machine runs as fast as it can; once per frame the [`Pacer`]
//! sleeps until that frame's deadline. Deadlines advance by a fixed frame
//! duration scaled by the throttle, so small delays are absorbed by the
//! next sleep. Falling further behind than the configured tolerance is a
//! shortfall: logged and re-based in lenient mode, fatal in strict mode.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use emu_core::MonotonicClock;
use tracing::{error, warn};

use crate::error::NesError;

/// Speed multiplier shared between the emulation thread and whoever
/// controls it. Values `<= 0` disable pacing.
#[derive(Debug, Clone)]
pub struct Throttle(Arc<AtomicU32>);

impl Throttle {
    #[must_use]
    pub fn new(speed: f32) -> Self {
        Self(Arc::new(AtomicU32::new(speed.to_bits())))
    }

    pub fn set(&self, speed: f32) {
        self.0.store(speed.to_bits(), Ordering::Release);
    }

    #[must_use]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep_until(&self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

pub struct Pacer {
    clock: Box<dyn MonotonicClock + Send>,
    frame: Duration,
    strict: bool,
    lag_tolerance_frames: u32,
    /// When the frame just emulated should end. `None` until the first
    /// paced frame, and again after pacing is switched off.
    deadline: Option<Duration>,
}

impl Pacer {
    /// `frame` is the real duration of one frame at throttle 1.
    #[must_use]
    pub fn new(
        clock: Box<dyn MonotonicClock + Send>,
        frame: Duration,
        strict: bool,
        lag_tolerance_frames: u32,
    ) -> Self {
        Self {
            clock,
            frame,
            strict,
            lag_tolerance_frames,
            deadline: None,
        }
    }

    pub fn set_clock(&mut self, clock: Box<dyn MonotonicClock + Send>) {
        self.clock = clock;
        self.deadline = None;
    }

    /// Called once after each emulated frame.
    pub fn pace(&mut self, throttle: f32) -> Result<(), NesError> {
        if throttle <= 0.0 || !throttle.is_finite() {
            self.deadline = None;
            return Ok(());
        }
        let frame = scaled_frame(self.frame, throttle);
        let now = self.clock.now();
        let Some(deadline) = self.deadline else {
            self.deadline = Some(now.saturating_add(frame));
            return Ok(());
        };

        let tolerance = frame.saturating_mul(self.lag_tolerance_frames);
        if now > deadline.saturating_add(tolerance) {
            let behind = now - deadline;
            if self.strict {
                error!(behind_us = behind.as_micros(), "emulation behind real time");
                return Err(NesError::PacingShortfall { behind });
            }
            warn!(behind_us = behind.as_micros(), "emulation behind real time, catching up");
            self.deadline = Some(now.saturating_add(frame));
            return Ok(());
        }

        self.clock.sleep_until(deadline);
        self.deadline = Some(deadline.saturating_add(frame));
        Ok(())
    }
}

/// `frame / throttle`, saturating at `Duration::MAX` for throttles so
/// small the quotient leaves the representable range.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn scaled_frame(frame: Duration, throttle: f32) -> Duration {
    let nanos = frame.as_nanos() as f64 / f64::from(throttle);
    if nanos >= Duration::MAX.as_nanos() as f64 {
        return Duration::MAX;
    }
    // Float to int `as` saturates; the range check above keeps the
    // seconds part in bounds.
    let nanos = nanos.round() as u128;
    let secs = u64::try_from(nanos / 1_000_000_000).unwrap_or(u64::MAX);
    let sub = (nanos % 1_000_000_000) as u32;
    Duration::new(secs, sub)
}
