//! Simulation clock for the frame loop.

use std::time::Duration;

/// Frame clock stepped by the driver.
///
/// Every frame sees one non-negative delta; the controller code never reads the
/// wall clock itself.
#[derive(Debug)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
    /// Step used by [`Time::advance_fixed`] (default 1/60 s).
    timestep: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            timestep: Duration::from_secs_f64(1.0 / 60.0),
        }
    }

    /// Begin a frame lasting `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Begin a frame lasting one timestep.
    pub fn advance_fixed(&mut self) {
        self.advance(self.timestep);
    }

    /// Length of the current frame in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Frames begun so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn timestep_seconds(&self) -> f32 {
        self.timestep.as_secs_f32()
    }

    /// Change the fixed step. Non-positive or non-finite values are ignored.
    pub fn set_timestep_seconds(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            self.timestep = Duration::from_secs_f64(seconds);
            log::debug!("Fixed timestep set to {:?}", self.timestep);
        } else {
            log::warn!("Ignoring invalid timestep {}s", seconds);
        }
    }

    /// Whole frames per simulated second at the fixed step, at least 1.
    pub fn frames_per_second(&self) -> u64 {
        (1.0 / self.timestep.as_secs_f64()).round().max(1.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_steps_accumulate() {
        let mut time = Time::new();
        time.set_timestep_seconds(0.02);
        for _ in 0..50 {
            time.advance_fixed();
        }
        assert_eq!(time.frame_count(), 50);
        assert!((time.elapsed_seconds() - 1.0).abs() < 1e-4);
        assert!((time.delta_seconds() - 0.02).abs() < 1e-6);
        assert_eq!(time.frames_per_second(), 50);
    }

    #[test]
    fn fresh_clock_reports_zero_delta() {
        let time = Time::new();
        assert_eq!(time.delta_seconds(), 0.0);
        assert_eq!(time.frame_count(), 0);
        assert_eq!(time.frames_per_second(), 60);
    }

    #[test]
    fn invalid_timestep_keeps_previous() {
        let mut time = Time::new();
        time.set_timestep_seconds(0.0);
        time.set_timestep_seconds(f64::NAN);
        assert!((time.timestep_seconds() - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn explicit_advance_uses_given_delta() {
        let mut time = Time::new();
        time.advance(Duration::from_millis(250));
        time.advance(Duration::from_millis(500));
        assert!((time.delta_seconds() - 0.5).abs() < 1e-6);
        assert!((time.elapsed_seconds() - 0.75).abs() < 1e-6);
    }
}
