/// Millisecond tick sources that drive the animation
use std::time::Instant;

/// A monotonically increasing millisecond counter
pub trait TickSource {
    fn ticks(&mut self) -> u32;
}

/// Wall-clock milliseconds since construction, wrapping like a 32-bit tick counter
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemClock {
    fn ticks(&mut self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

/// Synthetic clock for reproducible runs: each read returns the current
/// value and then advances it by `step` milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStepClock {
    now: u32,
    step: u32,
}

impl FixedStepClock {
    pub fn new(start: u32, step: u32) -> Self {
        Self { now: start, step }
    }

    /// The value the next read will return
    pub fn peek(&self) -> u32 {
        self.now
    }
}

impl TickSource for FixedStepClock {
    fn ticks(&mut self) -> u32 {
        let now = self.now;
        self.now = self.now.wrapping_add(self.step);
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_advances_after_read() {
        let mut clock = FixedStepClock::new(500, 1000);
        assert_eq!(clock.ticks(), 500);
        assert_eq!(clock.ticks(), 1500);
        assert_eq!(clock.peek(), 2500);
    }

    #[test]
    fn test_fixed_step_wraps() {
        let mut clock = FixedStepClock::new(u32::MAX, 2);
        assert_eq!(clock.ticks(), u32::MAX);
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let first = clock.ticks();
        let second = clock.ticks();
        assert!(second >= first);
    }
}
