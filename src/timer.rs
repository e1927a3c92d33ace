use std::time::Duration;

/// Countdown bound to a challenge's time limit.
///
/// Driven from outside: the owner calls [`Countdown::tick`] with the
/// wall-clock delta since the previous tick. A limit of zero makes the timer
/// inert, it runs but never expires.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    limit: Duration,
    remaining: Duration,
    running: bool,
    expired: bool,
}

impl Countdown {
    pub fn new(limit_secs: u32) -> Self {
        let limit = Duration::from_secs(u64::from(limit_secs));
        Self {
            limit,
            remaining: limit,
            running: false,
            expired: false,
        }
    }

    pub fn start(&mut self, limit_secs: u32) {
        self.limit = Duration::from_secs(u64::from(limit_secs));
        self.remaining = self.limit;
        self.running = true;
        self.expired = false;
    }

    /// Freeze at the current remaining time
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self, limit_secs: u32) {
        self.stop();
        self.limit = Duration::from_secs(u64::from(limit_secs));
        self.remaining = self.limit;
        self.expired = false;
    }

    /// Returns true only on the tick that expires the countdown.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.running || self.is_inert() {
            return false;
        }

        self.remaining = self.remaining.saturating_sub(delta);
        if self.remaining.is_zero() {
            self.running = false;
            self.expired = true;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining.as_secs_f64()
    }

    /// Remaining seconds rounded to one decimal for display
    pub fn display_secs(&self) -> f64 {
        (self.remaining_secs() * 10.0).round() / 10.0
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// 1.0 when full, 0.0 when expired; inert timers stay full
    pub fn fraction_left(&self) -> f64 {
        if self.is_inert() {
            return 1.0;
        }
        (self.remaining.as_secs_f64() / self.limit.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn is_inert(&self) -> bool {
        self.limit.is_zero()
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(0)
    }
}
