//! The challenge session state machine.
//!
//! ```text
//! Idle -> Intro -> Active -> Result -> (Intro | Complete)
//!                    |                        |
//!                    +-- timer expiry --------+  (Active -> Result, outcome Timeout)
//! ```
//!
//! Every operation is a no-op when called in the wrong state, so late key
//! presses and ticks racing a submission can never corrupt a run.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::challenge::{Answer, ChallengeDefinition, Outcome};
use crate::classifier::{Badge, BadgeThresholds};
use crate::registry::Registry;
use crate::timer::Countdown;

/// Source of "now" for elapsed-time measurement
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    Idle,
    Intro,
    Active,
    Result,
    Complete,
}

/// One finished challenge. Appended once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub challenge_id: &'static str,
    pub outcome: Outcome,
    pub elapsed_ms: u64,
}

/// Final numbers for a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub score: u32,
    pub total: u32,
    pub badge: Badge,
    pub total_elapsed_ms: u64,
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    registry: Registry,
    thresholds: BadgeThresholds,
    clock: C,
    state: SessionState,
    current_index: usize,
    results: Vec<ResultEntry>,
    last_outcome: Option<Outcome>,
    started_at: Option<Instant>,
    last_tick: Option<Instant>,
    timer: Countdown,
}

impl Session<SystemClock> {
    pub fn new(registry: Registry) -> Self {
        Self::with_clock(registry, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(registry: Registry, clock: C) -> Self {
        Self {
            registry,
            thresholds: BadgeThresholds::default(),
            clock,
            state: SessionState::Idle,
            current_index: 0,
            results: Vec::new(),
            last_outcome: None,
            started_at: None,
            last_tick: None,
            timer: Countdown::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: BadgeThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    // queries

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// `None` before the run starts and once it is complete
    pub fn current_challenge(&self) -> Option<&ChallengeDefinition> {
        match self.state {
            SessionState::Idle | SessionState::Complete => None,
            _ => self.registry.get(self.current_index),
        }
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn results(&self) -> &[ResultEntry] {
        &self.results
    }

    pub fn score(&self) -> u32 {
        self.results
            .iter()
            .filter(|r| r.outcome == Outcome::Pass)
            .count() as u32
    }

    pub fn total(&self) -> u32 {
        self.registry.len() as u32
    }

    pub fn badge(&self) -> Option<Badge> {
        (self.state == SessionState::Complete)
            .then(|| self.thresholds.classify(self.score(), self.total()))
    }

    pub fn summary(&self) -> Option<Summary> {
        let badge = self.badge()?;
        Some(Summary {
            score: self.score(),
            total: self.total(),
            badge,
            total_elapsed_ms: self.results.iter().map(|r| r.elapsed_ms).sum(),
            outcomes: self.results.iter().map(|r| r.outcome).collect(),
        })
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Milliseconds since the active challenge began
    pub fn elapsed_ms(&self) -> Option<u64> {
        let started = self.started_at?;
        Some(self.clock.now().saturating_duration_since(started).as_millis() as u64)
    }

    /// Whether an answer or timeout for the current challenge would be
    /// accepted. Closes as soon as a result is recorded for this index.
    pub fn accepting(&self) -> bool {
        self.state == SessionState::Active && self.results.len() == self.current_index
    }

    // transitions

    pub fn start_session(&mut self) -> bool {
        if self.state != SessionState::Idle {
            debug!(state = %self.state, "start_session ignored");
            return false;
        }
        self.clear_run();
        if self.registry.is_empty() {
            info!("empty registry, session complete immediately");
            self.state = SessionState::Complete;
        } else {
            info!(total = self.registry.len(), "session started");
            self.state = SessionState::Intro;
        }
        true
    }

    pub fn begin_challenge(&mut self) -> bool {
        if self.state != SessionState::Intro {
            debug!(state = %self.state, "begin_challenge ignored");
            return false;
        }
        let Some(limit) = self
            .registry
            .get(self.current_index)
            .map(|c| c.time_limit_secs)
        else {
            return false;
        };

        let now = self.clock.now();
        self.started_at = Some(now);
        self.last_tick = Some(now);
        self.timer.start(limit);
        self.state = SessionState::Active;
        debug!(index = self.current_index, limit, "challenge active");
        true
    }

    /// Evaluate an answer for the active challenge. Returns `None` when the
    /// answer is not accepted (wrong state, or a result already recorded).
    pub fn submit_answer(&mut self, answer: &Answer) -> Option<Outcome> {
        if !self.accepting() {
            debug!(state = %self.state, index = self.current_index, "submit_answer ignored");
            return None;
        }
        let elapsed_ms = self.elapsed_ms().unwrap_or_default();
        let challenge = self.registry.get(self.current_index)?;
        let outcome = Outcome::from(challenge.evaluate(answer, elapsed_ms));
        self.timer.stop();
        self.record(outcome, elapsed_ms);
        Some(outcome)
    }

    /// Feed the wall-clock time since the previous tick into the timer.
    /// Returns `Some(Outcome::Timeout)` on the tick that times the
    /// challenge out.
    pub fn on_tick(&mut self) -> Option<Outcome> {
        if self.state != SessionState::Active {
            return None;
        }
        let now = self.clock.now();
        let delta = self
            .last_tick
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or_default();
        self.last_tick = Some(now);

        if !self.timer.tick(delta) || !self.accepting() {
            return None;
        }
        let elapsed_ms = self.registry.get(self.current_index)?.time_limit_ms();
        self.record(Outcome::Timeout, elapsed_ms);
        Some(Outcome::Timeout)
    }

    pub fn advance(&mut self) -> bool {
        if self.state != SessionState::Result {
            debug!(state = %self.state, "advance ignored");
            return false;
        }
        self.timer.reset(0);
        self.started_at = None;
        self.last_tick = None;

        if self.current_index + 1 >= self.registry.len() {
            self.state = SessionState::Complete;
            info!(
                score = self.score(),
                total = self.total(),
                badge = %self.thresholds.classify(self.score(), self.total()),
                "session complete"
            );
        } else {
            self.current_index += 1;
            self.last_outcome = None;
            self.state = SessionState::Intro;
        }
        true
    }

    /// Back to idle from anywhere, dropping the run
    pub fn reset_session(&mut self) {
        self.clear_run();
        self.state = SessionState::Idle;
        debug!("session reset");
    }

    fn clear_run(&mut self) {
        self.timer.reset(0);
        self.current_index = 0;
        self.results.clear();
        self.last_outcome = None;
        self.started_at = None;
        self.last_tick = None;
    }

    fn record(&mut self, outcome: Outcome, elapsed_ms: u64) {
        let Some(challenge) = self.registry.get(self.current_index) else {
            return;
        };
        info!(challenge = challenge.id, %outcome, elapsed_ms, "result recorded");
        self.results.push(ResultEntry {
            challenge_id: challenge.id,
            outcome,
            elapsed_ms,
        });
        self.last_outcome = Some(outcome);
        self.state = SessionState::Result;
    }
}
