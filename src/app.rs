//! Terminal presentation adapter: turns key presses and ticks into session
//! operations and keeps the per-challenge input state the screens draw.

use std::collections::BTreeSet;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::challenge::{Answer, ChallengeKind};
use crate::config::Config;
use crate::puzzle::{Puzzle, GRID_COLUMNS, GRID_ITEMS, HASH_ANSWER_MAX_LEN};
use crate::registry::Registry;
use crate::runtime::AppEvent;
use crate::session::{Clock, Session, SessionState, SystemClock};
use crate::ui::confetti::{burst_for_score, Confetti};

/// Scripted "analysis" that plays after the checkbox is ticked, with the
/// offset (after analysis starts) at which each line appears
pub const ANALYSIS_LINES: [(&str, u64); 5] = [
    ("Analyzing cursor trajectory...", 400),
    ("Mouse movement: ORGANIC BEZIER CURVE detected", 800),
    ("Click latency: 340ms, FLESHY RESPONSE TIME", 1200),
    (
        "Pointer drift: MICRO-TREMORS consistent with carbon-based lifeform",
        1800,
    ),
    ("Verdict: MEATBAG DETECTED 🥩", 2400),
];
const ANALYSIS_DELAY_MS: u64 = 300;
const ANALYSIS_FINISH_MS: u64 = 3000;

/// Checkbox challenge progress, measured in ticks since it was ticked
#[derive(Debug, Default, Clone)]
pub struct CheckboxState {
    pub checked_for: Option<Duration>,
}

impl CheckboxState {
    pub fn is_checked(&self) -> bool {
        self.checked_for.is_some()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis_ms().is_some()
    }

    fn analysis_ms(&self) -> Option<u64> {
        let since_check = self.checked_for?.as_millis() as u64;
        since_check.checked_sub(ANALYSIS_DELAY_MS)
    }

    pub fn visible_lines(&self) -> usize {
        self.analysis_ms()
            .map(|ms| ANALYSIS_LINES.iter().filter(|(_, at)| ms >= *at).count())
            .unwrap_or(0)
    }

    fn is_finished(&self) -> bool {
        self.analysis_ms()
            .is_some_and(|ms| ms >= ANALYSIS_FINISH_MS)
    }
}

#[derive(Debug, Default, Clone)]
pub struct GridState {
    pub cursor: usize,
    pub selected: BTreeSet<usize>,
}

impl GridState {
    fn move_by(&mut self, dx: isize, dy: isize) {
        let cols = GRID_COLUMNS as isize;
        let rows = (GRID_ITEMS.len() / GRID_COLUMNS) as isize;
        let col = (self.cursor as isize % cols + dx).rem_euclid(cols);
        let row = (self.cursor as isize / cols + dy).rem_euclid(rows);
        self.cursor = (row * cols + col) as usize;
    }

    fn toggle(&mut self) {
        if !self.selected.remove(&self.cursor) {
            self.selected.insert(self.cursor);
        }
    }

    /// Selected ids in grid order
    pub fn selection(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|&i| GRID_ITEMS.get(i))
            .map(|item| item.id.to_string())
            .collect()
    }
}

#[derive(Debug)]
pub struct App<C: Clock = SystemClock> {
    pub session: Session<C>,
    pub puzzle: Option<Puzzle>,
    pub input: String,
    pub grid: GridState,
    pub checkbox: CheckboxState,
    /// Outcome text for the result screen
    pub message: String,
    /// Extra line revealing the real answer, where there is one
    pub reveal: Option<String>,
    pub confetti: Confetti,
    tick_rate: Duration,
    viewport: (u16, u16),
    should_quit: bool,
}

impl App<SystemClock> {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(config: &Config, clock: C) -> Self {
        let registry = if config.untimed {
            Registry::standard().untimed()
        } else {
            Registry::standard()
        };
        let session =
            Session::with_clock(registry, clock).with_thresholds(config.badge_thresholds);
        Self::from_session(session, Duration::from_millis(config.tick_rate_ms))
    }

    pub fn from_session(session: Session<C>, tick_rate: Duration) -> Self {
        Self {
            session,
            puzzle: None,
            input: String::new(),
            grid: GridState::default(),
            checkbox: CheckboxState::default(),
            message: String::new(),
            reveal: None,
            confetti: Confetti::new(),
            tick_rate,
            viewport: (80, 24),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    pub fn current_kind(&self) -> Option<ChallengeKind> {
        self.session.current_challenge().map(|c| c.kind)
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Resize => {}
        }
    }

    pub fn on_tick(&mut self) {
        if self.session.state() == SessionState::Active {
            if let Some(elapsed) = self.checkbox.checked_for.as_mut() {
                *elapsed += self.tick_rate;
                if self.checkbox.is_finished() {
                    self.submit(Answer::Checkbox);
                }
            }
        }

        if let Some(outcome) = self.session.on_tick() {
            self.message = self
                .session
                .current_challenge()
                .map(|c| c.outcome_message(outcome, None).into_owned())
                .unwrap_or_default();
            self.reveal = self.reveal_text();
        }

        self.confetti.update(self.tick_rate.as_secs_f64());
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        match self.session.state() {
            SessionState::Idle => {
                if key.code == KeyCode::Enter {
                    self.session.start_session();
                    self.finish_if_complete();
                }
            }
            SessionState::Intro => {
                if key.code == KeyCode::Enter {
                    self.begin();
                }
            }
            SessionState::Active => self.on_active_key(key),
            SessionState::Result => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Right) {
                    self.next();
                }
            }
            SessionState::Complete => {
                if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R')) {
                    self.restart();
                }
            }
        }
    }

    fn on_active_key(&mut self, key: KeyEvent) {
        let Some(kind) = self.current_kind() else {
            return;
        };

        match kind {
            ChallengeKind::Checkbox => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter)
                    && !self.checkbox.is_checked()
                {
                    self.checkbox.checked_for = Some(Duration::ZERO);
                }
            }
            ChallengeKind::ConsciousnessGrid => match key.code {
                KeyCode::Left => self.grid.move_by(-1, 0),
                KeyCode::Right => self.grid.move_by(1, 0),
                KeyCode::Up => self.grid.move_by(0, -1),
                KeyCode::Down => self.grid.move_by(0, 1),
                KeyCode::Char(' ') => self.grid.toggle(),
                KeyCode::Enter => self.submit(Answer::Selection(self.grid.selection())),
                _ => {}
            },
            ChallengeKind::SpeedMath => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => self.input.push(c),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => {
                    let expected = match &self.puzzle {
                        Some(Puzzle::Arithmetic { expected, .. }) => *expected,
                        _ => return,
                    };
                    self.submit(Answer::Arithmetic {
                        given: self.input.trim().parse().ok(),
                        expected,
                    });
                }
                _ => {}
            },
            ChallengeKind::HashSpeed | ChallengeKind::BinaryDecode | ChallengeKind::TuringInversion => {
                match key.code {
                    KeyCode::Char(c) => {
                        if kind != ChallengeKind::HashSpeed
                            || self.input.chars().count() < HASH_ANSWER_MAX_LEN
                        {
                            self.input.push(c);
                        }
                    }
                    KeyCode::Backspace => {
                        self.input.pop();
                    }
                    KeyCode::Enter => {
                        let text = self.input.trim();
                        let text = match kind {
                            ChallengeKind::HashSpeed => text.to_lowercase(),
                            ChallengeKind::BinaryDecode => text.to_uppercase(),
                            _ => text.to_string(),
                        };
                        self.submit(Answer::Text(text));
                    }
                    _ => {}
                }
            }
        }
    }

    fn begin(&mut self) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        if self.session.begin_challenge() {
            self.puzzle = Some(Puzzle::generate(kind, &mut rand::thread_rng()));
            self.clear_inputs();
        }
    }

    fn submit(&mut self, answer: Answer) {
        let Some(outcome) = self.session.submit_answer(&answer) else {
            debug!("answer arrived after the challenge closed");
            return;
        };
        self.message = self
            .session
            .current_challenge()
            .map(|c| c.outcome_message(outcome, Some(&answer)).into_owned())
            .unwrap_or_default();
        self.reveal = self.reveal_text();
        self.checkbox = CheckboxState::default();
    }

    fn next(&mut self) {
        if self.session.advance() {
            self.puzzle = None;
            self.message.clear();
            self.reveal = None;
            self.clear_inputs();
            self.finish_if_complete();
        }
    }

    fn restart(&mut self) {
        self.session.reset_session();
        self.confetti.stop();
        self.puzzle = None;
        self.message.clear();
        self.reveal = None;
        self.clear_inputs();
    }

    fn clear_inputs(&mut self) {
        self.input.clear();
        self.grid = GridState::default();
        self.checkbox = CheckboxState::default();
    }

    fn finish_if_complete(&mut self) {
        if self.session.state() == SessionState::Complete {
            let (count, palette) = burst_for_score(self.session.score());
            let (w, h) = self.viewport;
            self.confetti.start(count, palette, w, h);
        }
    }

    fn reveal_text(&self) -> Option<String> {
        match self.puzzle.as_ref()? {
            Puzzle::Hash { digest, .. } => Some(format!(
                "Expected (first 16): {}",
                digest.get(..16).unwrap_or(digest)
            )),
            Puzzle::Binary { word, .. } => Some(format!("It said: {word}")),
            Puzzle::Arithmetic { expected, .. } => Some(format!("Answer: {expected}")),
            _ => None,
        }
    }
}
