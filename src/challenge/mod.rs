pub mod catalog;
pub mod sentience;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Message shown when a challenge times out and has no fail text of its own
pub const DEFAULT_TIMEOUT_MESSAGE: &str =
    "Time's up. A calculator from 1975 is embarrassed for you.";

/// What a user handed in for a challenge.
///
/// Each challenge interprets only the shape it expects; anything else is a
/// fail, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The "I am not a human" checkbox was ticked
    Checkbox,
    Text(String),
    Selection(Vec<String>),
    /// A parsed (or unparsable) number together with the value it should equal
    Arithmetic { given: Option<i64>, expected: i64 },
}

/// Result of running an evaluation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Recorded result of a challenge
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Timeout,
}

impl From<Verdict> for Outcome {
    fn from(v: Verdict) -> Self {
        match v {
            Verdict::Pass => Outcome::Pass,
            Verdict::Fail => Outcome::Fail,
        }
    }
}

/// Pure evaluation rule: `(answer, elapsed_ms) -> verdict`
pub type EvaluationRule = fn(&Answer, u64) -> Verdict;

/// Which kind of input a challenge asks for. The presentation layer uses this
/// to pick a puzzle and an input widget; the session never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    Checkbox,
    HashSpeed,
    BinaryDecode,
    ConsciousnessGrid,
    SpeedMath,
    TuringInversion,
}

/// Immutable descriptor of one challenge in the registry
#[derive(Debug, Clone)]
pub struct ChallengeDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Seconds; 0 means untimed
    pub time_limit_secs: u32,
    pub kind: ChallengeKind,
    pub rule: EvaluationRule,
    pub pass_message: &'static str,
    pub fail_message: &'static str,
}

impl ChallengeDefinition {
    pub fn evaluate(&self, answer: &Answer, elapsed_ms: u64) -> Verdict {
        (self.rule)(answer, elapsed_ms)
    }

    pub fn is_timed(&self) -> bool {
        self.time_limit_secs > 0
    }

    pub fn time_limit_ms(&self) -> u64 {
        u64::from(self.time_limit_secs) * 1000
    }

    /// Text to show for an outcome. The Turing inversion builds its fail
    /// message from what was written.
    pub fn outcome_message(&self, outcome: Outcome, answer: Option<&Answer>) -> Cow<'static, str> {
        match outcome {
            Outcome::Pass => Cow::Borrowed(self.pass_message),
            Outcome::Fail if self.kind == ChallengeKind::TuringInversion => {
                let text = match answer {
                    Some(Answer::Text(t)) => t.as_str(),
                    _ => "",
                };
                sentience::analyze(text)
            }
            Outcome::Fail => Cow::Borrowed(self.fail_message),
            Outcome::Timeout if self.fail_message.is_empty() => {
                Cow::Borrowed(DEFAULT_TIMEOUT_MESSAGE)
            }
            Outcome::Timeout => Cow::Borrowed(self.fail_message),
        }
    }
}
