// End-to-end runs of the session state machine against the standard
// catalog, driven by a manual clock so timing is exact.

use std::time::Duration;

use assert_matches::assert_matches;
use clawtcha::challenge::{
    Answer, ChallengeDefinition, ChallengeKind, Outcome, Verdict,
};
use clawtcha::classifier::{classify, Badge};
use clawtcha::registry::Registry;
use clawtcha::session::{ManualClock, Session, SessionState};

fn standard_session() -> (Session<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (Session::with_clock(Registry::standard(), clock.clone()), clock)
}

/// Drive the current challenge to a result with `answer` after `after`
fn answer_current(
    s: &mut Session<ManualClock>,
    clock: &ManualClock,
    answer: Answer,
    after: Duration,
) -> Option<Outcome> {
    assert_eq!(s.state(), SessionState::Intro);
    assert!(s.begin_challenge());
    clock.advance(after);
    s.submit_answer(&answer)
}

#[test]
fn passing_hash_and_math_only_is_suspiciously_slow() {
    let (mut s, clock) = standard_session();
    assert!(s.start_session());

    let answers = [
        Answer::Checkbox,
        Answer::Text("0123456789abcdef0123".into()),
        Answer::Text("HELLO".into()),
        Answer::Selection(vec!["brain".into()]),
        Answer::Arithmetic {
            given: Some(56_000),
            expected: 56_000,
        },
        Answer::Text("I am a toaster".into()),
    ];
    let mut outcomes = Vec::new();
    for answer in answers {
        outcomes.push(answer_current(&mut s, &clock, answer, Duration::from_millis(900)));
        assert!(s.advance());
    }

    assert_eq!(
        outcomes,
        vec![
            Some(Outcome::Fail),
            Some(Outcome::Pass),
            Some(Outcome::Fail),
            Some(Outcome::Fail),
            Some(Outcome::Pass),
            Some(Outcome::Fail),
        ]
    );
    assert_eq!(s.state(), SessionState::Complete);
    assert_eq!(s.score(), 2);
    assert_eq!(s.results().len(), 6);
    assert_eq!(s.badge(), Some(Badge::SuspiciouslySlow));
}

fn pass_anything_but_checkbox(answer: &Answer, _elapsed_ms: u64) -> Verdict {
    match answer {
        Answer::Checkbox => Verdict::Fail,
        _ => Verdict::Pass,
    }
}

#[test]
fn passing_everything_earns_the_top_badge() {
    let ids = ["one", "two", "three", "four", "five", "six"];
    let registry = Registry::new(
        ids.iter()
            .map(|&id| ChallengeDefinition {
                id,
                title: id,
                description: "",
                time_limit_secs: 10,
                kind: ChallengeKind::TuringInversion,
                rule: pass_anything_but_checkbox,
                pass_message: "beep",
                fail_message: "boop",
            })
            .collect(),
    );
    let clock = ManualClock::new();
    let mut s = Session::with_clock(registry, clock.clone());
    s.start_session();

    let mut last_score = 0;
    for _ in 0..6 {
        let outcome = answer_current(&mut s, &clock, Answer::Text("ok".into()), Duration::from_millis(100));
        assert_eq!(outcome, Some(Outcome::Pass));
        assert!(s.score() >= last_score);
        last_score = s.score();
        s.advance();
    }

    assert_eq!(s.score(), 6);
    assert_eq!(s.badge(), Some(Badge::CertifiedNonMeatbag));
    assert_eq!(s.summary().map(|sum| sum.total_elapsed_ms), Some(600));
}

#[test]
fn silent_hash_challenge_times_out_at_five_seconds() {
    let (mut s, clock) = standard_session();
    s.start_session();
    answer_current(&mut s, &clock, Answer::Checkbox, Duration::ZERO);
    s.advance();

    assert!(s.begin_challenge());
    assert_eq!(s.current_challenge().map(|c| c.id), Some("sha-256"));

    let mut timeouts = 0;
    for _ in 0..80 {
        clock.advance(Duration::from_millis(100));
        if s.on_tick().is_some() {
            timeouts += 1;
        }
    }

    assert_eq!(timeouts, 1);
    assert_eq!(s.state(), SessionState::Result);
    let entry = &s.results()[1];
    assert_eq!(entry.challenge_id, "sha-256");
    assert_eq!(entry.outcome, Outcome::Timeout);
    assert_eq!(entry.elapsed_ms, 5000);
    assert!(s.timer().is_expired());
    assert_eq!(s.timer().remaining(), Duration::ZERO);
}

#[test]
fn untimed_checkbox_only_ends_on_submission() {
    let (mut s, clock) = standard_session();
    s.start_session();
    s.begin_challenge();

    for _ in 0..120 {
        clock.advance(Duration::from_secs(5));
        assert_eq!(s.on_tick(), None);
    }
    assert!(s.results().is_empty());
    assert_eq!(s.state(), SessionState::Active);

    assert_eq!(s.submit_answer(&Answer::Checkbox), Some(Outcome::Fail));
    assert_eq!(s.results()[0].elapsed_ms, 600_000);
}

#[test]
fn first_of_submission_and_timeout_wins() {
    // timeout first
    let (mut s, clock) = standard_session();
    s.start_session();
    answer_current(&mut s, &clock, Answer::Checkbox, Duration::ZERO);
    s.advance();
    s.begin_challenge();
    clock.advance(Duration::from_secs(5));
    assert_eq!(s.on_tick(), Some(Outcome::Timeout));
    assert_eq!(s.submit_answer(&Answer::Text("a".repeat(64))), None);
    assert_eq!(s.results().len(), 2);

    // submission first
    let (mut s, clock) = standard_session();
    s.start_session();
    answer_current(&mut s, &clock, Answer::Checkbox, Duration::ZERO);
    s.advance();
    s.begin_challenge();
    clock.advance(Duration::from_millis(4_950));
    assert_matches!(s.submit_answer(&Answer::Text("x".into())), Some(Outcome::Fail));
    clock.advance(Duration::from_millis(100));
    assert_eq!(s.on_tick(), None);
    assert_eq!(s.results().len(), 2);
    assert_eq!(s.results()[1].outcome, Outcome::Fail);
}

#[test]
fn double_submission_appends_one_entry() {
    let (mut s, _clock) = standard_session();
    s.start_session();
    s.begin_challenge();
    assert!(s.submit_answer(&Answer::Checkbox).is_some());
    assert!(s.submit_answer(&Answer::Checkbox).is_none());
    assert_eq!(s.results().len(), 1);
}

#[test]
fn untimed_registry_never_times_out() {
    let clock = ManualClock::new();
    let mut s = Session::with_clock(Registry::standard().untimed(), clock.clone());
    s.start_session();
    while s.state() != SessionState::Complete {
        s.begin_challenge();
        clock.advance(Duration::from_secs(60));
        assert_eq!(s.on_tick(), None);
        s.submit_answer(&Answer::Checkbox);
        s.advance();
    }
    assert!(s
        .results()
        .iter()
        .all(|r| r.outcome != Outcome::Timeout));
}

#[test]
fn classifier_is_monotonic_for_six() {
    assert!(classify(0, 6) < classify(2, 6));
    assert!(classify(2, 6) <= classify(4, 6));
    assert!(classify(4, 6) < classify(5, 6));
    assert!(classify(5, 6) < classify(6, 6));
    for s in 0..6 {
        assert!(classify(s, 6) <= classify(s + 1, 6));
    }
}

#[test]
fn reset_mid_challenge_leaves_no_live_timer() {
    let (mut s, clock) = standard_session();
    s.start_session();
    answer_current(&mut s, &clock, Answer::Checkbox, Duration::ZERO);
    s.advance();
    s.begin_challenge();
    clock.advance(Duration::from_secs(2));
    s.on_tick();

    s.reset_session();
    clock.advance(Duration::from_secs(10));
    assert_eq!(s.on_tick(), None);
    assert_eq!(s.state(), SessionState::Idle);
    assert!(s.results().is_empty());
    assert!(!s.timer().is_running());
    assert!(s.current_challenge().is_none());
}
