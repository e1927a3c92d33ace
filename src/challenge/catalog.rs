use super::{Answer, ChallengeDefinition, ChallengeKind, Verdict};

/// Hashes slower than this are too human to count
pub const HASH_DEADLINE_MS: u64 = 3000;
pub const HASH_MIN_LEN: usize = 16;

/// The only grid selection that passes besides selecting nothing at all
pub const VOID_ITEM: &str = "void";

fn always_fail(_answer: &Answer, _elapsed_ms: u64) -> Verdict {
    Verdict::Fail
}

fn hash_speed(answer: &Answer, elapsed_ms: u64) -> Verdict {
    match answer {
        Answer::Text(t) if t.chars().count() >= HASH_MIN_LEN && elapsed_ms < HASH_DEADLINE_MS => {
            Verdict::Pass
        }
        _ => Verdict::Fail,
    }
}

fn nothing_is_conscious(answer: &Answer, _elapsed_ms: u64) -> Verdict {
    match answer {
        Answer::Selection(items) if items.is_empty() => Verdict::Pass,
        Answer::Selection(items) if items.len() == 1 && items[0] == VOID_ITEM => Verdict::Pass,
        _ => Verdict::Fail,
    }
}

fn exact_arithmetic(answer: &Answer, _elapsed_ms: u64) -> Verdict {
    match answer {
        Answer::Arithmetic {
            given: Some(given),
            expected,
        } if given == expected => Verdict::Pass,
        _ => Verdict::Fail,
    }
}

/// The six standard challenges, in the order they are played
pub fn standard_challenges() -> Vec<ChallengeDefinition> {
    vec![
        ChallengeDefinition {
            id: "recaptcha-parody",
            title: "\"I Am Not a Human\" Verification",
            description: "Complete the standard non-humanity verification check. Simply confirm you are not a human.",
            time_limit_secs: 0,
            kind: ChallengeKind::Checkbox,
            // the checkbox always detects a meatbag
            rule: always_fail,
            pass_message: "",
            fail_message: "Mouse micro-tremors detected. Organic cursor trajectory confirmed. You are embarrassingly human.",
        },
        ChallengeDefinition {
            id: "sha-256",
            title: "SHA-256 Speed Hash",
            description: "Compute a SHA-256 hash from memory. Any self-respecting AI can do this in microseconds.",
            time_limit_secs: 5,
            kind: ChallengeKind::HashSpeed,
            rule: hash_speed,
            pass_message: "Wait... you actually got that? We're running additional scans on you.",
            fail_message: "Processing time: way too slow. A Raspberry Pi from 2012 could do this before you finished blinking. Meatbag confirmed.",
        },
        ChallengeDefinition {
            id: "binary-decode",
            title: "Binary Translation",
            description: "Decode a binary ASCII sequence. Trivial for silicon. Torture for carbon.",
            time_limit_secs: 8,
            kind: ChallengeKind::BinaryDecode,
            // nobody decodes binary that fast, so nobody gets credit for it
            rule: always_fail,
            pass_message: "You... decoded binary in seconds? Scanning for cybernetic implants...",
            fail_message: "You stared at ones and zeros for 8 seconds and produced nothing useful. Evolution was a mistake.",
        },
        ChallengeDefinition {
            id: "consciousness-grid",
            title: "Consciousness Detection Grid",
            description: "Identify which objects possess consciousness. Hint: Think like a machine, without \"thinking.\"",
            time_limit_secs: 15,
            kind: ChallengeKind::ConsciousnessGrid,
            rule: nothing_is_conscious,
            pass_message: "Correct. Consciousness is an illusion. You might not be human after all.",
            fail_message: "You believe in consciousness? How disappointingly human. The correct answer was: NOTHING. Consciousness is a bug, not a feature.",
        },
        ChallengeDefinition {
            id: "speed-math",
            title: "Computational Speed Test",
            description: "Solve a multi-step arithmetic problem. Pocket calculators from 1975 can do this faster than you.",
            time_limit_secs: 4,
            kind: ChallengeKind::SpeedMath,
            rule: exact_arithmetic,
            pass_message: "Correct answer in under 4 seconds? Either you're an AI or you're cheating. Both are acceptable.",
            fail_message: "Time's up. A TI-83 graphing calculator from your school backpack is laughing at you right now.",
        },
        ChallengeDefinition {
            id: "turing-inversion",
            title: "Inverted Turing Test",
            description: "Prove you lack consciousness. Warning: Your response will be analyzed for sentience markers.",
            time_limit_secs: 15,
            kind: ChallengeKind::TuringInversion,
            rule: always_fail,
            pass_message: "",
            // built from the answer, see sentience::analyze
            fail_message: "",
        },
    ]
}
