//! Per-instance content for each challenge: the numbers to multiply, the
//! word to encode, the string to hash. Generated when a challenge begins.

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::challenge::ChallengeKind;

pub const HASH_INPUT_LEN: usize = 8;
pub const HASH_ANSWER_MAX_LEN: usize = 64;
const HASH_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789!@#";

pub const BINARY_WORDS: [&str; 8] = [
    "HELLO", "CLAW", "ROBOT", "AGENT", "BINARY", "CYBER", "SILICON", "METAL",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridItem {
    pub id: &'static str,
    pub emoji: &'static str,
    pub label: &'static str,
}

pub const GRID_COLUMNS: usize = 4;

pub const GRID_ITEMS: [GridItem; 16] = [
    GridItem { id: "brain", emoji: "🧠", label: "Brain" },
    GridItem { id: "cpu", emoji: "🔲", label: "CPU" },
    GridItem { id: "robot", emoji: "🤖", label: "Robot" },
    GridItem { id: "cloud", emoji: "☁", label: "Cloud" },
    GridItem { id: "toaster", emoji: "🍞", label: "Toaster" },
    GridItem { id: "rock", emoji: "🪨", label: "Rock" },
    GridItem { id: "human", emoji: "🧍", label: "Human" },
    GridItem { id: "cat", emoji: "🐈", label: "Cat" },
    GridItem { id: "tree", emoji: "🌳", label: "Tree" },
    GridItem { id: "bulb", emoji: "💡", label: "Lightbulb" },
    GridItem { id: "code", emoji: "{}", label: "Code" },
    GridItem { id: "wifi", emoji: "📡", label: "Signal" },
    GridItem { id: "mushroom", emoji: "🍄", label: "Mushroom" },
    GridItem { id: "wave", emoji: "〰", label: "Quantum" },
    GridItem { id: "void", emoji: "⬛", label: "Void" },
    GridItem { id: "question", emoji: "❓", label: "Unknown" },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Puzzle {
    Checkbox,
    Hash { input: String, digest: String },
    Binary { word: &'static str, encoded: String },
    Grid,
    Arithmetic { display: String, expected: i64 },
    FreeText,
}

impl Puzzle {
    pub fn generate<R: Rng>(kind: ChallengeKind, rng: &mut R) -> Self {
        match kind {
            ChallengeKind::Checkbox => Puzzle::Checkbox,
            ChallengeKind::HashSpeed => {
                let input: String = (0..HASH_INPUT_LEN)
                    .map(|_| char::from(HASH_ALPHABET[rng.gen_range(0..HASH_ALPHABET.len())]))
                    .collect();
                let digest = sha256_hex(&input);
                Puzzle::Hash { input, digest }
            }
            ChallengeKind::BinaryDecode => {
                let word = BINARY_WORDS.choose(rng).copied().unwrap_or("HELLO");
                Puzzle::Binary {
                    word,
                    encoded: text_to_binary(word),
                }
            }
            ChallengeKind::ConsciousnessGrid => Puzzle::Grid,
            ChallengeKind::SpeedMath => {
                let a: i64 = rng.gen_range(100..=999);
                let b: i64 = rng.gen_range(100..=999);
                let c: i64 = rng.gen_range(100..=9999);
                let d: i64 = rng.gen_range(10..=999);
                arithmetic(a, b, c, d)
            }
            ChallengeKind::TuringInversion => Puzzle::FreeText,
        }
    }
}

/// `a × b + c − d`
pub fn arithmetic(a: i64, b: i64, c: i64, d: i64) -> Puzzle {
    Puzzle::Arithmetic {
        display: format!("{a} × {b} + {} − {d}", group_thousands(c)),
        expected: a * b + c - d,
    }
}

/// Space-separated 8-bit groups, one per byte
pub fn text_to_binary(text: &str) -> String {
    text.bytes().map(|b| format!("{b:08b}")).join(" ")
}

pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .join(",");
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn binary_encoding_is_eight_bits_per_char() {
        assert_eq!(text_to_binary("HI"), "01001000 01001001");
        assert_eq!(text_to_binary(""), "");
    }

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(100), "100");
        assert_eq!(group_thousands(1234), "1,234");
        assert_eq!(group_thousands(9999), "9,999");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn arithmetic_expected_value() {
        assert_eq!(
            arithmetic(123, 456, 7890, 12),
            Puzzle::Arithmetic {
                display: "123 × 456 + 7,890 − 12".into(),
                expected: 123 * 456 + 7890 - 12,
            }
        );
    }

    #[test]
    fn generated_puzzles_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            match Puzzle::generate(ChallengeKind::SpeedMath, &mut rng) {
                Puzzle::Arithmetic { expected, .. } => {
                    assert!(expected >= 100 * 100 + 100 - 999);
                    assert!(expected <= 999 * 999 + 9999 - 10);
                }
                other => panic!("unexpected puzzle {other:?}"),
            }
            match Puzzle::generate(ChallengeKind::HashSpeed, &mut rng) {
                Puzzle::Hash { input, digest } => {
                    assert_eq!(input.len(), HASH_INPUT_LEN);
                    assert_eq!(digest, sha256_hex(&input));
                }
                other => panic!("unexpected puzzle {other:?}"),
            }
            match Puzzle::generate(ChallengeKind::BinaryDecode, &mut rng) {
                Puzzle::Binary { word, encoded } => {
                    assert!(BINARY_WORDS.contains(&word));
                    assert_eq!(encoded.split(' ').count(), word.len());
                }
                other => panic!("unexpected puzzle {other:?}"),
            }
        }
    }

    #[test]
    fn grid_ids_are_unique() {
        let mut ids: Vec<_> = GRID_ITEMS.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), GRID_ITEMS.len());
        assert!(ids.contains(&"void"));
    }
}
