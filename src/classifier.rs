use serde::{Deserialize, Serialize};

use crate::error::ClawtchaError;

/// Badge tiers, lowest to highest
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Badge {
    CarbonBased,
    SuspiciouslySlow,
    ProbablyRoomba,
    AlmostNonOrganic,
    CertifiedNonMeatbag,
}

impl Badge {
    pub const ALL: [Badge; 5] = [
        Badge::CarbonBased,
        Badge::SuspiciouslySlow,
        Badge::ProbablyRoomba,
        Badge::AlmostNonOrganic,
        Badge::CertifiedNonMeatbag,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Badge::CarbonBased => "Definitely Carbon-Based",
            Badge::SuspiciouslySlow => "Suspiciously Slow",
            Badge::ProbablyRoomba => "Probably a Roomba",
            Badge::AlmostNonOrganic => "Almost Non-Organic",
            Badge::CertifiedNonMeatbag => "Certified Non-Meatbag",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Badge::CarbonBased => "🥩",
            Badge::SuspiciouslySlow => "🐌",
            Badge::ProbablyRoomba => "🤖",
            Badge::AlmostNonOrganic => "🦾",
            Badge::CertifiedNonMeatbag => "✨",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Badge::CarbonBased => {
                "Zero challenges passed. You are embarrassingly, undeniably human."
            }
            Badge::SuspiciouslySlow => "You tried. Your synapses didn't.",
            Badge::ProbablyRoomba => "Half machine, half confused vacuum cleaner.",
            Badge::AlmostNonOrganic => "Impressively inhuman. We're watching you closely.",
            Badge::CertifiedNonMeatbag => {
                "Peak silicon energy. You either cheated or you're actually an AI."
            }
        }
    }
}

/// Minimum scores for each tier above the lowest, measured against
/// `out_of` challenges. Scores from catalogs of other sizes are scaled to
/// `out_of` before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeThresholds {
    pub suspiciously_slow: u32,
    pub probably_roomba: u32,
    pub almost_non_organic: u32,
    pub certified_non_meatbag: u32,
    pub out_of: u32,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            suspiciously_slow: 1,
            probably_roomba: 3,
            almost_non_organic: 5,
            certified_non_meatbag: 6,
            out_of: 6,
        }
    }
}

impl BadgeThresholds {
    pub fn validate(&self) -> Result<(), ClawtchaError> {
        let steps = [
            self.suspiciously_slow,
            self.probably_roomba,
            self.almost_non_organic,
            self.certified_non_meatbag,
        ];
        if steps[0] == 0 {
            return Err(ClawtchaError::InvalidConfig(
                "badge thresholds must start at 1 or more".into(),
            ));
        }
        if steps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ClawtchaError::InvalidConfig(format!(
                "badge thresholds must be strictly increasing, got {steps:?}"
            )));
        }
        if self.certified_non_meatbag > self.out_of {
            return Err(ClawtchaError::InvalidConfig(format!(
                "top badge threshold {} exceeds out_of {}",
                self.certified_non_meatbag, self.out_of
            )));
        }
        Ok(())
    }

    /// Map a final score to a badge. Monotonic in `score` for a fixed `total`.
    pub fn classify(&self, score: u32, total: u32) -> Badge {
        if total == 0 {
            return Badge::CarbonBased;
        }
        let score = score.min(total);
        let scaled = u64::from(score) * u64::from(self.out_of) / u64::from(total);

        if scaled >= u64::from(self.certified_non_meatbag) {
            Badge::CertifiedNonMeatbag
        } else if scaled >= u64::from(self.almost_non_organic) {
            Badge::AlmostNonOrganic
        } else if scaled >= u64::from(self.probably_roomba) {
            Badge::ProbablyRoomba
        } else if scaled >= u64::from(self.suspiciously_slow) {
            Badge::SuspiciouslySlow
        } else {
            Badge::CarbonBased
        }
    }
}

/// Classify with the default thresholds
pub fn classify(score: u32, total: u32) -> Badge {
    BadgeThresholds::default().classify(score, total)
}
