use crate::challenge::{catalog::standard_challenges, ChallengeDefinition};

/// Ordered, read-only catalog of challenges
#[derive(Debug, Clone)]
pub struct Registry {
    challenges: Vec<ChallengeDefinition>,
}

impl Registry {
    pub fn new(challenges: Vec<ChallengeDefinition>) -> Self {
        Self { challenges }
    }

    /// The catalog played by default
    pub fn standard() -> Self {
        Self::new(standard_challenges())
    }

    /// Out of range means "no more challenges"
    pub fn get(&self, index: usize) -> Option<&ChallengeDefinition> {
        self.challenges.get(index)
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChallengeDefinition> {
        self.challenges.iter()
    }

    /// Same catalog with every limit set to 0, for practice runs
    pub fn untimed(mut self) -> Self {
        for c in &mut self.challenges {
            c.time_limit_secs = 0;
        }
        self
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_has_six() {
        let registry = Registry::standard();
        assert_eq!(registry.len(), 6);
        assert!(!registry.is_empty());
        assert_eq!(registry.get(0).map(|c| c.id), Some("recaptcha-parody"));
        assert_eq!(registry.get(5).map(|c| c.id), Some("turing-inversion"));
    }

    #[test]
    fn out_of_range_is_none() {
        let registry = Registry::standard();
        assert!(registry.get(6).is_none());
        assert!(Registry::new(vec![]).get(0).is_none());
    }

    #[test]
    fn untimed_clears_every_limit() {
        let registry = Registry::standard().untimed();
        assert!(registry.iter().all(|c| !c.is_timed()));
        assert_eq!(registry.len(), 6);
    }
}
