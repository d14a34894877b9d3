use crate::model::AircraftRecord;

/// What a policy suggests for the opposing force.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub count: usize,
    pub difficulty: String,
}

/// Decides the recommended size and difficulty of the opposing force.
///
/// The shipped [`AdditivePolicy`] only looks at the source head count; a
/// capability-aware policy can be plugged in without touching the generator.
pub trait ForcePolicy {
    fn recommend(&self, source: &[AircraftRecord]) -> Recommendation;
}

/// `count = source + margin`, fixed difficulty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditivePolicy {
    pub margin: usize,
    pub difficulty: String,
}

impl AdditivePolicy {
    pub const DEFAULT_MARGIN: usize = 2;
    pub const DEFAULT_DIFFICULTY: &'static str = "medium";

    pub fn new(margin: usize, difficulty: impl Into<String>) -> Self {
        Self {
            margin,
            difficulty: difficulty.into(),
        }
    }
}

impl Default for AdditivePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MARGIN, Self::DEFAULT_DIFFICULTY)
    }
}

impl ForcePolicy for AdditivePolicy {
    fn recommend(&self, source: &[AircraftRecord]) -> Recommendation {
        Recommendation {
            count: source.len() + self.margin,
            difficulty: self.difficulty.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_policy_adds_margin_to_head_count() {
        let source = vec![AircraftRecord::default(); 3];
        let rec = AdditivePolicy::default().recommend(&source);
        assert_eq!(rec.count, 5);
        assert_eq!(rec.difficulty, "medium");

        let rec = AdditivePolicy::new(0, "hard").recommend(&source);
        assert_eq!(rec.count, 3);
        assert_eq!(rec.difficulty, "hard");
    }
}
