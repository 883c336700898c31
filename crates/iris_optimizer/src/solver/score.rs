use std::{
    cmp::Ordering,
    iter,
    ops::{Add, AddAssign, Sub},
};

use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::Serialize;

use super::score_level::ScoreLevel;

/// Tolerance under which a score difference is treated as noise.
pub const SCORE_EPSILON: f64 = 1e-6;

/// Lexicographic score, lower is better: any hard violation outweighs every soft cost.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Score {
    pub hard_score: f64,
    pub soft_score: f64,
}

impl Score {
    pub const MAX: Score = Score {
        hard_score: f64::MAX,
        soft_score: f64::MAX,
    };

    pub const ZERO: Score = Score {
        hard_score: 0.0,
        soft_score: 0.0,
    };

    pub fn new(hard_score: f64, soft_score: f64) -> Self {
        Score {
            hard_score,
            soft_score,
        }
    }

    pub fn of(level: ScoreLevel, score: f64) -> Self {
        match level {
            ScoreLevel::Hard => Score::hard(score),
            ScoreLevel::Soft => Score::soft(score),
        }
    }

    pub fn hard(hard_score: f64) -> Self {
        Score {
            hard_score,
            soft_score: 0.0,
        }
    }

    pub fn soft(soft_score: f64) -> Self {
        Score {
            hard_score: 0.0,
            soft_score,
        }
    }

    pub fn zero() -> Self {
        Score::ZERO
    }

    pub fn is_failure(&self) -> bool {
        self.hard_score > SCORE_EPSILON
    }

    /// True when a score delta strictly improves, ignoring float noise.
    pub fn is_improvement(&self) -> bool {
        if self.hard_score < -SCORE_EPSILON {
            true
        } else if self.hard_score > SCORE_EPSILON {
            false
        } else {
            self.soft_score < -SCORE_EPSILON
        }
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard_score
            .total_cmp(&other.hard_score)
            .then_with(|| self.soft_score.total_cmp(&other.soft_score))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, score| acc + score)
    }
}

impl Add<Score> for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score + other.hard_score,
            soft_score: self.soft_score + other.soft_score,
        }
    }
}

impl AddAssign<Score> for Score {
    fn add_assign(&mut self, other: Self) {
        self.hard_score += other.hard_score;
        self.soft_score += other.soft_score;
    }
}

impl Sub<Score> for Score {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score - other.hard_score,
            soft_score: self.soft_score - other.soft_score,
        }
    }
}

/// Score broken down per constraint name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreAnalysis {
    pub scores: FxHashMap<&'static str, Score>,
}

impl ScoreAnalysis {
    pub fn total_score(&self) -> Score {
        self.scores.values().copied().sum()
    }

    pub fn score(&self, constraint_name: &str) -> Score {
        self.scores
            .get(constraint_name)
            .copied()
            .unwrap_or(Score::ZERO)
    }
}
