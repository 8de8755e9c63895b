// Sequence quality report types
//
// All values here are derived per analysis call and never persisted.

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of the caution tier, in percent
pub const CAUTION_THRESHOLD: f64 = 50.0;

/// Lower bound (inclusive) of the overuse tier, in percent
pub const OVERUSE_THRESHOLD: f64 = 80.0;

/// Classification of one consecutive-overlap ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapTier {
    /// Below 50%
    Acceptable,
    /// 50% up to (not including) 80%
    Caution,
    /// 80% and above; fatigue risk
    Overuse,
}

impl OverlapTier {
    pub fn classify(overlap_percentage: f64) -> Self {
        if overlap_percentage >= OVERUSE_THRESHOLD {
            Self::Overuse
        } else if overlap_percentage >= CAUTION_THRESHOLD {
            Self::Caution
        } else {
            Self::Acceptable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Acceptable => "acceptable",
            Self::Caution => "caution",
            Self::Overuse => "overuse warning",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::Acceptable => "✅",
            Self::Caution => "⚠️",
            Self::Overuse => "❌",
        }
    }
}

/// Muscle groups shared by two adjacent movements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapFinding {
    /// Index of the earlier movement in the sequence
    pub position: usize,
    pub current_movement: String,
    pub next_movement: String,
    /// Ordered as they appear in the earlier movement
    pub shared_muscle_groups: Vec<String>,
    /// Shared count over the earlier movement's muscle count, times 100
    pub overlap_percentage: f64,
    pub tier: OverlapTier,
    /// Present for overuse findings only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatigue_warning: Option<String>,
}

/// One histogram bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub muscle_group: String,
    /// Number of movements targeting this group
    pub count: usize,
    /// `count / total_movements * 100`
    pub percentage: f64,
}

/// A movement whose muscle groups are unknown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmeasuredMovement {
    pub position: usize,
    pub name: String,
}

/// Result of analyzing one sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceReport {
    pub total_movements: usize,
    /// Overlapping adjacent pairs only, in sequence order
    pub findings: Vec<OverlapFinding>,
    /// False when no adjacent pair shares a muscle group
    pub overlap_detected: bool,
    /// True when any finding reached the overuse tier
    pub overuse_detected: bool,
    /// Sorted by descending count, ties in first-seen order
    pub distribution: Vec<DistributionEntry>,
    /// Reported as "No data", never folded into "no overlap"
    pub movements_without_data: Vec<UnmeasuredMovement>,
}

impl SequenceReport {
    /// Findings in the given tier
    pub fn findings_in(&self, tier: OverlapTier) -> impl Iterator<Item = &OverlapFinding> {
        self.findings.iter().filter(move |f| f.tier == tier)
    }

    /// Overall verdict: the worst tier among the findings
    pub fn worst_tier(&self) -> Option<OverlapTier> {
        self.findings.iter().map(|f| f.tier).max()
    }
}
