//! Muscle-group proximity analysis for class sequences

pub mod analyzer;
pub mod types;

pub use analyzer::{overlap_percentage, SequenceQualityAnalyzer};
pub use types::{
    DistributionEntry, OverlapFinding, OverlapTier, SequenceReport, UnmeasuredMovement,
    CAUTION_THRESHOLD, OVERUSE_THRESHOLD,
};
