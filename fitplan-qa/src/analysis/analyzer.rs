// Sequence Quality Analyzer
//
// Concept: Muscle-group proximity check over an ordered class sequence
// Synchronization: Pure function of its input; no shared state, no I/O
//
// Algorithm:
// 1. Validate every movement (name required; muscle data optional)
// 2. Normalize each movement's muscle groups (trim, de-duplicate, keep order)
// 3. For each adjacent pair, intersect the two sets; emit a finding when the
//    intersection is non-empty, with the ratio taken against the EARLIER
//    movement's muscle count
// 4. Build the muscle-group histogram over the whole sequence
// 5. Return a SequenceReport

use super::types::{
    DistributionEntry, OverlapFinding, OverlapTier, SequenceReport, UnmeasuredMovement,
};
use fitplan_common::{Movement, MuscleGroup, Result};
use std::collections::{HashMap, HashSet};

/// Sequence quality analyzer
///
/// Stateless: one instance may be shared freely between callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceQualityAnalyzer;

impl SequenceQualityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze one ordered sequence
    ///
    /// # Errors
    /// `Error::InvalidInput` when a movement has no name. Missing muscle
    /// data is not an error; it is listed in `movements_without_data`.
    pub fn analyze(&self, sequence: &[Movement]) -> Result<SequenceReport> {
        for (position, movement) in sequence.iter().enumerate() {
            movement.validate(position)?;
        }

        let normalized: Vec<Option<Vec<&str>>> = sequence
            .iter()
            .map(|m| m.muscle_groups.as_deref().map(MuscleGroup::normalized_names))
            .collect();

        let findings = pairwise_findings(sequence, &normalized);
        let distribution = distribution(&normalized);

        let movements_without_data = sequence
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.has_muscle_data())
            .map(|(position, m)| UnmeasuredMovement {
                position,
                name: m.name.clone(),
            })
            .collect::<Vec<_>>();

        let overuse_detected = findings.iter().any(|f| f.tier == OverlapTier::Overuse);

        tracing::debug!(
            "Sequence analysis: movements={}, findings={}, overuse={}, no_data={}",
            sequence.len(),
            findings.len(),
            overuse_detected,
            movements_without_data.len()
        );

        Ok(SequenceReport {
            total_movements: sequence.len(),
            overlap_detected: !findings.is_empty(),
            overuse_detected,
            findings,
            distribution,
            movements_without_data,
        })
    }
}

/// Overlap ratio in percent against the earlier movement's muscle count
///
/// An empty earlier set yields 0%.
pub fn overlap_percentage(shared: usize, current_count: usize) -> f64 {
    if current_count == 0 {
        return 0.0;
    }
    shared as f64 / current_count as f64 * 100.0
}

fn pairwise_findings(
    sequence: &[Movement],
    normalized: &[Option<Vec<&str>>],
) -> Vec<OverlapFinding> {
    let mut findings = Vec::new();

    for (position, pair) in normalized.windows(2).enumerate() {
        // No data on either side means nothing can be measured for the pair
        let (Some(current), Some(next)) = (&pair[0], &pair[1]) else {
            continue;
        };

        let next_set: HashSet<&str> = next.iter().copied().collect();
        let shared: Vec<String> = current
            .iter()
            .filter(|name| next_set.contains(*name))
            .map(|name| name.to_string())
            .collect();

        if shared.is_empty() {
            continue;
        }

        let percentage = overlap_percentage(shared.len(), current.len());
        let tier = OverlapTier::classify(percentage);
        let current_name = &sequence[position].name;
        let next_name = &sequence[position + 1].name;

        let fatigue_warning = (tier == OverlapTier::Overuse).then(|| {
            format!(
                "Fatigue risk: '{}' followed by '{}' loads the same muscles ({}) back to back",
                current_name,
                next_name,
                shared.join(", ")
            )
        });

        findings.push(OverlapFinding {
            position,
            current_movement: current_name.clone(),
            next_movement: next_name.clone(),
            shared_muscle_groups: shared,
            overlap_percentage: percentage,
            tier,
            fatigue_warning,
        });
    }

    findings
}

fn distribution(normalized: &[Option<Vec<&str>>]) -> Vec<DistributionEntry> {
    let total = normalized.len();
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for groups in normalized.iter().flatten() {
        for &name in groups {
            let count = counts.entry(name).or_insert_with(|| {
                order.push(name);
                0
            });
            *count += 1;
        }
    }

    let mut entries: Vec<DistributionEntry> = order
        .into_iter()
        .map(|name| {
            let count = counts[name];
            DistributionEntry {
                muscle_group: name.to_string(),
                count,
                percentage: count as f64 / total as f64 * 100.0,
            }
        })
        .collect();

    // Stable sort keeps first-seen order among equal counts
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}
