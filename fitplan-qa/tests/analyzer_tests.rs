//! Integration tests for the sequence quality analyzer
//!
//! Covers the reference scenarios (overuse, disjoint, caution, no data) and
//! the general properties every report must satisfy.

use fitplan_common::models::parse_sequence;
use fitplan_common::{Error, Movement};
use fitplan_qa::analysis::{OverlapTier, SequenceQualityAnalyzer, SequenceReport};
use serde_json::json;

fn analyze(sequence: &[Movement]) -> SequenceReport {
    SequenceQualityAnalyzer::new()
        .analyze(sequence)
        .expect("analysis should succeed")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_scenario_same_muscle_back_to_back_is_overuse() {
    let report = analyze(&[
        Movement::new("Roll-up", &["Core"]),
        Movement::new("Hundred", &["Core"]),
    ]);

    assert_eq!(report.findings.len(), 1);
    let finding = &report.findings[0];
    assert_eq!(finding.current_movement, "Roll-up");
    assert_eq!(finding.next_movement, "Hundred");
    assert_eq!(finding.shared_muscle_groups, vec!["Core"]);
    assert_close(finding.overlap_percentage, 100.0);
    assert_eq!(finding.tier, OverlapTier::Overuse);
    assert!(finding.fatigue_warning.is_some());
    assert!(report.overuse_detected);
    assert!(report.overlap_detected);
}

#[test]
fn test_scenario_disjoint_pair_has_no_findings() {
    let report = analyze(&[
        Movement::new("Roll-up", &["Core"]),
        Movement::new("Leg Circles", &["Hip Flexors"]),
    ]);

    assert!(report.findings.is_empty());
    assert!(!report.overuse_detected);
    assert!(!report.overlap_detected);
}

#[test]
fn test_scenario_half_overlap_is_caution() {
    let report = analyze(&[
        Movement::new("Swimming", &["Back", "Glutes"]),
        Movement::new("Side Kick", &["Glutes", "Hip"]),
    ]);

    assert_eq!(report.findings.len(), 1);
    let finding = &report.findings[0];
    assert_eq!(finding.shared_muscle_groups, vec!["Glutes"]);
    assert_close(finding.overlap_percentage, 50.0);
    assert_eq!(finding.tier, OverlapTier::Caution);
    assert!(finding.fatigue_warning.is_none());
    assert!(!report.overuse_detected);
}

#[test]
fn test_scenario_no_data_is_reported_separately() {
    let report = analyze(&[
        Movement::new("Roll-up", &["Core"]),
        Movement::without_data("Teaser"),
        Movement::new("Hundred", &["Core"]),
    ]);

    // The Teaser pairs cannot be measured, so no finding, but the gap is visible
    assert!(report.findings.is_empty());
    assert_eq!(report.movements_without_data.len(), 1);
    assert_eq!(report.movements_without_data[0].name, "Teaser");
    assert_eq!(report.movements_without_data[0].position, 1);

    // Teaser contributes nothing to the histogram but still counts as a movement
    assert_eq!(report.distribution.len(), 1);
    assert_eq!(report.distribution[0].count, 2);
    assert_close(report.distribution[0].percentage, 2.0 / 3.0 * 100.0);
}

#[test]
fn test_measured_empty_set_is_not_no_data() {
    let report = analyze(&[
        Movement::new("Breathing", &[]),
        Movement::new("Roll-up", &["Core"]),
    ]);

    assert!(report.findings.is_empty());
    assert!(report.movements_without_data.is_empty());
}

#[test]
fn test_short_sequences_have_no_findings() {
    for sequence in [vec![], vec![Movement::new("Roll-up", &["Core", "Core"])]] {
        let report = analyze(&sequence);
        assert!(report.findings.is_empty());
        assert!(!report.overuse_detected);
        assert_eq!(report.total_movements, sequence.len());
    }
}

#[test]
fn test_only_overlapping_pairs_appear_in_order() {
    let report = analyze(&[
        Movement::new("Roll-up", &["Core"]),
        Movement::new("Hundred", &["Core", "Shoulders"]),
        Movement::new("Leg Circles", &["Adductors"]),
        Movement::new("Single Leg Stretch", &["Core", "Hip Flexors", "Hamstrings"]),
        Movement::new("Double Leg Stretch", &["Core"]),
    ]);

    let positions: Vec<usize> = report.findings.iter().map(|f| f.position).collect();
    assert_eq!(positions, vec![0, 3]);

    // Normalized against the earlier movement only: 1 of 3
    assert_close(report.findings[1].overlap_percentage, 100.0 / 3.0);
    assert_eq!(report.findings[1].tier, OverlapTier::Acceptable);
}

#[test]
fn test_ratio_uses_earlier_movement_count() {
    // Earlier movement fully recurs: 100% even though the next one adds muscles
    let forward = analyze(&[
        Movement::new("Roll-up", &["Core"]),
        Movement::new("Teaser", &["Core", "Hip Flexors", "Quads", "Shoulders"]),
    ]);
    assert_close(forward.findings[0].overlap_percentage, 100.0);
    assert_eq!(forward.findings[0].tier, OverlapTier::Overuse);

    let reverse = analyze(&[
        Movement::new("Teaser", &["Core", "Hip Flexors", "Quads", "Shoulders"]),
        Movement::new("Roll-up", &["Core"]),
    ]);
    assert_close(reverse.findings[0].overlap_percentage, 25.0);
    assert_eq!(reverse.findings[0].tier, OverlapTier::Acceptable);
}

#[test]
fn test_duplicates_removed_before_ratio() {
    let report = analyze(&[
        Movement::new("Saw", &["Back", "Back", "Obliques"]),
        Movement::new("Spine Twist", &["Obliques"]),
    ]);

    assert_close(report.findings[0].overlap_percentage, 50.0);
    assert_eq!(report.findings[0].tier, OverlapTier::Caution);
}

#[test]
fn test_tier_boundary_just_below_overuse() {
    // 3 of 4 shared = 75%
    let report = analyze(&[
        Movement::new("A", &["Core", "Back", "Glutes", "Calves"]),
        Movement::new("B", &["Core", "Back", "Glutes"]),
    ]);
    assert_eq!(report.findings[0].tier, OverlapTier::Caution);

    // 4 of 5 shared = 80%
    let report = analyze(&[
        Movement::new("A", &["Core", "Back", "Glutes", "Calves", "Quads"]),
        Movement::new("B", &["Core", "Back", "Glutes", "Calves"]),
    ]);
    assert_eq!(report.findings[0].tier, OverlapTier::Overuse);
    assert!(report.overuse_detected);
}

#[test]
fn test_analysis_is_idempotent() {
    let build = || {
        vec![
            Movement::new("Swimming", &["Back", "Glutes"]),
            Movement::new("Side Kick", &["Glutes", "Hip"]),
            Movement::without_data("Seal"),
        ]
    };

    let analyzer = SequenceQualityAnalyzer::new();
    let first = analyzer.analyze(&build()).unwrap();
    let second = analyzer.analyze(&build()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_distribution_sum_matches_tag_occurrences() {
    let sequence = vec![
        Movement::new("Swimming", &["Back", "Glutes"]),
        Movement::new("Side Kick", &["Glutes", "Hip", "Glutes"]),
        Movement::without_data("Seal"),
        Movement::new("Roll-up", &["Core"]),
    ];

    let report = analyze(&sequence);

    // Unique tags per movement: 2 + 2 + 0 + 1 = 5 over 4 movements
    let sum: f64 = report.distribution.iter().map(|e| e.percentage).sum();
    assert_close(sum, 5.0 / 4.0 * 100.0);

    let names: Vec<&str> = report
        .distribution
        .iter()
        .map(|e| e.muscle_group.as_str())
        .collect();
    assert_eq!(names, vec!["Glutes", "Back", "Hip", "Core"]);
}

#[test]
fn test_unnamed_movement_is_invalid_input() {
    let err = SequenceQualityAnalyzer::new()
        .analyze(&[Movement::new("Roll-up", &["Core"]), Movement::new("  ", &["Core"])])
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("position 1")));
}

#[test]
fn test_json_input_contract_end_to_end() {
    let value = json!([
        { "name": "Roll-up", "muscle_groups": [{ "name": "Core" }] },
        { "name": "Hundred", "muscle_groups": [{ "name": "Core" }] },
        { "name": "Seal" }
    ]);

    let sequence = parse_sequence(&value).unwrap();
    let report = analyze(&sequence);

    assert!(report.overuse_detected);
    assert_eq!(report.movements_without_data[0].name, "Seal");
}

#[test]
fn test_null_json_sequence_is_invalid_input() {
    let err = parse_sequence(&serde_json::Value::Null).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
