//! Report rendering
//!
//! Turns a [`SequenceReport`] into a human-readable Markdown document or a
//! JSON payload.

use crate::analysis::{OverlapTier, SequenceReport};
use chrono::{DateTime, Utc};
use fitplan_common::config::ReportFormat;
use fitplan_common::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

/// QA report for one stored class plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassQaReport {
    pub class_id: Uuid,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub sequence: SequenceReport,
}

impl ClassQaReport {
    /// One-line verdict for the class
    pub fn summary(&self) -> String {
        summary_line(&self.sequence)
    }

    /// Full Markdown document
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# QA Report: {}", self.title);
        let _ = writeln!(out);
        let _ = writeln!(out, "- Class: `{}`", self.class_id);
        let _ = writeln!(
            out,
            "- Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(out, "- Movements: {}", self.sequence.total_movements);
        let _ = writeln!(out, "- Verdict: {}", self.summary());
        let _ = writeln!(out);
        out.push_str(&render_markdown(&self.sequence));
        out
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Markdown => Ok(self.to_markdown()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// One-line verdict for a sequence
pub fn summary_line(report: &SequenceReport) -> String {
    match report.worst_tier() {
        None => "✅ No consecutive muscle overlap detected".to_string(),
        Some(OverlapTier::Overuse) => format!(
            "❌ {} overuse warning(s) across {} overlapping pair(s)",
            report.findings_in(OverlapTier::Overuse).count(),
            report.findings.len()
        ),
        Some(OverlapTier::Caution) => format!(
            "⚠️ {} pair(s) need caution, no overuse",
            report.findings_in(OverlapTier::Caution).count()
        ),
        Some(OverlapTier::Acceptable) => format!(
            "✅ {} overlapping pair(s), all acceptable",
            report.findings.len()
        ),
    }
}

/// Proximity check and distribution sections as Markdown
pub fn render_markdown(report: &SequenceReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "## Movement Pattern Proximity Check");
    let _ = writeln!(out);

    if report.findings.is_empty() {
        let _ = writeln!(out, "✅ No consecutive muscle overlap detected");
    } else {
        for finding in &report.findings {
            let _ = writeln!(
                out,
                "- {} **{} → {}**: {:.1}% overlap ({}), {}",
                finding.tier.marker(),
                finding.current_movement,
                finding.next_movement,
                finding.overlap_percentage,
                finding.shared_muscle_groups.join(", "),
                finding.tier.label()
            );
            if let Some(warning) = &finding.fatigue_warning {
                let _ = writeln!(out, "  - {}", warning);
            }
        }
    }

    if !report.movements_without_data.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "### Movements Without Muscle Data");
        let _ = writeln!(out);
        for movement in &report.movements_without_data {
            let _ = writeln!(
                out,
                "- #{} {}: No data",
                movement.position + 1,
                movement.name
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Muscle Group Distribution");
    let _ = writeln!(out);

    if report.distribution.is_empty() {
        let _ = writeln!(out, "No muscle-group data recorded.");
    } else {
        let _ = writeln!(out, "| Muscle Group | Movements | Share |");
        let _ = writeln!(out, "|---|---:|---:|");
        for entry in &report.distribution {
            let _ = writeln!(
                out,
                "| {} | {} | {:.1}% |",
                entry.muscle_group, entry.count, entry.percentage
            );
        }
    }

    out
}

/// Pretty-printed JSON payload
pub fn render_json(report: &SequenceReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render a bare sequence report in the requested format
pub fn render(report: &SequenceReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Markdown => Ok(render_markdown(report)),
        ReportFormat::Json => render_json(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SequenceQualityAnalyzer;
    use fitplan_common::Movement;

    fn analyze(sequence: &[Movement]) -> SequenceReport {
        SequenceQualityAnalyzer::new().analyze(sequence).unwrap()
    }

    #[test]
    fn test_markdown_lists_overuse_with_fatigue_warning() {
        let report = analyze(&[
            Movement::new("Roll-up", &["Core"]),
            Movement::new("Hundred", &["Core"]),
        ]);

        let md = render_markdown(&report);

        assert!(md.contains("## Movement Pattern Proximity Check"));
        assert!(md.contains("❌ **Roll-up → Hundred**: 100.0% overlap (Core), overuse warning"));
        assert!(md.contains("Fatigue risk"));
        assert!(md.contains("| Core | 2 | 100.0% |"));
    }

    #[test]
    fn test_markdown_no_overlap_and_no_data_are_distinct() {
        let report = analyze(&[
            Movement::new("Roll-up", &["Core"]),
            Movement::without_data("Teaser"),
            Movement::new("Leg Circles", &["Hip Flexors"]),
        ]);

        let md = render_markdown(&report);

        assert!(md.contains("✅ No consecutive muscle overlap detected"));
        assert!(md.contains("- #2 Teaser: No data"));
    }

    #[test]
    fn test_markdown_empty_distribution() {
        let md = render_markdown(&analyze(&[]));
        assert!(md.contains("No muscle-group data recorded."));
    }

    #[test]
    fn test_summary_line_variants() {
        let clean = analyze(&[Movement::new("A", &["Core"]), Movement::new("B", &["Back"])]);
        assert!(summary_line(&clean).contains("No consecutive muscle overlap"));

        let caution = analyze(&[
            Movement::new("Swimming", &["Back", "Glutes"]),
            Movement::new("Side Kick", &["Glutes", "Hip"]),
        ]);
        assert!(summary_line(&caution).starts_with("⚠️ 1 pair(s) need caution"));

        let mild = analyze(&[
            Movement::new("A", &["Back", "Glutes", "Core"]),
            Movement::new("B", &["Core"]),
        ]);
        assert!(summary_line(&mild).contains("all acceptable"));
    }

    #[test]
    fn test_json_contains_all_report_fields() {
        let report = analyze(&[
            Movement::new("Roll-up", &["Core"]),
            Movement::new("Hundred", &["Core"]),
        ]);

        let value: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();

        assert_eq!(value["total_movements"], 2);
        assert_eq!(value["overuse_detected"], true);
        assert_eq!(value["overlap_detected"], true);
        assert_eq!(value["findings"][0]["tier"], "overuse");
        assert_eq!(value["findings"][0]["shared_muscle_groups"][0], "Core");
        assert_eq!(value["distribution"][0]["muscle_group"], "Core");
        assert!(value["movements_without_data"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_class_report_markdown_header() {
        let report = ClassQaReport {
            class_id: Uuid::nil(),
            title: "Tuesday Mat".to_string(),
            generated_at: Utc::now(),
            sequence: analyze(&[Movement::new("Roll-up", &["Core"])]),
        };

        let md = report.to_markdown();

        assert!(md.starts_with("# QA Report: Tuesday Mat"));
        assert!(md.contains("- Movements: 1"));
        assert!(md.contains("## Muscle Group Distribution"));
        assert_eq!(report.render(ReportFormat::Markdown).unwrap(), md);
    }
}
