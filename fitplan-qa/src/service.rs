//! Class QA service
//!
//! Loads a stored class plan through the injected [`PlanStore`] handle and
//! runs the sequence analyzer over it.

use crate::analysis::SequenceQualityAnalyzer;
use crate::report::ClassQaReport;
use chrono::Utc;
use fitplan_common::db::PlanStore;
use fitplan_common::{Error, Result};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Produces QA reports for stored classes
#[derive(Clone)]
pub struct ClassQaService {
    store: Arc<dyn PlanStore>,
    analyzer: SequenceQualityAnalyzer,
}

impl ClassQaService {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self {
            store,
            analyzer: SequenceQualityAnalyzer::new(),
        }
    }

    /// Build the QA report for `class_id`
    ///
    /// # Errors
    /// `Error::NotFound` if the class does not exist.
    pub async fn report_for_class(&self, class_id: Uuid) -> Result<ClassQaReport> {
        let plan = self
            .store
            .get_class(class_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("class {}", class_id)))?;

        let sequence = self.store.class_sequence(class_id).await?;
        let report = self.analyzer.analyze(&sequence)?;

        if report.overuse_detected {
            warn!(
                "Class '{}' ({}) has consecutive muscle overuse",
                plan.title, class_id
            );
        }
        info!(
            "QA report for class '{}': {} movements, {} overlapping pair(s)",
            plan.title,
            report.total_movements,
            report.findings.len()
        );

        Ok(ClassQaReport {
            class_id,
            title: plan.title,
            generated_at: Utc::now(),
            sequence: report,
        })
    }
}
