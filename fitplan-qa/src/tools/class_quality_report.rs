//! `class_quality_report` tool: QA report for a stored class plan

use super::Tool;
use crate::service::ClassQaService;
use async_trait::async_trait;
use fitplan_common::db::PlanStore;
use fitplan_common::{Error, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Loads a class through the injected store and analyzes it
pub struct ClassQualityReportTool {
    service: ClassQaService,
}

impl ClassQualityReportTool {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self {
            service: ClassQaService::new(store),
        }
    }
}

#[async_trait]
impl Tool for ClassQualityReportTool {
    fn id(&self) -> &'static str {
        "class_quality_report"
    }

    fn summary(&self) -> &'static str {
        "Build the QA report (proximity check and muscle distribution) for a stored class"
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["class_id"],
            "properties": {
                "class_id": {
                    "type": "string",
                    "format": "uuid",
                    "description": "Id of a stored class plan"
                }
            }
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let raw = params
            .get("class_id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::InvalidInput("missing required string parameter 'class_id'".to_string())
            })?;

        let class_id = Uuid::parse_str(raw)
            .map_err(|e| Error::InvalidInput(format!("invalid class_id '{}': {}", raw, e)))?;

        let report = self.service.report_for_class(class_id).await?;
        Ok(serde_json::to_value(report)?)
    }
}
