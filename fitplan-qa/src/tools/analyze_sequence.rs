//! `analyze_sequence` tool: run the proximity check over an inline sequence

use super::Tool;
use crate::analysis::SequenceQualityAnalyzer;
use async_trait::async_trait;
use fitplan_common::models::parse_sequence;
use fitplan_common::{Error, Result};
use serde_json::{json, Value};

/// Analyzes `params.movements` and returns the sequence report
#[derive(Debug, Default)]
pub struct AnalyzeSequenceTool {
    analyzer: SequenceQualityAnalyzer,
}

impl AnalyzeSequenceTool {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Tool for AnalyzeSequenceTool {
    fn id(&self) -> &'static str {
        "analyze_sequence"
    }

    fn summary(&self) -> &'static str {
        "Check consecutive movements for muscle-group overlap and report the muscle distribution"
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["movements"],
            "properties": {
                "movements": {
                    "type": "array",
                    "description": "Movements in performance order",
                    "items": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "muscle_groups": {
                                "type": ["array", "null"],
                                "items": {
                                    "type": "object",
                                    "required": ["name"],
                                    "properties": { "name": { "type": "string" } }
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let movements = params.get("movements").ok_or_else(|| {
            Error::InvalidInput("missing required parameter 'movements'".to_string())
        })?;

        let sequence = parse_sequence(movements)?;
        let report = self.analyzer.analyze(&sequence)?;
        Ok(serde_json::to_value(report)?)
    }
}
