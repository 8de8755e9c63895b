//! Domain models shared by the planning services
//!
//! A [`Movement`] is one exercise in a class sequence. Its muscle groups are
//! optional: `None` means the upstream source had no muscle data for the
//! movement, which is reported as "No data" and is never treated the same as
//! a measured empty set.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// A muscle group targeted by a movement, keyed by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "MuscleGroupRecord")]
pub struct MuscleGroup {
    pub name: String,
}

impl MuscleGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Trimmed, de-duplicated names in first-seen order
    ///
    /// The single comparison rule for muscle groups: analysis, storage and
    /// lookup all go through it.
    pub fn normalized_names(groups: &[MuscleGroup]) -> Vec<&str> {
        let mut seen = HashSet::new();
        groups
            .iter()
            .map(|g| g.name.trim())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

/// Accepted wire shapes for a muscle group: `{"name": "Core"}` or `"Core"`
#[derive(Deserialize)]
#[serde(untagged)]
enum MuscleGroupRecord {
    Named { name: String },
    Bare(String),
}

impl From<MuscleGroupRecord> for MuscleGroup {
    fn from(record: MuscleGroupRecord) -> Self {
        match record {
            MuscleGroupRecord::Named { name } | MuscleGroupRecord::Bare(name) => Self { name },
        }
    }
}

/// One movement in a class sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Stable identifier (assigned by the store when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name, required
    pub name: String,

    /// Targeted muscle groups; `None` when no data is available
    #[serde(default)]
    pub muscle_groups: Option<Vec<MuscleGroup>>,
}

impl Movement {
    /// Movement with known muscle groups
    pub fn new(name: impl Into<String>, muscle_groups: &[&str]) -> Self {
        Self {
            id: None,
            name: name.into(),
            muscle_groups: Some(muscle_groups.iter().map(|g| MuscleGroup::new(*g)).collect()),
        }
    }

    /// Movement for which no muscle-group data exists
    pub fn without_data(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            muscle_groups: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn has_muscle_data(&self) -> bool {
        self.muscle_groups.is_some()
    }

    /// Check the attributes every consumer relies on
    ///
    /// `position` is only used to make the error message actionable.
    pub fn validate(&self, position: usize) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "movement at position {} has no name",
                position
            )));
        }

        if let Some(groups) = &self.muscle_groups {
            if groups.iter().any(|g| g.name.trim().is_empty()) {
                return Err(Error::InvalidInput(format!(
                    "movement '{}' at position {} has a muscle group without a name",
                    self.name, position
                )));
            }
        }

        Ok(())
    }
}

/// A stored class plan: a titled, ordered list of movement ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassPlan {
    pub id: Uuid,
    pub title: String,
    /// Performance order
    pub movement_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ClassPlan {
    pub fn new(title: impl Into<String>, movement_ids: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            movement_ids,
            created_at: Utc::now(),
        }
    }
}

/// Parse an ordered movement sequence from JSON
///
/// Expects an array of `{ "name": string, "muscle_groups": [{ "name": string }] }`
/// records. A missing or `null` `muscle_groups` field means "No data".
pub fn parse_sequence(value: &Value) -> Result<Vec<Movement>> {
    let records = match value {
        Value::Null => return Err(Error::InvalidInput("sequence is null".to_string())),
        Value::Array(records) => records,
        other => {
            return Err(Error::InvalidInput(format!(
                "sequence must be an array, got {}",
                json_type_name(other)
            )))
        }
    };

    let mut movements = Vec::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        let fields = record.as_object().ok_or_else(|| {
            Error::InvalidInput(format!("movement at position {} is not an object", position))
        })?;

        if !matches!(fields.get("name"), Some(Value::String(_))) {
            return Err(Error::InvalidInput(format!(
                "movement at position {} has no name",
                position
            )));
        }

        let movement: Movement = serde_json::from_value(record.clone()).map_err(|e| {
            Error::InvalidInput(format!("movement at position {}: {}", position, e))
        })?;
        movement.validate(position)?;
        movements.push(movement);
    }

    Ok(movements)
}

/// Parse an ordered movement sequence from JSON text
pub fn parse_sequence_str(text: &str) -> Result<Vec<Movement>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::InvalidInput(format!("sequence is not valid JSON: {}", e)))?;
    parse_sequence(&value)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
