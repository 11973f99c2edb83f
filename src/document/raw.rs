//! Serde mirror of the persisted configuration document.
//!
//! Field names follow the ARINC-653 configuration XML as converted to
//! JSON (attributes merged into elements, no forced arrays). Every
//! repeatable element may therefore be a single object or a list, and
//! every scalar may be a number or a numeric string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A field that holds either one record or a list of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// List form.
    Many(Vec<T>),
    /// Single-record form.
    One(T),
}

impl<T> OneOrMany<T> {
    /// Promotes to a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }

    /// Whether the field held a single record.
    pub fn is_single(&self) -> bool {
        matches!(self, Self::One(_))
    }

    /// Wraps `items` as a single record when `single` is set and there is
    /// exactly one item; as a list otherwise.
    pub fn from_vec(mut items: Vec<T>, single: bool) -> Self {
        if single && items.len() == 1 {
            if let Some(item) = items.pop() {
                return Self::One(item);
            }
        }
        Self::Many(items)
    }
}

/// A leaf value: number or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// JSON number.
    Number(serde_json::Number),
    /// JSON string (XML-derived documents carry all values as text).
    Text(String),
}

impl Scalar {
    /// Reads the scalar as a float.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Reads the scalar as a non-negative integer.
    pub fn to_usize(&self) -> Option<usize> {
        match self {
            Self::Number(n) => n.as_u64().and_then(|v| usize::try_from(v).ok()),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Reads the scalar as text.
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Whether the scalar was stored as text.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(rename = "ARINC_653_Module", skip_serializing_if = "Option::is_none")]
    pub module: Option<RawModule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawModule {
    #[serde(rename = "Module_Schedule", skip_serializing_if = "Option::is_none")]
    pub schedule: Option<RawModuleSchedule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawModuleSchedule {
    #[serde(rename = "ScheduleName", skip_serializing_if = "Option::is_none")]
    pub schedule_name: Option<Scalar>,
    #[serde(rename = "MajorFrameSeconds", skip_serializing_if = "Option::is_none")]
    pub major_frame_seconds: Option<Scalar>,
    #[serde(rename = "RequiredCores", skip_serializing_if = "Option::is_none")]
    pub required_cores: Option<Scalar>,
    #[serde(rename = "Partition_Schedule", skip_serializing_if = "Option::is_none")]
    pub partitions: Option<OneOrMany<RawPartition>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPartition {
    #[serde(rename = "PartitionIdentifier", skip_serializing_if = "Option::is_none")]
    pub partition_id: Option<Scalar>,
    #[serde(rename = "PartitionName", skip_serializing_if = "Option::is_none")]
    pub partition_name: Option<Scalar>,
    #[serde(rename = "PeriodSeconds", skip_serializing_if = "Option::is_none")]
    pub period_seconds: Option<Scalar>,
    #[serde(rename = "PeriodDurationSeconds", skip_serializing_if = "Option::is_none")]
    pub period_duration_seconds: Option<Scalar>,
    #[serde(rename = "Window_Schedule", skip_serializing_if = "Option::is_none")]
    pub windows: Option<OneOrMany<RawWindow>>,
    #[serde(rename = "Window_Core_Assignment", skip_serializing_if = "Option::is_none")]
    pub core_assignments: Option<OneOrMany<RawCoreAssignment>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWindow {
    #[serde(rename = "WindowIdentifier", skip_serializing_if = "Option::is_none")]
    pub window_id: Option<Scalar>,
    #[serde(rename = "WindowStartSeconds", skip_serializing_if = "Option::is_none")]
    pub start_seconds: Option<Scalar>,
    #[serde(rename = "WindowDurationSeconds", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<Scalar>,
    #[serde(rename = "PartitionPeriodStart", skip_serializing_if = "Option::is_none")]
    pub partition_period_start: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCoreAssignment {
    #[serde(rename = "WindowIdentifier")]
    pub window_id: Scalar,
    #[serde(rename = "CoreIndex")]
    pub core: Scalar,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
