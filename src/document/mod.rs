//! Document normalization.
//!
//! Converts the persisted configuration document into a canonical
//! [`ModuleSchedule`] and back. The persisted form lets any repeatable
//! field be a single record or a list; the model always uses lists.
//!
//! Only structure is checked here: required fields must be present and
//! scalars must parse. Schedule invariants are the job of
//! [`crate::constraints`].
//!
//! # Round Trip
//! [`normalize_with_shape`] also returns a [`DocumentShape`] recording
//! which fields were singletons, the original spelling of every
//! numeric scalar, and any unrelated sibling fields (down to windows and
//! core assignment records). [`denormalize_with_shape`] restores all of
//! it, so an unmodified schedule is written back the way it was read.
//! Values changed by an edit are written as numbers, or as fixed
//! four-decimal text when the document stored text.

mod raw;

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::constraints::{check_unique_ids, Violation};
use crate::error::ShapeError;
use crate::models::{CoreIndex, ModuleSchedule, PartitionSchedule, WindowSchedule};
use raw::{
    OneOrMany, RawCoreAssignment, RawDocument, RawModule, RawModuleSchedule, RawPartition,
    RawWindow, Scalar,
};

/// How the original document laid out its fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentShape {
    numbers_as_text: bool,
    partitions_single: bool,
    partitions: HashMap<String, PartitionShape>,
    major_frame: Option<Scalar>,
    required_cores: Option<Scalar>,
    root_extra: Map<String, Value>,
    module_extra: Map<String, Value>,
    schedule_extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct PartitionShape {
    windows_single: bool,
    assignments: AssignmentShape,
    period: Option<Scalar>,
    period_duration: Option<Scalar>,
    windows: HashMap<String, WindowShape>,
    assignment_extra: HashMap<String, Map<String, Value>>,
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct WindowShape {
    start: Option<Scalar>,
    duration: Option<Scalar>,
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum AssignmentShape {
    #[default]
    Absent,
    Single,
    List,
}

impl DocumentShape {
    /// Whether scalars were stored as text.
    pub fn numbers_as_text(&self) -> bool {
        self.numbers_as_text
    }

    /// Whether `Partition_Schedule` was a single record.
    pub fn partitions_single(&self) -> bool {
        self.partitions_single
    }
}

/// Normalizes a persisted document into a schedule.
///
/// # Errors
/// [`ShapeError`] when `ARINC_653_Module.Module_Schedule`,
/// `MajorFrameSeconds`, or every partition is missing, or a scalar
/// cannot be parsed.
pub fn normalize(document: &Value) -> Result<ModuleSchedule, ShapeError> {
    normalize_with_shape(document).map(|(schedule, _)| schedule)
}

/// Normalizes a document and records its layout.
pub fn normalize_with_shape(
    document: &Value,
) -> Result<(ModuleSchedule, DocumentShape), ShapeError> {
    let raw: RawDocument =
        serde_json::from_value(document.clone()).map_err(|e| ShapeError::Malformed(e.to_string()))?;
    let mut shape = DocumentShape {
        root_extra: raw.extra,
        ..Default::default()
    };

    let module = raw.module.ok_or(ShapeError::MissingField("ARINC_653_Module"))?;
    shape.module_extra = module.extra;
    let raw_schedule = module
        .schedule
        .ok_or(ShapeError::MissingField("Module_Schedule"))?;
    shape.schedule_extra = raw_schedule.extra;

    let major_frame = raw_schedule
        .major_frame_seconds
        .ok_or(ShapeError::MissingField("MajorFrameSeconds"))?;
    shape.numbers_as_text = major_frame.is_text();
    let major_frame_seconds = parse_seconds("MajorFrameSeconds", &major_frame)?;
    if major_frame_seconds <= 0.0 {
        return Err(ShapeError::invalid(
            "MajorFrameSeconds",
            format!("must be positive, got {major_frame_seconds}"),
        ));
    }
    shape.major_frame = Some(major_frame);

    let raw_partitions = raw_schedule
        .partitions
        .ok_or(ShapeError::MissingField("Partition_Schedule"))?;
    shape.partitions_single = raw_partitions.is_single();
    let raw_partitions = raw_partitions.into_vec();
    if raw_partitions.is_empty() {
        return Err(ShapeError::MissingField("Partition_Schedule"));
    }

    let mut partitions = Vec::with_capacity(raw_partitions.len());
    for (index, raw_partition) in raw_partitions.into_iter().enumerate() {
        let (partition, partition_shape) = normalize_partition(index, raw_partition)?;
        shape
            .partitions
            .insert(partition.partition_id.clone(), partition_shape);
        partitions.push(partition);
    }

    let highest_assigned = partitions
        .iter()
        .flat_map(|p| p.window_core_assignments.values().copied())
        .max();
    let required_cores = match raw_schedule.required_cores {
        Some(scalar) => {
            let cores = scalar
                .to_usize()
                .ok_or_else(|| ShapeError::invalid("RequiredCores", scalar.to_text()))?;
            shape.required_cores = Some(scalar);
            cores
        }
        None => match highest_assigned {
            Some(core) => core.checked_add(1).ok_or_else(|| {
                ShapeError::invalid("CoreIndex", format!("{core} leaves no room for a core count"))
            })?,
            None => 1,
        },
    };
    if required_cores == 0 {
        return Err(ShapeError::invalid("RequiredCores", "must be at least 1"));
    }

    let schedule = ModuleSchedule {
        schedule_name: raw_schedule
            .schedule_name
            .map(|s| s.to_text())
            .unwrap_or_default(),
        major_frame_seconds,
        required_cores,
        partitions,
    };
    check_unique_ids(&schedule).map_err(|v| {
        let field = match v {
            Violation::DuplicatePartition { .. } => "PartitionIdentifier",
            _ => "WindowIdentifier",
        };
        ShapeError::invalid(field, v.to_string())
    })?;
    Ok((schedule, shape))
}

fn normalize_partition(
    index: usize,
    raw: RawPartition,
) -> Result<(PartitionSchedule, PartitionShape), ShapeError> {
    let partition_id = raw
        .partition_id
        .map(|s| s.to_text())
        .unwrap_or_else(|| (index + 1).to_string());

    let mut shape = PartitionShape {
        period: raw.period_seconds.clone(),
        period_duration: raw.period_duration_seconds.clone(),
        extra: raw.extra,
        ..Default::default()
    };

    let raw_windows = match raw.windows {
        Some(windows) => {
            shape.windows_single = windows.is_single();
            windows.into_vec()
        }
        None => Vec::new(),
    };
    let mut windows = Vec::with_capacity(raw_windows.len());
    for (i, raw_window) in raw_windows.into_iter().enumerate() {
        let (window, window_shape) = normalize_window(i, raw_window)?;
        shape
            .windows
            .insert(window.window_id.clone(), window_shape);
        windows.push(window);
    }

    let mut window_core_assignments = BTreeMap::new();
    if let Some(assignments) = raw.core_assignments {
        shape.assignments = if assignments.is_single() {
            AssignmentShape::Single
        } else {
            AssignmentShape::List
        };
        for a in assignments.into_vec() {
            let core = a
                .core
                .to_usize()
                .ok_or_else(|| ShapeError::invalid("CoreIndex", a.core.to_text()))?;
            let window_id = a.window_id.to_text();
            if !a.extra.is_empty() {
                shape.assignment_extra.insert(window_id.clone(), a.extra);
            }
            window_core_assignments.insert(window_id, core);
        }
    }

    let partition = PartitionSchedule {
        partition_id,
        partition_name: raw
            .partition_name
            .map(|s| s.to_text())
            .unwrap_or_default(),
        period_seconds: parse_optional_seconds("PeriodSeconds", raw.period_seconds.as_ref())?,
        period_duration_seconds: parse_optional_seconds(
            "PeriodDurationSeconds",
            raw.period_duration_seconds.as_ref(),
        )?,
        windows,
        window_core_assignments,
    };
    Ok((partition, shape))
}

fn normalize_window(
    index: usize,
    raw: RawWindow,
) -> Result<(WindowSchedule, WindowShape), ShapeError> {
    let start = raw
        .start_seconds
        .ok_or(ShapeError::MissingField("WindowStartSeconds"))?;
    let duration = raw
        .duration_seconds
        .ok_or(ShapeError::MissingField("WindowDurationSeconds"))?;

    let window = WindowSchedule {
        window_id: raw
            .window_id
            .map(|s| s.to_text())
            .unwrap_or_else(|| (index + 1).to_string()),
        start_seconds: parse_seconds("WindowStartSeconds", &start)?,
        duration_seconds: parse_seconds("WindowDurationSeconds", &duration)?,
        partition_period_start: raw.partition_period_start,
    };
    let shape = WindowShape {
        start: Some(start),
        duration: Some(duration),
        extra: raw.extra,
    };
    Ok((window, shape))
}

fn parse_seconds(field: &'static str, scalar: &Scalar) -> Result<f64, ShapeError> {
    scalar
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ShapeError::invalid(field, format!("'{}' is not a number", scalar.to_text())))
}

fn parse_optional_seconds(
    field: &'static str,
    scalar: Option<&Scalar>,
) -> Result<f64, ShapeError> {
    scalar.map_or(Ok(0.0), |s| parse_seconds(field, s))
}

/// Converts a schedule into the persisted document form.
///
/// Every repeatable field is written as a list and scalars as numbers.
/// Assignment lists are omitted for partitions with no assignments.
pub fn denormalize(schedule: &ModuleSchedule) -> Value {
    denormalize_with_shape(schedule, &DocumentShape::default())
}

/// Converts a schedule into the persisted form, restoring `shape`.
///
/// Singletons stay singletons while they still hold exactly one record.
/// Partitions or windows created during editing are written as lists.
pub fn denormalize_with_shape(schedule: &ModuleSchedule, shape: &DocumentShape) -> Value {
    let text = shape.numbers_as_text;

    let partitions = schedule
        .partitions
        .iter()
        .map(|p| denormalize_partition(p, shape.partitions.get(&p.partition_id), text))
        .collect();

    let raw = RawDocument {
        module: Some(RawModule {
            schedule: Some(RawModuleSchedule {
                schedule_name: Some(Scalar::Text(schedule.schedule_name.clone())),
                major_frame_seconds: Some(time_scalar(
                    schedule.major_frame_seconds,
                    shape.major_frame.as_ref(),
                    text,
                )),
                required_cores: Some(match &shape.required_cores {
                    Some(original) if original.to_usize() == Some(schedule.required_cores) => {
                        original.clone()
                    }
                    _ => int_scalar(schedule.required_cores, text),
                }),
                partitions: Some(OneOrMany::from_vec(partitions, shape.partitions_single)),
                extra: shape.schedule_extra.clone(),
            }),
            extra: shape.module_extra.clone(),
        }),
        extra: shape.root_extra.clone(),
    };

    // Plain data with string keys; serialization cannot fail.
    serde_json::to_value(raw).unwrap_or(Value::Null)
}

fn denormalize_partition(
    partition: &PartitionSchedule,
    shape: Option<&PartitionShape>,
    text: bool,
) -> RawPartition {
    let windows: Vec<RawWindow> = partition
        .windows
        .iter()
        .map(|w| {
            let original = shape.and_then(|s| s.windows.get(&w.window_id));
            RawWindow {
                window_id: Some(Scalar::Text(w.window_id.clone())),
                start_seconds: Some(time_scalar(
                    w.start_seconds,
                    original.and_then(|o| o.start.as_ref()),
                    text,
                )),
                duration_seconds: Some(time_scalar(
                    w.duration_seconds,
                    original.and_then(|o| o.duration.as_ref()),
                    text,
                )),
                partition_period_start: w.partition_period_start.clone(),
                extra: original.map(|o| o.extra.clone()).unwrap_or_default(),
            }
        })
        .collect();

    let assignments: Vec<RawCoreAssignment> = partition
        .window_core_assignments
        .iter()
        .map(|(window_id, core)| RawCoreAssignment {
            window_id: Scalar::Text(window_id.clone()),
            core: int_scalar(*core, text),
            extra: shape
                .and_then(|s| s.assignment_extra.get(window_id))
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    let assignment_shape = shape.map_or(AssignmentShape::Absent, |s| s.assignments);
    let core_assignments = if assignments.is_empty() {
        // Keep an explicitly empty list; drop the field if it never existed.
        (assignment_shape == AssignmentShape::List).then(|| OneOrMany::Many(Vec::new()))
    } else {
        Some(OneOrMany::from_vec(
            assignments,
            assignment_shape == AssignmentShape::Single,
        ))
    };

    RawPartition {
        partition_id: Some(Scalar::Text(partition.partition_id.clone())),
        partition_name: Some(Scalar::Text(partition.partition_name.clone())),
        period_seconds: Some(time_scalar(
            partition.period_seconds,
            shape.and_then(|s| s.period.as_ref()),
            text,
        )),
        period_duration_seconds: Some(time_scalar(
            partition.period_duration_seconds,
            shape.and_then(|s| s.period_duration.as_ref()),
            text,
        )),
        windows: Some(OneOrMany::from_vec(
            windows,
            shape.is_some_and(|s| s.windows_single),
        )),
        core_assignments,
        extra: shape.map(|s| s.extra.clone()).unwrap_or_default(),
    }
}

/// Original spelling when the value is unchanged, otherwise a fresh scalar.
fn time_scalar(value: f64, original: Option<&Scalar>, text: bool) -> Scalar {
    match original {
        Some(o) if o.to_f64() == Some(value) => o.clone(),
        _ => float_scalar(value, text),
    }
}

fn float_scalar(value: f64, text: bool) -> Scalar {
    if text {
        return Scalar::Text(format!("{value:.4}"));
    }
    serde_json::Number::from_f64(value)
        .map(Scalar::Number)
        .unwrap_or_else(|| Scalar::Text(format!("{value:.4}")))
}

fn int_scalar(value: usize, text: bool) -> Scalar {
    if text {
        Scalar::Text(value.to_string())
    } else {
        Scalar::Number(serde_json::Number::from(value))
    }
}

/// Assignment of a window to a core, as listed in the document.
pub fn core_assignments(partition: &PartitionSchedule) -> Vec<(&str, CoreIndex)> {
    partition
        .window_core_assignments
        .iter()
        .map(|(w, c)| (w.as_str(), *c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list_document() -> Value {
        json!({
            "ARINC_653_Module": {
                "ModuleName": "IMA-1",
                "Module_Schedule": {
                    "ScheduleName": "Nominal",
                    "MajorFrameSeconds": 10.0,
                    "RequiredCores": 2,
                    "Partition_Schedule": [
                        {
                            "PartitionIdentifier": "1",
                            "PartitionName": "Nav",
                            "PeriodSeconds": 10.0,
                            "PeriodDurationSeconds": 4.0,
                            "Window_Schedule": [
                                {
                                    "WindowIdentifier": "101",
                                    "WindowStartSeconds": 0.0,
                                    "WindowDurationSeconds": 4.0,
                                    "PartitionPeriodStart": "true"
                                }
                            ],
                            "Window_Core_Assignment": [
                                { "WindowIdentifier": "101", "CoreIndex": 1 }
                            ]
                        },
                        {
                            "PartitionIdentifier": "2",
                            "PartitionName": "Comms",
                            "PeriodSeconds": 5.0,
                            "PeriodDurationSeconds": 2.5,
                            "Window_Schedule": [
                                {
                                    "WindowIdentifier": "201",
                                    "WindowStartSeconds": 4.0,
                                    "WindowDurationSeconds": 2.5
                                },
                                {
                                    "WindowIdentifier": "202",
                                    "WindowStartSeconds": 7.0,
                                    "WindowDurationSeconds": 1.0
                                }
                            ],
                            "Window_Core_Assignment": [
                                { "WindowIdentifier": "201", "CoreIndex": 0 },
                                { "WindowIdentifier": "202", "CoreIndex": 0 }
                            ]
                        }
                    ]
                }
            },
            "archName": "demo"
        })
    }

    fn xml_style_document() -> Value {
        json!({
            "ARINC_653_Module": {
                "Module_Schedule": {
                    "ScheduleName": "Single",
                    "MajorFrameSeconds": "2.0000",
                    "Partition_Schedule": {
                        "PartitionIdentifier": "7",
                        "PartitionName": "Solo",
                        "PeriodSeconds": "2",
                        "PeriodDurationSeconds": "1",
                        "Window_Schedule": {
                            "WindowIdentifier": "71",
                            "WindowStartSeconds": "0.5",
                            "WindowDurationSeconds": "1"
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_normalize_lists() {
        let s = normalize(&list_document()).unwrap();
        assert_eq!(s.schedule_name, "Nominal");
        assert!((s.major_frame_seconds - 10.0).abs() < 1e-10);
        assert_eq!(s.required_cores, 2);
        assert_eq!(s.partitions.len(), 2);

        let p1 = s.partition("1").unwrap();
        assert_eq!(p1.partition_name, "Nav");
        assert_eq!(p1.core_of("101"), 1);
        assert_eq!(
            p1.window("101").unwrap().partition_period_start,
            Some(json!("true"))
        );

        let p2 = s.partition("2").unwrap();
        assert_eq!(p2.windows.len(), 2);
        assert_eq!(core_assignments(p2), vec![("201", 0), ("202", 0)]);
    }

    #[test]
    fn test_normalize_promotes_singletons() {
        let (s, shape) = normalize_with_shape(&xml_style_document()).unwrap();
        assert!(shape.partitions_single());
        assert!(shape.numbers_as_text());
        assert_eq!(s.partitions.len(), 1);

        let p = &s.partitions[0];
        assert_eq!(p.partition_id, "7");
        assert_eq!(p.windows.len(), 1);
        assert!((p.windows[0].start_seconds - 0.5).abs() < 1e-10);
        // No assignment record at all: core 0, one core.
        assert_eq!(p.core_of("71"), 0);
        assert_eq!(s.required_cores, 1);
    }

    #[test]
    fn test_required_cores_inferred_from_assignments() {
        let mut doc = list_document();
        doc["ARINC_653_Module"]["Module_Schedule"]
            .as_object_mut()
            .unwrap()
            .remove("RequiredCores");
        let s = normalize(&doc).unwrap();
        assert_eq!(s.required_cores, 2);
    }

    #[test]
    fn test_inferred_core_count_overflow() {
        let mut doc = list_document();
        let schedule = &mut doc["ARINC_653_Module"]["Module_Schedule"];
        schedule.as_object_mut().unwrap().remove("RequiredCores");
        schedule["Partition_Schedule"][0]["Window_Core_Assignment"][0]["CoreIndex"] =
            json!(u64::MAX);
        assert!(matches!(
            normalize(&doc).unwrap_err(),
            ShapeError::InvalidField {
                field: "CoreIndex",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_required_cores() {
        let mut doc = list_document();
        doc["ARINC_653_Module"]["Module_Schedule"]["RequiredCores"] = json!(0);
        assert!(matches!(
            normalize(&doc).unwrap_err(),
            ShapeError::InvalidField {
                field: "RequiredCores",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_major_frame() {
        let mut doc = list_document();
        doc["ARINC_653_Module"]["Module_Schedule"]
            .as_object_mut()
            .unwrap()
            .remove("MajorFrameSeconds");
        assert_eq!(
            normalize(&doc).unwrap_err(),
            ShapeError::MissingField("MajorFrameSeconds")
        );
    }

    #[test]
    fn test_missing_partitions() {
        let mut doc = list_document();
        doc["ARINC_653_Module"]["Module_Schedule"]["Partition_Schedule"] = json!([]);
        assert_eq!(
            normalize(&doc).unwrap_err(),
            ShapeError::MissingField("Partition_Schedule")
        );

        let empty = json!({ "ARINC_653_Module": { "Module_Schedule": { "MajorFrameSeconds": 1 } } });
        assert_eq!(
            normalize(&empty).unwrap_err(),
            ShapeError::MissingField("Partition_Schedule")
        );
    }

    #[test]
    fn test_missing_module() {
        assert_eq!(
            normalize(&json!({ "other": 1 })).unwrap_err(),
            ShapeError::MissingField("ARINC_653_Module")
        );
        assert!(matches!(
            normalize(&json!([1, 2])).unwrap_err(),
            ShapeError::Malformed(_)
        ));
    }

    #[test]
    fn test_duplicate_partition_id() {
        let mut doc = list_document();
        doc["ARINC_653_Module"]["Module_Schedule"]["Partition_Schedule"][1]["PartitionIdentifier"] =
            json!("1");
        assert!(matches!(
            normalize(&doc).unwrap_err(),
            ShapeError::InvalidField {
                field: "PartitionIdentifier",
                ..
            }
        ));
    }

    #[test]
    fn test_unparsable_scalar() {
        let mut doc = xml_style_document();
        doc["ARINC_653_Module"]["Module_Schedule"]["MajorFrameSeconds"] = json!("ten");
        assert!(matches!(
            normalize(&doc).unwrap_err(),
            ShapeError::InvalidField {
                field: "MajorFrameSeconds",
                ..
            }
        ));
    }

    #[test]
    fn test_non_positive_major_frame() {
        let mut doc = xml_style_document();
        doc["ARINC_653_Module"]["Module_Schedule"]["MajorFrameSeconds"] = json!("0");
        assert!(normalize(&doc).is_err());
    }

    #[test]
    fn test_round_trip_lists() {
        let doc = list_document();
        let (s, shape) = normalize_with_shape(&doc).unwrap();
        assert_eq!(denormalize_with_shape(&s, &shape), doc);
    }

    #[test]
    fn test_round_trip_lists_without_shape_is_semantically_equal() {
        let doc = list_document();
        let s = normalize(&doc).unwrap();
        let back = denormalize(&s);
        // Lists only: sibling fields are not carried, the schedule is.
        assert_eq!(normalize(&back).unwrap(), s);
        assert!(back["ARINC_653_Module"]["Module_Schedule"]["Partition_Schedule"].is_array());
    }

    #[test]
    fn test_round_trip_restores_singletons() {
        let doc = xml_style_document();
        let (s, shape) = normalize_with_shape(&doc).unwrap();
        let back = denormalize_with_shape(&s, &shape);

        let schedule = &back["ARINC_653_Module"]["Module_Schedule"];
        assert!(schedule["Partition_Schedule"].is_object());
        assert!(schedule["Partition_Schedule"]["Window_Schedule"].is_object());
        assert!(schedule["Partition_Schedule"]
            .get("Window_Core_Assignment")
            .is_none());
        assert_eq!(schedule["MajorFrameSeconds"], json!("2.0000"));
        assert_eq!(schedule["Partition_Schedule"]["PeriodSeconds"], json!("2"));
        assert_eq!(
            schedule["Partition_Schedule"]["Window_Schedule"]["WindowStartSeconds"],
            json!("0.5")
        );
        assert_eq!(normalize(&back).unwrap(), s);
    }

    #[test]
    fn test_round_trip_keeps_text_spelling_and_window_fields() {
        let mut doc = xml_style_document();
        let window = &mut doc["ARINC_653_Module"]["Module_Schedule"]["Partition_Schedule"]
            ["Window_Schedule"];
        window["WindowStartSeconds"] = json!("0.5000");
        window["Criticality"] = json!("A");
        doc["ARINC_653_Module"]["Module_Schedule"]["Partition_Schedule"]
            ["Window_Core_Assignment"] =
            json!({ "WindowIdentifier": "71", "CoreIndex": "0", "Note": "pinned" });

        let (s, shape) = normalize_with_shape(&doc).unwrap();
        let back = denormalize_with_shape(&s, &shape);
        let partition = &back["ARINC_653_Module"]["Module_Schedule"]["Partition_Schedule"];
        assert_eq!(partition["Window_Schedule"]["WindowStartSeconds"], json!("0.5000"));
        assert_eq!(partition["Window_Schedule"]["Criticality"], json!("A"));
        assert_eq!(partition["Window_Core_Assignment"]["Note"], json!("pinned"));
        assert_eq!(
            back["ARINC_653_Module"]["Module_Schedule"]["MajorFrameSeconds"],
            json!("2.0000")
        );
    }

    #[test]
    fn test_edited_text_value_uses_four_decimals() {
        let doc = xml_style_document();
        let (mut s, shape) = normalize_with_shape(&doc).unwrap();
        s.partitions[0].windows[0].start_seconds = 0.25;
        let back = denormalize_with_shape(&s, &shape);
        let window = &back["ARINC_653_Module"]["Module_Schedule"]["Partition_Schedule"]
            ["Window_Schedule"];
        assert_eq!(window["WindowStartSeconds"], json!("0.2500"));
        // Untouched sibling keeps its spelling.
        assert_eq!(window["WindowDurationSeconds"], json!("1"));
    }

    #[test]
    fn test_denormalize_new_partition_uses_lists() {
        let doc = xml_style_document();
        let (mut s, shape) = normalize_with_shape(&doc).unwrap();
        s.partitions.push(
            PartitionSchedule::new("8")
                .with_name("New")
                .with_window_on_core(WindowSchedule::new("81", 1.5, 0.5), 0),
        );
        let back = denormalize_with_shape(&s, &shape);
        let partitions = &back["ARINC_653_Module"]["Module_Schedule"]["Partition_Schedule"];
        assert_eq!(partitions.as_array().map(Vec::len), Some(2));
        assert!(partitions[1]["Window_Schedule"].is_array());
        assert_eq!(
            partitions[1]["Window_Core_Assignment"][0]["CoreIndex"],
            json!("0")
        );
    }
}
