//! Interchange text export.
//!
//! Writes a schedule as an XML element tree mirroring the persisted
//! document layout. Every value is an attribute; time fields use a fixed
//! four-decimal format. There is no import path.
//!
//! ```text
//! <ARINC_653_Module>
//!   <Module_Schedule ScheduleName=".." MajorFrameSeconds="10.0000" RequiredCores="2">
//!     <Partition_Schedule PartitionIdentifier="P1" ...>
//!       <Window_Schedule WindowIdentifier="W1" WindowStartSeconds="0.0000" .../>
//!       <Window_Core_Assignment WindowIdentifier="W1" CoreIndex="1"/>
//!     </Partition_Schedule>
//!   </Module_Schedule>
//! </ARINC_653_Module>
//! ```

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde_json::Value;
use tracing::debug;

use crate::document::core_assignments;
use crate::error::ExportError;
use crate::models::{ModuleSchedule, PartitionSchedule, WindowSchedule};

const INDENT: usize = 4;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn time_attr(seconds: f64) -> String {
    format!("{seconds:.4}")
}

fn opaque_attr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), ExportError> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::Write(e.to_string()))
}

fn window_element(window: &WindowSchedule) -> BytesStart<'static> {
    let mut elem = BytesStart::new("Window_Schedule");
    elem.push_attribute(("WindowIdentifier", window.window_id.as_str()));
    elem.push_attribute((
        "WindowStartSeconds",
        time_attr(window.start_seconds).as_str(),
    ));
    elem.push_attribute((
        "WindowDurationSeconds",
        time_attr(window.duration_seconds).as_str(),
    ));
    if let Some(marker) = &window.partition_period_start {
        elem.push_attribute(("PartitionPeriodStart", opaque_attr(marker).as_str()));
    }
    elem
}

fn write_partition(writer: &mut XmlWriter, partition: &PartitionSchedule) -> Result<(), ExportError> {
    let mut elem = BytesStart::new("Partition_Schedule");
    elem.push_attribute(("PartitionIdentifier", partition.partition_id.as_str()));
    elem.push_attribute(("PartitionName", partition.partition_name.as_str()));
    elem.push_attribute((
        "PeriodSeconds",
        time_attr(partition.period_seconds).as_str(),
    ));
    elem.push_attribute((
        "PeriodDurationSeconds",
        time_attr(partition.period_duration_seconds).as_str(),
    ));
    write(writer, Event::Start(elem))?;

    for window in &partition.windows {
        write(writer, Event::Empty(window_element(window)))?;
    }
    for (window_id, core) in core_assignments(partition) {
        let mut elem = BytesStart::new("Window_Core_Assignment");
        elem.push_attribute(("WindowIdentifier", window_id));
        elem.push_attribute(("CoreIndex", core.to_string().as_str()));
        write(writer, Event::Empty(elem))?;
    }

    write(writer, Event::End(BytesEnd::new("Partition_Schedule")))
}

/// Renders a schedule as interchange text.
///
/// # Errors
/// [`ExportError`] if the writer fails or produces invalid UTF-8.
pub fn to_interchange_text(schedule: &ModuleSchedule) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', INDENT);
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write(&mut writer, Event::Start(BytesStart::new("ARINC_653_Module")))?;

    let mut module = BytesStart::new("Module_Schedule");
    module.push_attribute(("ScheduleName", schedule.schedule_name.as_str()));
    module.push_attribute((
        "MajorFrameSeconds",
        time_attr(schedule.major_frame_seconds).as_str(),
    ));
    module.push_attribute((
        "RequiredCores",
        schedule.required_cores.to_string().as_str(),
    ));
    write(&mut writer, Event::Start(module))?;

    for partition in &schedule.partitions {
        write_partition(&mut writer, partition)?;
    }

    write(&mut writer, Event::End(BytesEnd::new("Module_Schedule")))?;
    write(&mut writer, Event::End(BytesEnd::new("ARINC_653_Module")))?;

    let text = String::from_utf8(writer.into_inner().into_inner())?;
    debug!(
        schedule = %schedule.schedule_name,
        bytes = text.len(),
        "schedule exported"
    );
    Ok(text)
}
