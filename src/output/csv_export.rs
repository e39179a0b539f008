//! CSV export of leads
//!
//! Columns follow [`Lead::FIELDS`]. Records end in CRLF and fields are quoted
//! only when they need it.

use crate::output::traits::{OutputError, OutputResult};
use crate::state::Lead;
use csv::{Terminator, Writer, WriterBuilder};
use std::io;
use std::path::Path;

/// Writes leads as CSV with a header row
///
/// # Arguments
///
/// * `leads` - The leads to export, written in order
/// * `output_path` - Destination file, created or truncated
///
/// # Returns
///
/// * `Ok(())` - The file was written and flushed
/// * `Err(OutputError)` - The file could not be created or written
pub fn write_csv(leads: &[Lead], output_path: &Path) -> OutputResult<()> {
    let mut writer = builder().from_path(output_path)?;
    write_leads(&mut writer, leads)?;
    writer.flush()?;
    Ok(())
}

/// Formats leads as CSV with a header row
pub fn format_csv(leads: &[Lead]) -> OutputResult<String> {
    let mut writer = builder().from_writer(Vec::new());
    write_leads(&mut writer, leads)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| OutputError::Write(e.to_string()))
}

fn builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder.terminator(Terminator::CRLF);
    builder
}

fn write_leads<W: io::Write>(writer: &mut Writer<W>, leads: &[Lead]) -> OutputResult<()> {
    writer.write_record(Lead::FIELDS)?;
    for lead in leads {
        writer.write_record(lead.fields())?;
    }
    Ok(())
}
