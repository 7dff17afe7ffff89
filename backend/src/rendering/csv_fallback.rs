//! CSV document used when the engine cannot produce a spreadsheet

use shared::{ReportEnvelope, REPORT_COLUMNS};

use crate::error::{AppError, AppResult};

/// Render the report table as CSV: a header row then one record per crop
///
/// Fields containing delimiters, quotes or line breaks are quoted, so every
/// record parses back into exactly [`REPORT_COLUMNS`]`.len()` fields.
pub fn render_csv(envelope: &ReportEnvelope) -> AppResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    wtr.write_record(REPORT_COLUMNS)
        .map_err(|e| AppError::Render(format!("CSV serialization error: {}", e)))?;
    for row in &envelope.datas {
        wtr.write_record(row.tabular_fields())
            .map_err(|e| AppError::Render(format!("CSV serialization error: {}", e)))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Render(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Render(format!("UTF-8 conversion error: {}", e)))
}
