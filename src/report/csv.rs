//! Delimited record rendering.

use super::{Report, ReportError};

/// Render the header and rows as comma-separated records, quoting only
/// fields that need it.
pub fn to_csv(report: &Report) -> Result<String, ReportError> {
    let mut writer = ::csv::WriterBuilder::new()
        .quote_style(::csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(report.columns())?;
    for row in report.rows() {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
