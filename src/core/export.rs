// DRCScope - core/export.rs
//
// CSV export of the flat record list and JSON export of the full dashboard.
// Core layer: writes to any Write trait object.

use crate::core::model::{Dashboard, ViolationRecord};
use crate::util::constants;
use crate::util::error::ExportError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Export records to CSV.
///
/// Writes: layer, rule, count, filename, Category. The column order and header
/// spelling are fixed for compatibility with existing spreadsheets.
pub fn export_csv<W: Write>(
    records: &[ViolationRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(constants::CSV_HEADER)
        .map_err(csv_err)?;

    let mut count = 0;
    for record in records {
        let count_field = record.count.to_string();
        csv_writer
            .write_record([
                record.layer.as_str(),
                record.rule.as_str(),
                count_field.as_str(),
                record.source_file.as_str(),
                record.category.label(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %export_path.display(), records = count, "CSV export written");
    Ok(count)
}

/// JSON envelope: the dashboard plus when it was produced.
#[derive(Serialize)]
struct DashboardDocument<'a> {
    tool: &'static str,
    version: &'static str,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    dashboard: &'a Dashboard,
}

/// Export the full dashboard as pretty-printed JSON.
pub fn export_json<W: Write>(
    dashboard: &Dashboard,
    writer: W,
    export_path: &Path,
    generated_at: DateTime<Utc>,
) -> Result<(), ExportError> {
    let document = DashboardDocument {
        tool: constants::APP_NAME,
        version: constants::APP_VERSION,
        generated_at,
        dashboard,
    };
    serde_json::to_writer_pretty(writer, &document).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %export_path.display(), "JSON export written");
    Ok(())
}
