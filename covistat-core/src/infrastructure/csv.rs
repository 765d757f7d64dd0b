// covistat-core/src/infrastructure/csv.rs

// Adapter CSV : lecture brute (header + records en chaînes) et
// sérialisation des artefacts. Le typage des colonnes reste au domaine.

use std::path::Path;

use crate::domain::summary::GroupSummary;
use crate::domain::table::Table;
use crate::infrastructure::error::InfrastructureError;

/// Header row plus raw string records, exactly as found in the file.
pub struct RawRecords {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

/// Read a delimited file into raw string records.
///
/// The reader is strict: a row whose width differs from the header is an
/// error, not a silent pad/truncate.
pub fn read_delimited(path: &Path) -> Result<RawRecords, InfrastructureError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(RawRecords { headers, records })
}

/// Serialize one summary as `key,metric` CSV bytes.
pub fn summary_to_csv(summary: &GroupSummary) -> Result<Vec<u8>, InfrastructureError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([summary.key_name.as_str(), summary.metric_name.as_str()])?;
    for (group, value) in &summary.rows {
        writer.write_record([group.as_str(), value.render().as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(e.into_error()))
}

/// Serialize a whole table (all columns, given row order) as CSV bytes.
pub fn table_to_csv(table: &Table) -> Result<Vec<u8>, InfrastructureError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let header: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    writer.write_record(&header)?;
    for row in table.rows() {
        let record: Vec<String> = row.iter().map(|cell| cell.render()).collect();
        writer.write_record(&record)?;
    }
    writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(e.into_error()))
}
