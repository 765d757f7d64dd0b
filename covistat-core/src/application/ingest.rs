// covistat-core/src/application/ingest.rs

use std::path::Path;

use tracing::debug;

use crate::domain::error::DataLoadError;
use crate::domain::table::Table;
use crate::error::CovistatError;
use crate::infrastructure::csv::read_delimited;
use crate::infrastructure::error::InfrastructureError;

/// Load a delimited file, infer column types, and drop every row carrying
/// at least one missing value in any column.
///
/// Zero surviving rows is a valid outcome; only an unreadable or
/// unparseable file is a failure.
pub fn load_and_clean(path: &Path) -> Result<Table, CovistatError> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(path.display().to_string()).into());
    }

    let raw = read_delimited(path).map_err(|e| load_error(path, e))?;
    let table = Table::from_records(raw.headers, raw.records);

    let before = table.len();
    let clean = table.drop_incomplete();
    debug!(
        path = ?path,
        kept = clean.len(),
        dropped = before - clean.len(),
        "Dataset cleaned"
    );

    Ok(clean)
}

fn load_error(path: &Path, err: InfrastructureError) -> CovistatError {
    match err {
        InfrastructureError::Csv(csv_err) => {
            let message = csv_err.to_string();
            match csv_err.into_kind() {
                csv::ErrorKind::Io(io_err) => DataLoadError::Unreadable {
                    path: path.display().to_string(),
                    source: io_err,
                }
                .into(),
                _ => DataLoadError::Parse(message).into(),
            }
        }
        InfrastructureError::Io(io_err) => DataLoadError::Unreadable {
            path: path.display().to_string(),
            source: io_err,
        }
        .into(),
        other => CovistatError::Infrastructure(other),
    }
}
