//! Reading requirement and relation rows from `.xlsx` workbooks.

use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use tracing::{debug, instrument};

use crate::{
    domain::Config,
    import::{Cell, Row, Sheets},
};

/// Errors raised while reading a workbook.
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    /// The workbook could not be opened.
    #[error("failed to open workbook {}: {message}", path.display())]
    Open {
        /// Path of the workbook.
        path: PathBuf,
        /// Reason reported by the reader.
        message: String,
    },

    /// A required sheet is not present.
    #[error("workbook has no sheet named '{name}' (found: {})", available.join(", "))]
    MissingSheet {
        /// Name of the missing sheet.
        name: String,
        /// Sheets the workbook does contain.
        available: Vec<String>,
    },

    /// A sheet exists but could not be read.
    #[error("failed to read sheet '{name}': {message}")]
    Read {
        /// Name of the sheet.
        name: String,
        /// Reason reported by the reader.
        message: String,
    },
}

/// Reads the requirement and relation sheets named in `config`.
///
/// Both sheets must exist. The first row of each sheet holds the column
/// headers; fully blank rows are skipped.
///
/// # Errors
///
/// Returns a [`WorkbookError`] if the workbook cannot be opened, a sheet is
/// missing, or a sheet cannot be parsed.
#[instrument(skip(config))]
pub fn read_sheets(path: &Path, config: &Config) -> Result<Sheets, WorkbookError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e: calamine::XlsxError| {
        WorkbookError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let requirements = read_sheet(&mut workbook, &config.requirements_sheet)?;
    let relations = read_sheet(&mut workbook, &config.relations_sheet)?;

    debug!(
        requirements = requirements.len(),
        relations = relations.len(),
        "read workbook rows"
    );

    Ok(Sheets {
        requirements,
        relations,
    })
}

fn read_sheet<R>(workbook: &mut Xlsx<R>, name: &str) -> Result<Vec<Row>, WorkbookError>
where
    R: std::io::Read + std::io::Seek,
{
    let available = workbook.sheet_names();
    if !available.iter().any(|sheet| sheet == name) {
        return Err(WorkbookError::MissingSheet {
            name: name.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(name)
        .map_err(|e| WorkbookError::Read {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    Ok(rows_from_range(&range))
}

/// Converts a sheet range into rows keyed by the normalized header row.
pub(crate) fn rows_from_range(range: &Range<Data>) -> Vec<Row> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(ToString::to_string).collect();

    rows.map(|cells| {
        headers
            .iter()
            .zip(cells)
            .map(|(header, data)| (header.as_str(), cell(data)))
            .collect::<Row>()
    })
    .filter(|row| !row.is_blank())
    .collect()
}

#[allow(clippy::cast_precision_loss)]
fn cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(n) => Cell::Number(*n),
        Data::String(s) => Cell::from(s.as_str()),
        other => Cell::Text(other.to_string()),
    }
}
