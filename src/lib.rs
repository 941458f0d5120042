//! Spreadsheet to ReqIF conversion
//!
//! Requirements and their trace relations are read from workbook rows, held in
//! an in-memory [`Document`], and written out as a ReqIF 1.0 XML file.

pub mod domain;
pub use domain::{Config, Document, DocumentError, NewRequirement, SchemaCatalog};

/// Mapping workbook rows onto a document.
pub mod import;
pub use import::{ImportReport, Warning, map_rows};

/// Workbook input, ReqIF encoding and output files.
pub mod storage;
pub use storage::{WorkbookError, encode, read_sheets, write_document};
