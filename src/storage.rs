mod output;
/// ReqIF XML serialization.
pub mod reqif;
mod workbook;
mod xml;

pub use output::write_document;
pub use reqif::encode;
pub use workbook::{WorkbookError, read_sheets};
