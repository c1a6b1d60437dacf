//! Word import parsers.
//!
//! Every parser converts raw input into validated [`NewWord`] records,
//! silently dropping invalid lines: a parse never fails outright on
//! partially malformed input. The skipped lines are handed back so the
//! caller can report them to the user for correction.

mod csv;
mod notion;
mod sheet;
mod text;

use thiserror::Error;

use crate::store::NewWord;

pub use csv::CsvImporter;
pub use notion::NotionImporter;
pub use sheet::SheetImporter;
pub use text::TextImporter;

/// Outcome of one import: accepted entries plus the rejected raw lines.
#[derive(Debug, Default)]
pub struct ParsedWords {
    pub words: Vec<NewWord>,
    pub skipped: Vec<String>,
}

/// Errors from importers that resolve external links.
///
/// The line-level parsers never error; only link resolution and the
/// network fetch can fail as a whole.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid Google Sheets URL")]
    InvalidSheetUrl,

    #[error("Invalid Notion database URL")]
    InvalidNotionUrl,

    #[error("Notion integration token is not configured")]
    MissingNotionToken,

    #[error("Fetch failed with status {0}")]
    FetchFailed(reqwest::StatusCode),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
