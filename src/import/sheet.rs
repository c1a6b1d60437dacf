//! Google Sheets import: resolve the share link to its CSV export and
//! delegate to the CSV parser.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use super::{CsvImporter, ImportError, ParsedWords};

#[allow(clippy::expect_used)]
static SHEET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid regex"));

/// Imports words from a public Google Sheets spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetImporter {
    http: reqwest::Client,
}

impl SheetImporter {
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Resolves the spreadsheet URL and parses its CSV export.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not look like a Google Sheets
    /// link or the export cannot be fetched.
    pub async fn parse(&self, url: &str) -> Result<ParsedWords, ImportError> {
        let sheet_id = SHEET_ID_RE
            .captures(url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or(ImportError::InvalidSheetUrl)?;

        let csv_url =
            format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv");
        debug!("Fetching spreadsheet export: {}", csv_url);

        let response = self.http.get(&csv_url).send().await?;
        if !response.status().is_success() {
            return Err(ImportError::FetchFailed(response.status()));
        }

        let csv_text = response.text().await?;
        let parsed = CsvImporter.parse(&csv_text);
        info!(
            "Imported {} words from spreadsheet {}",
            parsed.words.len(),
            sheet_id
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_id_extraction() {
        let caps = SHEET_ID_RE
            .captures("https://docs.google.com/spreadsheets/d/1AbC-dEf_123/edit#gid=0")
            .unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "1AbC-dEf_123");
    }

    #[test]
    fn test_non_sheet_url_is_rejected() {
        assert!(SHEET_ID_RE.captures("https://example.com/words.csv").is_none());
    }
}
