//! Notion database import.
//!
//! Queries a shared Notion database over the HTTP API and maps the
//! `Hanzi` title, `Pinyin` rich-text and `Перевод` rich-text properties
//! to word entries. Rows missing any of the three are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use super::{ImportError, ParsedWords};
use crate::store::NewWord;

const NOTION_API_VERSION: &str = "2022-06-28";

#[allow(clippy::expect_used)]
static NOTION_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/([\w-]+)\?").expect("valid regex"));

/// Imports words from a Notion database link.
#[derive(Debug, Clone)]
pub struct NotionImporter {
    http: reqwest::Client,
    token: String,
}

impl NotionImporter {
    #[must_use]
    pub fn new(http: reqwest::Client, token: String) -> Self {
        Self { http, token }
    }

    /// Queries the database behind the link and maps its rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not contain a database id or the
    /// Notion API call fails.
    pub async fn parse(&self, url: &str) -> Result<ParsedWords, ImportError> {
        let database_id = extract_database_id(url).ok_or(ImportError::InvalidNotionUrl)?;
        debug!("Querying Notion database {}", database_id);

        let response = self
            .http
            .post(format!(
                "https://api.notion.com/v1/databases/{database_id}/query"
            ))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_API_VERSION)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImportError::FetchFailed(response.status()));
        }

        let data: Value = response.json().await?;
        let parsed = map_rows(&data);
        info!(
            "Imported {} words from Notion database {}",
            parsed.words.len(),
            database_id
        );
        Ok(parsed)
    }
}

/// Pulls the database id out of a Notion share link: the last
/// dash-separated piece of the path segment before the query string.
fn extract_database_id(url: &str) -> Option<&str> {
    let segment = NOTION_ID_RE.captures(url)?.get(1)?.as_str();
    segment.rsplit('-').next()
}

fn map_rows(data: &Value) -> ParsedWords {
    let mut result = ParsedWords::default();

    let rows = data
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for (index, row) in rows.iter().enumerate() {
        let hanzi = property_text(row, "Hanzi", "title");
        let pinyin = property_text(row, "Pinyin", "rich_text");
        let translation = property_text(row, "Перевод", "rich_text");

        let (Some(hanzi), Some(pinyin), Some(translation)) = (hanzi, pinyin, translation) else {
            result.skipped.push(format!("row {}", index + 1));
            continue;
        };

        result.words.push(NewWord {
            word: hanzi.clone(),
            hanzi,
            pinyin,
            translation,
        });
    }

    result
}

fn property_text(row: &Value, name: &str, kind: &str) -> Option<String> {
    let text = row
        .get("properties")?
        .get(name)?
        .get(kind)?
        .get(0)?
        .get("plain_text")?
        .as_str()?;

    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_id_from_share_link() {
        let id = extract_database_id("https://www.notion.so/ws/Words-8a1b2c3d4e5f?v=abc");
        assert_eq!(id, Some("8a1b2c3d4e5f"));
    }

    #[test]
    fn test_link_without_query_is_rejected() {
        assert!(extract_database_id("https://www.notion.so/ws/plainpage").is_none());
    }

    #[test]
    fn test_map_rows_skips_incomplete() {
        let data = serde_json::json!({
            "results": [
                {
                    "properties": {
                        "Hanzi": { "title": [{ "plain_text": "你好" }] },
                        "Pinyin": { "rich_text": [{ "plain_text": "nǐ hǎo" }] },
                        "Перевод": { "rich_text": [{ "plain_text": "привет" }] }
                    }
                },
                {
                    "properties": {
                        "Hanzi": { "title": [{ "plain_text": "谢谢" }] },
                        "Pinyin": { "rich_text": [] },
                        "Перевод": { "rich_text": [{ "plain_text": "спасибо" }] }
                    }
                }
            ]
        });

        let parsed = map_rows(&data);
        assert_eq!(parsed.words.len(), 1);
        assert_eq!(parsed.words[0].hanzi, "你好");
        assert_eq!(parsed.words[0].word, "你好");
        assert_eq!(parsed.skipped, vec!["row 2".to_owned()]);
    }
}
