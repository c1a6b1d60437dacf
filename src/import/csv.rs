//! CSV import: `word,pinyin,hanzi,translation` rows.

use tracing::debug;

use super::ParsedWords;
use crate::store::NewWord;

/// Parses 4-column CSV content.
///
/// A header row is detected when the first cell case-insensitively
/// contains "word". Rows with fewer than four fields, or with any of the
/// four empty, are skipped.
#[derive(Debug, Default)]
pub struct CsvImporter;

impl CsvImporter {
    /// Parses raw CSV text into word entries.
    #[must_use]
    pub fn parse(&self, raw: &str) -> ParsedWords {
        let mut result = ParsedWords::default();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(raw.as_bytes());

        for (index, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    debug!("Dropping unreadable CSV row {}: {}", index + 1, e);
                    result.skipped.push(format!("row {}", index + 1));
                    continue;
                }
            };

            // Header row: first cell mentions "word".
            if index == 0
                && record
                    .get(0)
                    .is_some_and(|cell| cell.to_lowercase().contains("word"))
            {
                continue;
            }

            // Extra columns are tolerated, short rows are not.
            let fields: Vec<&str> = record.iter().collect();
            match build_entry(&fields) {
                Some(entry) => result.words.push(entry),
                None => result.skipped.push(fields.join(",")),
            }
        }

        debug!(
            "Parsed {} words from CSV, skipped {} rows",
            result.words.len(),
            result.skipped.len()
        );
        result
    }
}

fn build_entry(fields: &[&str]) -> Option<NewWord> {
    if fields.len() < 4 {
        return None;
    }

    let (word, pinyin, hanzi, translation) = (fields[0], fields[1], fields[2], fields[3]);
    if [word, pinyin, hanzi, translation].iter().any(|f| f.is_empty()) {
        return None;
    }

    Some(NewWord {
        word: hanzi.to_owned(),
        hanzi: hanzi.to_owned(),
        pinyin: pinyin.to_owned(),
        translation: translation.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row_is_skipped() {
        let parsed = CsvImporter.parse("word,pinyin,hanzi,translation\nhello,nǐ hǎo,你好,привет");

        assert_eq!(parsed.words.len(), 1);
        let word = &parsed.words[0];
        assert_eq!(word.hanzi, "你好");
        assert_eq!(word.pinyin, "nǐ hǎo");
        assert_eq!(word.translation, "привет");
    }

    #[test]
    fn test_headerless_csv() {
        let parsed = CsvImporter.parse("hello,nǐ hǎo,你好,привет\nthanks,xiè xie,谢谢,спасибо");

        assert_eq!(parsed.words.len(), 2);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_word_column_maps_to_hanzi() {
        let parsed = CsvImporter.parse("hello,nǐ hǎo,你好,привет");
        assert_eq!(parsed.words[0].word, "你好");
    }

    #[test]
    fn test_short_row_is_skipped() {
        let parsed = CsvImporter.parse("hello,nǐ hǎo,你好,привет\nonly,two");

        assert_eq!(parsed.words.len(), 1);
        assert_eq!(parsed.skipped.len(), 1);
    }

    #[test]
    fn test_empty_field_is_skipped() {
        let parsed = CsvImporter.parse("hello,,你好,привет");

        assert!(parsed.words.is_empty());
        assert_eq!(parsed.skipped.len(), 1);
    }
}
