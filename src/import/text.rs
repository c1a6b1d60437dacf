//! Pipe-delimited text import.

use tracing::debug;

use super::ParsedWords;
use crate::store::NewWord;

const SEPARATOR: char = '|';

/// Parses `hanzi|pinyin|translation` lines, one entry per line.
///
/// Shorter forms are accepted positionally: a single field is a
/// hanzi-only entry, two fields are `hanzi|translation`. Fields past the
/// third are ignored.
#[derive(Debug, Default)]
pub struct TextImporter;

impl TextImporter {
    /// Parses raw message text into word entries.
    #[must_use]
    pub fn parse(&self, raw: &str) -> ParsedWords {
        let mut result = ParsedWords::default();

        for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let parts: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();

            let (hanzi, pinyin, translation) = match parts.as_slice() {
                [hanzi] => (*hanzi, "", ""),
                [hanzi, translation] => (*hanzi, "", *translation),
                [hanzi, pinyin, translation, ..] => (*hanzi, *pinyin, *translation),
                [] => ("", "", ""),
            };

            if hanzi.is_empty() {
                debug!("Dropping invalid import line: {}", line);
                result.skipped.push(line.to_owned());
                continue;
            }

            result.words.push(NewWord {
                word: hanzi.to_owned(),
                hanzi: hanzi.to_owned(),
                pinyin: pinyin.to_owned(),
                translation: translation.to_owned(),
            });
        }

        debug!(
            "Parsed {} words, skipped {} lines",
            result.words.len(),
            result.skipped.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_part_line() {
        let parsed = TextImporter.parse("你好|nǐ hǎo|привет");

        assert_eq!(parsed.words.len(), 1);
        let word = &parsed.words[0];
        assert_eq!(word.hanzi, "你好");
        assert_eq!(word.pinyin, "nǐ hǎo");
        assert_eq!(word.translation, "привет");
        assert_eq!(word.word, "你好");
    }

    #[test]
    fn test_hanzi_only_line() {
        let parsed = TextImporter.parse("你好");

        assert_eq!(parsed.words.len(), 1);
        let word = &parsed.words[0];
        assert_eq!(word.hanzi, "你好");
        assert_eq!(word.word, "你好");
        assert!(word.pinyin.is_empty());
        assert!(word.translation.is_empty());
    }

    #[test]
    fn test_two_part_line() {
        let parsed = TextImporter.parse("你好 | привет");

        assert_eq!(parsed.words.len(), 1);
        let word = &parsed.words[0];
        assert_eq!(word.hanzi, "你好");
        assert_eq!(word.translation, "привет");
        assert!(word.pinyin.is_empty());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let parsed = TextImporter.parse("你好|nǐ hǎo|привет|hello|extra");

        assert_eq!(parsed.words.len(), 1);
        assert_eq!(parsed.words[0].translation, "привет");
    }

    #[test]
    fn test_empty_hanzi_is_dropped() {
        let parsed = TextImporter.parse("|ni hao|hello");

        assert!(parsed.words.is_empty());
        assert_eq!(parsed.skipped, vec!["|ni hao|hello".to_owned()]);
    }

    #[test]
    fn test_mixed_input_keeps_valid_lines() {
        let parsed = TextImporter.parse("你好|nǐ hǎo|привет\n\n|bad\n谢谢");

        assert_eq!(parsed.words.len(), 2);
        assert_eq!(parsed.skipped.len(), 1);
    }
}
