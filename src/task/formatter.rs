//! User-facing message formatting.

use crate::store::{GlobalStats, WordStats};
use crate::strings::{Lang, Msg, render, text};

/// Formats the practice task reply: header plus numbered sentences.
#[must_use]
pub fn format_task_message(lang: Lang, sentences: &[String]) -> String {
    let mut lines = vec![text(lang, Msg::TaskPrompt).to_owned(), String::new()];
    lines.extend(
        sentences
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s)),
    );
    lines.join("\n")
}

/// Formats the `/stats` reply.
#[must_use]
pub fn format_stats_message(lang: Lang, stats: &WordStats) -> String {
    let top_words = if stats.top_words.is_empty() {
        "-".to_owned()
    } else {
        stats
            .top_words
            .iter()
            .enumerate()
            .map(|(i, (line, times))| format!("{}. {line} ({times})", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };

    render(text(lang, Msg::StatsMessage), &[
        ("total", stats.total.to_string()),
        ("used", stats.used.to_string()),
        ("unused", stats.unused.to_string()),
        ("top_words", top_words),
    ])
}

/// Formats the operator statistics reply.
#[must_use]
pub fn format_admin_stats(lang: Lang, stats: &GlobalStats) -> String {
    render(text(lang, Msg::AdminStatsMessage), &[
        ("users_count", stats.users_count.to_string()),
        ("words_count", stats.words_count.to_string()),
        ("avg_words", stats.avg_words_per_user.to_string()),
    ])
}

/// Formats the import confirmation, listing any skipped lines.
#[must_use]
pub fn format_words_added(lang: Lang, added: usize, skipped: &[String]) -> String {
    let mut reply = format!("{} Words added: {added}", text(lang, Msg::WordsAdded));

    if !skipped.is_empty() {
        reply.push_str("\n\n");
        reply.push_str(text(lang, Msg::SkippedLinesHeader));
        for line in skipped {
            reply.push_str(&format!("\n- {line}"));
        }
    }

    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_message_numbers_sentences() {
        let message = format_task_message(Lang::En, &[
            "你好，老师。".to_owned(),
            "谢谢你。".to_owned(),
        ]);

        assert!(message.starts_with(text(Lang::En, Msg::TaskPrompt)));
        assert!(message.contains("1. 你好，老师。"));
        assert!(message.contains("2. 谢谢你。"));
    }

    #[test]
    fn test_stats_message_renders_counts() {
        let stats = WordStats {
            total: 3,
            used: 1,
            unused: 2,
            top_words: vec![("你好 (nǐ hǎo) - hello".to_owned(), 4)],
        };

        let message = format_stats_message(Lang::En, &stats);
        assert!(message.contains("Total words: 3"));
        assert!(message.contains("1. 你好 (nǐ hǎo) - hello (4)"));
    }

    #[test]
    fn test_stats_message_empty_top_words() {
        let stats = WordStats {
            total: 0,
            used: 0,
            unused: 0,
            top_words: vec![],
        };

        assert!(format_stats_message(Lang::En, &stats).contains("\n-"));
    }

    #[test]
    fn test_words_added_lists_skipped_lines() {
        let reply = format_words_added(Lang::En, 2, &["|bad|line".to_owned()]);

        assert!(reply.contains("Words added: 2"));
        assert!(reply.contains("- |bad|line"));
    }

    #[test]
    fn test_words_added_without_skipped() {
        let reply = format_words_added(Lang::En, 1, &[]);
        assert!(!reply.contains('-'));
    }
}
