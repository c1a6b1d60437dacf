//! Practice task rounds: sentence generation, usage matching and
//! message formatting.

mod formatter;
mod generator;

pub use formatter::{
    format_admin_stats, format_stats_message, format_task_message, format_words_added,
};
pub use generator::{TaskError, generate_sentences, matched_word_ids};
