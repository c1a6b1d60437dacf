//! Inline keyboards.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::strings::{Lang, Msg, text};

/// Language selection keyboard, three buttons per row.
pub fn language_keyboard() -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = Lang::ALL
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .map(|lang| {
                    InlineKeyboardButton::callback(
                        lang.button_label(),
                        format!("lang_{}", lang.code()),
                    )
                })
                .collect()
        })
        .collect();

    InlineKeyboardMarkup::new(rows)
}

/// Main menu: task and word management buttons.
pub fn main_keyboard(lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback(text(lang, Msg::GetTaskButton), "get_task"),
            InlineKeyboardButton::callback(text(lang, Msg::AddWordsButton), "add_words"),
        ],
        vec![InlineKeyboardButton::callback(
            text(lang, Msg::ResetWordsButton),
            "reset_words",
        )],
    ])
}

/// Main menu plus the operator statistics button.
pub fn admin_keyboard(lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback(text(lang, Msg::GetTaskButton), "get_task"),
            InlineKeyboardButton::callback(text(lang, Msg::AddWordsButton), "add_words"),
        ],
        vec![
            InlineKeyboardButton::callback(text(lang, Msg::ResetWordsButton), "reset_words"),
            InlineKeyboardButton::callback(text(lang, Msg::AdminStatsButton), "admin_stats"),
        ],
    ])
}

/// Import source selection.
pub fn import_keyboard(lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback(text(lang, Msg::ImportTextButton), "import_text"),
            InlineKeyboardButton::callback(text(lang, Msg::ImportCsvButton), "import_csv"),
        ],
        vec![
            InlineKeyboardButton::callback(text(lang, Msg::ImportSheetButton), "import_gsheet"),
            InlineKeyboardButton::callback(text(lang, Msg::ImportNotionButton), "import_notion"),
        ],
    ])
}

/// Yes/no confirmation for the word reset.
pub fn reset_confirm_keyboard(lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(text(lang, Msg::ConfirmYes), "reset_confirm_yes"),
        InlineKeyboardButton::callback(text(lang, Msg::ConfirmNo), "reset_confirm_no"),
    ]])
}
