//! Localized message strings and language detection.
//!
//! English and Russian are fully translated; the remaining supported
//! locales currently fall back to English.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Interface languages a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ru,
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Zh,
}

impl Lang {
    /// All supported languages, in keyboard display order.
    pub const ALL: [Self; 8] = [
        Self::Ru,
        Self::En,
        Self::Zh,
        Self::Es,
        Self::Fr,
        Self::De,
        Self::It,
        Self::Pt,
    ];

    /// Two-letter language code used in storage and callback data.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Zh => "zh",
        }
    }

    /// English name of the language, used in AI prompts.
    #[must_use]
    pub fn english_name(self) -> &'static str {
        match self {
            Self::Ru => "Russian",
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
            Self::It => "Italian",
            Self::Pt => "Portuguese",
            Self::Zh => "Chinese",
        }
    }

    /// Label shown on the language selection keyboard.
    #[must_use]
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Ru => "🇷🇺 Русский",
            Self::En => "🇬🇧 English",
            Self::Es => "🇪🇸 Español",
            Self::Fr => "🇫🇷 Français",
            Self::De => "🇩🇪 Deutsch",
            Self::It => "🇮🇹 Italiano",
            Self::Pt => "🇵🇹 Português",
            Self::Zh => "🇨🇳 中文",
        }
    }

    /// Detects the interface language from a Telegram `language_code`.
    ///
    /// Unknown or absent codes fall back to English.
    #[must_use]
    pub fn detect(language_code: Option<&str>) -> Self {
        language_code
            .map(|code| code.to_lowercase())
            .as_deref()
            .map(|code| code.get(..2).unwrap_or(code))
            .and_then(|short| short.parse().ok())
            .unwrap_or(Self::En)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown language code.
#[derive(Debug, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnknownLang(pub String);

impl FromStr for Lang {
    type Err = UnknownLang;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ru" => Ok(Self::Ru),
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            "fr" => Ok(Self::Fr),
            "de" => Ok(Self::De),
            "it" => Ok(Self::It),
            "pt" => Ok(Self::Pt),
            "zh" => Ok(Self::Zh),
            other => Err(UnknownLang(other.to_owned())),
        }
    }
}

/// Keys for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Welcome,
    LangPick,
    LangSelected,
    AddWordsInstruction,
    GetTaskButton,
    AddWordsButton,
    ResetWordsButton,
    AdminStatsButton,
    ImportTextButton,
    ImportCsvButton,
    ImportSheetButton,
    ImportNotionButton,
    SendWordsText,
    SendCsvFile,
    SendSheetLink,
    SendNotionLink,
    IdleHint,
    NoWordsError,
    TaskPrompt,
    WordsAdded,
    WordsImportError,
    SkippedLinesHeader,
    TaskGenerationError,
    HelpMessage,
    StatsMessage,
    StatsNoWords,
    ResetConfirmation,
    ConfirmYes,
    ConfirmNo,
    ResetSuccess,
    ResetCanceled,
    AdminStatsMessage,
    PermissionDenied,
    UserNotFound,
    GenericError,
}

/// Returns the message text for the given language.
#[must_use]
pub fn text(lang: Lang, msg: Msg) -> &'static str {
    match lang {
        Lang::Ru => ru(msg),
        _ => en(msg),
    }
}

/// Substitutes `{name}` placeholders in a message template.
#[must_use]
pub fn render(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_owned();
    for (name, value) in vars {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

fn en(msg: Msg) -> &'static str {
    match msg {
        Msg::Welcome => {
            "👋 Welcome to the Chinese language learning bot!\n\nSelect interface language:"
        }
        Msg::LangPick => "🌍 Choose language",
        Msg::LangSelected => "✅ Interface language changed",
        Msg::AddWordsInstruction => {
            "📚 Now add words to study. Send text, one entry per line:\n\
             hanzi|pinyin|translation\n\n\
             Examples:\n• 你好\n• 你好 | hello\n• 你好 | nǐ hǎo | hello"
        }
        Msg::GetTaskButton => "📝 Get new task",
        Msg::AddWordsButton => "📌 Add words",
        Msg::ResetWordsButton => "🔄 Reset words",
        Msg::AdminStatsButton => "📊 Admin Stats",
        Msg::ImportTextButton => "✍️ Plain text",
        Msg::ImportCsvButton => "📁 CSV file",
        Msg::ImportSheetButton => "🔗 Google Sheets",
        Msg::ImportNotionButton => "🔗 Notion database",
        Msg::SendWordsText => {
            "✍️ Send your words as text, one entry per line: hanzi|pinyin|translation"
        }
        Msg::SendCsvFile => "📁 Please send a CSV file with your words (word,pinyin,hanzi,translation).",
        Msg::SendSheetLink => "🔗 Send a link to a public Google Sheets spreadsheet.",
        Msg::SendNotionLink => "🔗 Send a link to a Notion database.",
        Msg::IdleHint => {
            "To add words, press the «📌 Add words» button first.\n\nExamples:\n\
             • 你好\n• 你好 | hello\n• 你好 | nǐ hǎo | hello"
        }
        Msg::NoWordsError => "⚠️ You don't have any words added yet. Add words to study!",
        Msg::TaskPrompt => "✨ Practice with these sentences:",
        Msg::WordsAdded => "✅ Words successfully added!",
        Msg::WordsImportError => "❌ Error importing words. Check format and try again.",
        Msg::SkippedLinesHeader => "⚠️ Skipped lines with errors:",
        Msg::TaskGenerationError => "❌ Error generating task. Please try later.",
        Msg::HelpMessage => {
            "ℹ️ Bot commands:\n/start - Start\n/language - Change language\n\
             /help - Show help\n/stats - Show word statistics\n/reset - Reset all your words\n\n\
             Word addition format:\nhanzi|pinyin|translation"
        }
        Msg::StatsMessage => {
            "📊 Your word statistics:\n\nTotal words: {total}\nUsed in tasks: {used}\n\
             Not yet used: {unused}\n\nYour most used words:\n{top_words}"
        }
        Msg::StatsNoWords => "⚠️ You don't have any words added yet to show statistics.",
        Msg::ResetConfirmation => {
            "⚠️ Are you sure you want to delete all your words? This action cannot be undone."
        }
        Msg::ConfirmYes => "Yes, delete all",
        Msg::ConfirmNo => "No, keep my words",
        Msg::ResetSuccess => {
            "✅ All your words have been deleted. You can start adding new words now."
        }
        Msg::ResetCanceled => "✅ Operation canceled. Your words are safe.",
        Msg::AdminStatsMessage => {
            "📊 Admin Statistics:\n\nTotal users: {users_count}\nTotal words: {words_count}\n\
             Average words per user: {avg_words}"
        }
        Msg::PermissionDenied => "⛔ You don't have permission to use this command.",
        Msg::UserNotFound => "❌ User not found. Try using /start",
        Msg::GenericError => "🚫 An error occurred. Please try again later.",
    }
}

fn ru(msg: Msg) -> &'static str {
    match msg {
        Msg::Welcome => {
            "👋 Добро пожаловать в бот для изучения китайского языка!\n\nВыберите язык интерфейса:"
        }
        Msg::LangPick => "🌍 Выберите язык",
        Msg::LangSelected => "✅ Язык интерфейса изменен",
        Msg::AddWordsInstruction => {
            "📚 Теперь добавьте слова для изучения. Отправьте текст, по одной записи в строке:\n\
             иероглиф|пиньинь|перевод\n\n\
             Примеры:\n• 你好\n• 你好 | привет\n• 你好 | nǐ hǎo | привет"
        }
        Msg::GetTaskButton => "📝 Получить новое задание",
        Msg::AddWordsButton => "📌 Добавить слова",
        Msg::ResetWordsButton => "🔄 Сбросить слова",
        Msg::AdminStatsButton => "📊 Статистика админа",
        Msg::ImportTextButton => "✍️ Текстом",
        Msg::ImportCsvButton => "📁 CSV-файл",
        Msg::ImportSheetButton => "🔗 Google Sheets",
        Msg::ImportNotionButton => "🔗 База Notion",
        Msg::SendWordsText => {
            "✍️ Отправьте слова текстом, по одной записи в строке: иероглиф|пиньинь|перевод"
        }
        Msg::SendCsvFile => {
            "📁 Пожалуйста, отправьте CSV-файл с вашими словами (word,pinyin,hanzi,translation)."
        }
        Msg::SendSheetLink => "🔗 Отправьте ссылку на публичную таблицу Google Sheets.",
        Msg::SendNotionLink => "🔗 Отправьте ссылку на базу Notion.",
        Msg::IdleHint => {
            "Чтобы добавить слова, сначала нажмите кнопку «📌 Добавить слова».\n\nПримеры:\n\
             • 你好\n• 你好 | привет\n• 你好 | nǐ hǎo | привет"
        }
        Msg::NoWordsError => {
            "⚠️ У вас пока нет добавленных слов. Добавьте слова для изучения!"
        }
        Msg::TaskPrompt => "✨ Потренируйтесь с этими предложениями:",
        Msg::WordsAdded => "✅ Слова успешно добавлены!",
        Msg::WordsImportError => {
            "❌ Ошибка при импорте слов. Проверьте формат и попробуйте еще раз."
        }
        Msg::SkippedLinesHeader => "⚠️ Пропущены строки с ошибками:",
        Msg::TaskGenerationError => "❌ Ошибка при генерации задания. Попробуйте позже.",
        Msg::HelpMessage => {
            "ℹ️ Команды бота:\n/start - Начать работу\n/language - Сменить язык\n\
             /help - Показать помощь\n/stats - Показать статистику слов\n\
             /reset - Сбросить все ваши слова\n\n\
             Формат добавления слов:\nиероглиф|пиньинь|перевод"
        }
        Msg::StatsMessage => {
            "📊 Статистика ваших слов:\n\nВсего слов: {total}\nИспользовано в заданиях: {used}\n\
             Еще не использовано: {unused}\n\nСлова, которые вы использовали больше всего:\n{top_words}"
        }
        Msg::StatsNoWords => {
            "⚠️ У вас пока нет добавленных слов для отображения статистики."
        }
        Msg::ResetConfirmation => {
            "⚠️ Вы уверены, что хотите удалить все ваши слова? Это действие нельзя отменить."
        }
        Msg::ConfirmYes => "Да, удалить все",
        Msg::ConfirmNo => "Нет, сохранить слова",
        Msg::ResetSuccess => {
            "✅ Все ваши слова были удалены. Вы можете начать добавлять новые слова."
        }
        Msg::ResetCanceled => "✅ Операция отменена. Ваши слова в безопасности.",
        Msg::AdminStatsMessage => {
            "📊 Статистика администратора:\n\nВсего пользователей: {users_count}\n\
             Всего слов: {words_count}\nСреднее количество слов на пользователя: {avg_words}"
        }
        Msg::PermissionDenied => "⛔ У вас нет прав для использования этой команды.",
        Msg::UserNotFound => "❌ Пользователь не найден. Используйте /start",
        Msg::GenericError => "🚫 Произошла ошибка. Попробуйте позже.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_code() {
        assert_eq!(Lang::detect(Some("ru")), Lang::Ru);
        assert_eq!(Lang::detect(Some("zh-hans")), Lang::Zh);
        assert_eq!(Lang::detect(Some("pt-BR")), Lang::Pt);
    }

    #[test]
    fn test_detect_unknown_falls_back_to_english() {
        assert_eq!(Lang::detect(Some("xx")), Lang::En);
        assert_eq!(Lang::detect(None), Lang::En);
    }

    #[test]
    fn test_code_round_trip() {
        for lang in Lang::ALL {
            assert_eq!(lang.code().parse::<Lang>().ok(), Some(lang));
        }
    }

    #[test]
    fn test_russian_is_translated() {
        assert_ne!(text(Lang::Ru, Msg::Welcome), text(Lang::En, Msg::Welcome));
    }

    #[test]
    fn test_other_locales_fall_back_to_english() {
        assert_eq!(text(Lang::De, Msg::Welcome), text(Lang::En, Msg::Welcome));
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let out = render("Total: {total}, used: {used}", &[
            ("total", "5".to_owned()),
            ("used", "2".to_owned()),
        ]);
        assert_eq!(out, "Total: 5, used: 2");
    }
}
