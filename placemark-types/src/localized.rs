use serde::{Deserialize, Serialize};

/// A name in a single language.
///
/// The language is an ISO 639-1 code, or an ISO 639-2 code where no
/// two-letter code exists. It is stored trimmed and lowercase.
///
/// # Examples
///
/// ```
/// use placemark_types::localized::LocalizedText;
///
/// let name = LocalizedText::new(" DE ", "Hauptbahnhof");
/// assert_eq!(name.language(), "de");
/// assert_eq!(name.text(), "Hauptbahnhof");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedText {
    language: String,
    text: String,
}

impl LocalizedText {
    pub fn new(language: impl AsRef<str>, text: impl Into<String>) -> Self {
        Self {
            language: language.as_ref().trim().to_ascii_lowercase(),
            text: text.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Case-insensitive language comparison.
    pub fn is_language(&self, language: &str) -> bool {
        self.language.eq_ignore_ascii_case(language.trim())
    }
}

/// Two- or three-letter ASCII alphabetic code.
pub fn is_valid_language_code(code: &str) -> bool {
    (2..=3).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_alphabetic())
}
