//! Localised string container.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Localised strings as returned by the census API.
///
/// The `tr` locale is ignored; it was abandoned upstream and is generally
/// missing or unpopulated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleData {
    #[serde(default)]
    pub de: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub es: Option<String>,
    #[serde(default)]
    pub fr: Option<String>,
    #[serde(default)]
    pub it: Option<String>,
}

impl LocaleData {
    /// An instance without any strings, used for `NULL` payloads.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a locale by its two-letter code.
    pub fn get(&self, locale: &str) -> Option<&str> {
        let value = match locale {
            "de" => &self.de,
            "en" => &self.en,
            "es" => &self.es,
            "fr" => &self.fr,
            "it" => &self.it,
            _ => return None,
        };
        value.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.de.is_none()
            && self.en.is_none()
            && self.es.is_none()
            && self.fr.is_none()
            && self.it.is_none()
    }
}

impl fmt::Display for LocaleData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.en.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_lookup() {
        let data: LocaleData =
            serde_json::from_str(r#"{"en": "Gauss SAW", "de": "Gauß-SAW", "tr": "x"}"#)
                .expect("Failed to decode");

        assert_eq!(data.get("en"), Some("Gauss SAW"));
        assert_eq!(data.get("de"), Some("Gauß-SAW"));
        assert_eq!(data.get("fr"), None);
        assert_eq!(data.get("tr"), None);
        assert_eq!(data.to_string(), "Gauss SAW");
    }

    #[test]
    fn test_locale_empty() {
        let data = LocaleData::empty();
        assert!(data.is_empty());
        assert_eq!(data.to_string(), "");
    }
}
