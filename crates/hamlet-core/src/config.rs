//! Site-wide configuration shared with handlers and the view layer.

use std::collections::BTreeMap;

use serde::Deserialize;

/// One language the site serves.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Language {
    /// Short id, e.g. `en`. Appears in the `lang` cookie and `/lang/{id}`.
    pub id: String,
    /// Display name in the language itself.
    pub name: String,
}

/// Supported languages and the per-language texts behind `{{t:key}}`
/// lookups, as loaded from the embedded catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct TextCatalog {
    pub languages: Vec<Language>,
    pub texts: BTreeMap<String, BTreeMap<String, String>>,
}

/// Site identity, languages, and the text catalog. Built once at boot and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub default_language: String,
    pub languages: Vec<Language>,
    texts: BTreeMap<String, BTreeMap<String, String>>,
}

impl SiteConfig {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        default_language: impl Into<String>,
        catalog: TextCatalog,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            default_language: default_language.into(),
            languages: catalog.languages,
            texts: catalog.texts,
        }
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l.id == lang)
    }

    pub fn language(&self, id: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.id == id)
    }

    /// Looks up a catalog text, falling back to the default language and
    /// finally to the key itself.
    pub fn text<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        self.texts
            .get(lang)
            .and_then(|texts| texts.get(key))
            .or_else(|| {
                self.texts
                    .get(&self.default_language)
                    .and_then(|texts| texts.get(key))
            })
            .map(String::as_str)
            .unwrap_or(key)
    }
}
