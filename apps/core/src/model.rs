use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Tr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Tr];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tr => "tr",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::En => Self::Tr,
            Self::Tr => Self::En,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::En
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "tr" => Ok(Self::Tr),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

/// Per-locale text. A missing locale reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tr: Option<String>,
}

impl LocalizedText {
    pub fn new(en: &str, tr: &str) -> Self {
        Self {
            en: Some(en.to_string()),
            tr: Some(tr.to_string()),
        }
    }

    pub fn only(locale: Locale, text: &str) -> Self {
        let mut value = Self::default();
        value.set(locale, text);
        value
    }

    pub fn get(&self, locale: Locale) -> &str {
        self.raw(locale).unwrap_or_default()
    }

    /// Text for `locale`, falling back to the other locale when missing or blank.
    pub fn get_or_fallback(&self, locale: Locale) -> &str {
        match self.raw(locale) {
            Some(text) if !text.trim().is_empty() => text,
            _ => self.get(locale.other()),
        }
    }

    pub fn set(&mut self, locale: Locale, text: &str) {
        let slot = match locale {
            Locale::En => &mut self.en,
            Locale::Tr => &mut self.tr,
        };
        *slot = Some(text.to_string());
    }

    fn raw(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::En => self.en.as_deref(),
            Locale::Tr => self.tr.as_deref(),
        }
    }
}

/// One searchable calculator, immutable once the catalog is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    pub id: String,
    pub category: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub keywords: Vec<String>,
    pub slug: LocalizedText,
    pub popular: bool,
}

impl CatalogEntry {
    pub fn new(id: &str, category: &str, title: LocalizedText) -> Self {
        Self {
            id: id.to_string(),
            category: category.to_string(),
            title,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = description;
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_slug(mut self, slug: LocalizedText) -> Self {
        self.slug = slug;
        self
    }

    pub fn popular(mut self) -> Self {
        self.popular = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Title,
    Description,
    Keywords,
    Category,
}

pub type MatchedFields = BTreeSet<MatchedField>;

/// A scored catalog entry for one query. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub entry: Arc<CatalogEntry>,
    pub score: u32,
    pub matched_fields: MatchedFields,
    title_key: String,
}

impl SearchResult {
    pub fn new(
        entry: Arc<CatalogEntry>,
        locale: Locale,
        score: u32,
        matched_fields: MatchedFields,
    ) -> Self {
        let title_key = normalize(entry.title.get_or_fallback(locale));
        Self::with_title_key(entry, title_key, score, matched_fields)
    }

    /// Same as [`Self::new`] with the normalized title supplied by the caller.
    pub fn with_title_key(
        entry: Arc<CatalogEntry>,
        title_key: String,
        score: u32,
        matched_fields: MatchedFields,
    ) -> Self {
        Self {
            entry,
            score,
            matched_fields,
            title_key,
        }
    }

    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn category(&self) -> &str {
        &self.entry.category
    }

    /// Normalized active-locale title used for alphabetical tie-breaks.
    pub fn title_key(&self) -> &str {
        &self.title_key
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearch {
    pub query: String,
    pub timestamp: u64,
}
