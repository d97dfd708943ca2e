use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::model::{CatalogEntry, Locale, LocalizedText};
use crate::normalize::normalize;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("read failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog in '{path}': {message}")]
    Parse { path: PathBuf, message: String },
    #[error("catalog entry without id")]
    MissingId,
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
    #[error("catalog path does not exist: {0}")]
    NotFound(PathBuf),
}

/// Maps a category identifier to its display label.
pub trait CategoryLabels {
    fn label(&self, category: &str, locale: Locale) -> Option<&str>;

    fn label_or_id<'a>(&'a self, category: &'a str, locale: Locale) -> &'a str {
        self.label(category, locale)
            .or_else(|| self.label(category, locale.other()))
            .unwrap_or(category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    labels: HashMap<String, LocalizedText>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: &str, label: LocalizedText) {
        self.labels.insert(category.to_string(), label);
    }

    pub fn with(mut self, category: &str, en: &str, tr: &str) -> Self {
        self.insert(category, LocalizedText::new(en, tr));
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl CategoryLabels for CategoryMap {
    fn label(&self, category: &str, locale: Locale) -> Option<&str> {
        let text = self.labels.get(category)?.get(locale);
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Normalized searchable text of one entry in one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFields {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct IndexedEntry {
    entry: Arc<CatalogEntry>,
    en: NormalizedFields,
    tr: NormalizedFields,
}

impl IndexedEntry {
    fn build(entry: CatalogEntry, labels: &dyn CategoryLabels) -> Self {
        let keywords: Vec<String> = entry
            .keywords
            .iter()
            .map(|keyword| normalize(keyword))
            .filter(|keyword| !keyword.is_empty())
            .collect();
        let fields_for = |locale: Locale| NormalizedFields {
            title: normalize(entry.title.get(locale)),
            description: normalize(entry.description.get(locale)),
            keywords: keywords.clone(),
            category: normalize(labels.label_or_id(&entry.category, locale)),
        };
        let en = fields_for(Locale::En);
        let tr = fields_for(Locale::Tr);

        Self {
            entry: Arc::new(entry),
            en,
            tr,
        }
    }

    pub fn entry(&self) -> &Arc<CatalogEntry> {
        &self.entry
    }

    pub fn fields(&self, locale: Locale) -> &NormalizedFields {
        match locale {
            Locale::En => &self.en,
            Locale::Tr => &self.tr,
        }
    }

    /// Normalized title for `locale`, or the other locale's when missing.
    pub fn title_key(&self, locale: Locale) -> &str {
        let title = &self.fields(locale).title;
        if title.is_empty() {
            &self.fields(locale.other()).title
        } else {
            title
        }
    }
}

/// Read-only view over the catalog with every static field pre-normalized,
/// so a keystroke only pays for normalizing the query.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<IndexedEntry>,
    by_id: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn build(
        entries: Vec<CatalogEntry>,
        labels: &dyn CategoryLabels,
    ) -> Result<Self, CatalogError> {
        let mut index = Self::default();
        for mut entry in entries {
            let id = entry.id.trim().to_string();
            if id.is_empty() {
                return Err(CatalogError::MissingId);
            }
            if index.by_id.contains_key(&id) {
                return Err(CatalogError::DuplicateId(id));
            }
            entry.id = id.clone();
            index.by_id.insert(id, index.entries.len());
            index.entries.push(IndexedEntry::build(entry, labels));
        }

        log::info!("catalog index built with {} entries", index.entries.len());
        Ok(index)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Arc<CatalogEntry>> + '_ {
        self.entries.iter().map(IndexedEntry::entry)
    }

    pub fn indexed(&self) -> &[IndexedEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&IndexedEntry> {
        self.by_id.get(id).map(|&position| &self.entries[position])
    }

    pub fn normalized_fields_for(&self, id: &str, locale: Locale) -> Option<&NormalizedFields> {
        self.get(id).map(|indexed| indexed.fields(locale))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Entries and category labels read from catalog files.
#[derive(Debug, Clone, Default)]
pub struct LoadedCatalog {
    pub entries: Vec<CatalogEntry>,
    pub labels: CategoryMap,
}

impl LoadedCatalog {
    pub fn into_index(self) -> Result<(CatalogIndex, CategoryMap), CatalogError> {
        let index = CatalogIndex::build(self.entries, &self.labels)?;
        Ok((index, self.labels))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    categories: Vec<CategoryRecord>,
    calculators: Vec<CatalogEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryRecord {
    id: String,
    label: LocalizedText,
}

/// Loads one catalog file, or every `.json`/`.json5` file under a directory.
pub fn load_path(path: &Path) -> Result<LoadedCatalog, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }

    let mut catalog = LoadedCatalog::default();
    for file in discover_catalog_files(path) {
        let parsed = read_catalog_file(&file)?;
        for category in parsed.categories {
            if category.id.trim().is_empty() {
                log::warn!("skipping unnamed category in '{}'", file.display());
                continue;
            }
            catalog.labels.insert(category.id.trim(), category.label);
        }
        log::info!(
            "loaded {} calculators from '{}'",
            parsed.calculators.len(),
            file.display()
        );
        catalog.entries.extend(parsed.calculators);
    }

    Ok(catalog)
}

pub fn parse_catalog(raw: &str) -> Result<LoadedCatalog, CatalogError> {
    let parsed = parse_catalog_file(Path::new("<inline>"), raw)?;
    let mut labels = CategoryMap::new();
    for category in parsed.categories {
        labels.insert(category.id.trim(), category.label);
    }
    Ok(LoadedCatalog {
        entries: parsed.calculators,
        labels,
    })
}

fn discover_catalog_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut out: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|file| {
            file.extension()
                .and_then(|v| v.to_str())
                .is_some_and(|v| v.eq_ignore_ascii_case("json") || v.eq_ignore_ascii_case("json5"))
        })
        .collect();
    out.sort();
    out
}

fn read_catalog_file(path: &Path) -> Result<CatalogFile, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog_file(path, &raw)
}

fn parse_catalog_file(path: &Path, raw: &str) -> Result<CatalogFile, CatalogError> {
    json5::from_str::<CatalogFile>(raw).map_err(|e| CatalogError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{CatalogIndex, CategoryLabels, CategoryMap};
    use crate::model::{CatalogEntry, Locale, LocalizedText};

    #[test]
    fn precomputes_normalized_fields_per_locale() {
        let labels = CategoryMap::new().with("health", "Health", "Sağlık");
        let entry = CatalogEntry::new(
            "bmi",
            "health",
            LocalizedText::new("BMI Calculator", "VKİ Hesaplama"),
        )
        .with_keywords(&["Body Mass  Index"]);
        let index = CatalogIndex::build(vec![entry], &labels).unwrap();

        let tr = index.normalized_fields_for("bmi", Locale::Tr).unwrap();
        assert_eq!(tr.title, "vki hesaplama");
        assert_eq!(tr.category, "saglik");
        assert_eq!(tr.keywords, vec!["body mass index".to_string()]);
        let en = index.normalized_fields_for("bmi", Locale::En).unwrap();
        assert_eq!(en.title, "bmi calculator");
        assert_eq!(en.description, "");
    }

    #[test]
    fn stored_id_is_trimmed() {
        let labels = CategoryMap::new();
        let entry = CatalogEntry::new(" bmi ", "health", LocalizedText::only(Locale::En, "BMI"));
        let index = CatalogIndex::build(vec![entry], &labels).unwrap();

        let stored = index.entries().next().unwrap();
        assert_eq!(stored.id, "bmi");
        assert!(index.get(&stored.id).is_some());
        assert!(index.normalized_fields_for(&stored.id, Locale::En).is_some());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let labels = CategoryMap::new();
        let a = CatalogEntry::new("bmi", "health", LocalizedText::only(Locale::En, "A"));
        let b = CatalogEntry::new("bmi", "health", LocalizedText::only(Locale::En, "B"));
        assert!(CatalogIndex::build(vec![a, b], &labels).is_err());
    }

    #[test]
    fn label_falls_back_to_other_locale_then_id() {
        let mut labels = CategoryMap::new();
        labels.insert("math", LocalizedText::only(Locale::En, "Math"));
        assert_eq!(labels.label_or_id("math", Locale::Tr), "Math");
        assert_eq!(labels.label_or_id("finance", Locale::Tr), "finance");
    }
}
