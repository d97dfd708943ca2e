use crate::model::{CatalogEntry, Locale};

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("no destination for entry '{0}'")]
    NoDestination(String),
    #[error("navigation failed: {0}")]
    Failed(String),
}

/// Host side of a commit: takes the chosen entry somewhere.
pub trait Navigator {
    fn navigate(&mut self, entry: &CatalogEntry, locale: Locale) -> Result<(), NavigationError>;
}

/// Builds `{base}/{locale}/{slug}` destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    base: String,
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::new("")
    }
}

impl UrlResolver {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, entry: &CatalogEntry, locale: Locale) -> String {
        let slug = entry.slug.get_or_fallback(locale).trim().trim_matches('/');
        let slug = if slug.is_empty() { entry.id.as_str() } else { slug };
        format!("{}/{}/{}", self.base, locale.as_str(), slug)
    }
}

/// Navigator that only records resolved destinations; hosts read them back.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    resolver: UrlResolver,
    visited: Vec<String>,
}

impl RecordingNavigator {
    pub fn new(resolver: UrlResolver) -> Self {
        Self {
            resolver,
            visited: Vec::new(),
        }
    }

    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    pub fn last(&self) -> Option<&str> {
        self.visited.last().map(String::as_str)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, entry: &CatalogEntry, locale: Locale) -> Result<(), NavigationError> {
        if entry.id.trim().is_empty() {
            return Err(NavigationError::NoDestination(entry.id.clone()));
        }
        self.visited.push(self.resolver.resolve(entry, locale));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::UrlResolver;
    use crate::model::{CatalogEntry, Locale, LocalizedText};

    #[test]
    fn resolves_locale_slug_with_fallbacks() {
        let resolver = UrlResolver::new("https://example.test/");
        let entry = CatalogEntry::new("bmi", "health", LocalizedText::new("BMI", "VKİ"))
            .with_slug(LocalizedText::only(Locale::En, "/bmi-calculator/"));

        assert_eq!(
            resolver.resolve(&entry, Locale::En),
            "https://example.test/en/bmi-calculator"
        );
        assert_eq!(
            resolver.resolve(&entry, Locale::Tr),
            "https://example.test/tr/bmi-calculator"
        );

        let bare = CatalogEntry::new("tdee", "fitness", LocalizedText::default());
        assert_eq!(resolver.resolve(&bare, Locale::Tr), "https://example.test/tr/tdee");
    }
}
