use serde::{Deserialize, Serialize};

use crate::catalog::{IndexedEntry, NormalizedFields};
use crate::model::{Locale, MatchedField, MatchedFields};
use crate::normalize::normalized_len;

pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// Declaration order is precedence order: earlier rules win within a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchRule {
    TitleExact,
    TitlePrefix,
    TitleContains,
    Keyword,
    DescriptionContains,
    CategoryContains,
}

impl MatchRule {
    pub fn field(self) -> MatchedField {
        match self {
            Self::TitleExact | Self::TitlePrefix | Self::TitleContains => MatchedField::Title,
            Self::Keyword => MatchedField::Keywords,
            Self::DescriptionContains => MatchedField::Description,
            Self::CategoryContains => MatchedField::Category,
        }
    }
}

/// Integer weight per match rule. Tuning happens here, never in the matching code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub title_exact: u32,
    pub title_prefix: u32,
    pub title_contains: u32,
    pub keyword: u32,
    pub description_contains: u32,
    pub category_contains: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            title_exact: 100,
            title_prefix: 70,
            title_contains: 50,
            keyword: 40,
            description_contains: 20,
            category_contains: 10,
        }
    }
}

impl ScoreWeights {
    pub fn weight(&self, rule: MatchRule) -> u32 {
        match rule {
            MatchRule::TitleExact => self.title_exact,
            MatchRule::TitlePrefix => self.title_prefix,
            MatchRule::TitleContains => self.title_contains,
            MatchRule::Keyword => self.keyword,
            MatchRule::DescriptionContains => self.description_contains,
            MatchRule::CategoryContains => self.category_contains,
        }
    }

    pub fn is_all_zero(&self) -> bool {
        [
            self.title_exact,
            self.title_prefix,
            self.title_contains,
            self.keyword,
            self.description_contains,
            self.category_contains,
        ]
        .iter()
        .all(|weight| *weight == 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub score: u32,
    pub matched_fields: MatchedFields,
}

impl ScoreOutcome {
    pub fn is_match(&self) -> bool {
        self.score > 0
    }
}

#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ScoreWeights,
    min_query_chars: usize,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default(), DEFAULT_MIN_QUERY_CHARS)
    }
}

impl Scorer {
    pub fn new(weights: ScoreWeights, min_query_chars: usize) -> Self {
        Self {
            weights,
            min_query_chars: min_query_chars.max(1),
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn min_query_chars(&self) -> usize {
        self.min_query_chars
    }

    /// Whether an already-normalized query is long enough to be scored at all.
    pub fn accepts(&self, normalized_query: &str) -> bool {
        normalized_len(normalized_query) >= self.min_query_chars
    }

    /// Scores `entry` against an already-normalized query.
    ///
    /// Text of both locales is consulted, `locale` first. Within the title the
    /// strongest rule wins; the other fields add their weight on top.
    pub fn score(
        &self,
        entry: &IndexedEntry,
        normalized_query: &str,
        locale: Locale,
    ) -> ScoreOutcome {
        if !self.accepts(normalized_query) {
            return ScoreOutcome::default();
        }

        let active = entry.fields(locale);
        let other = entry.fields(locale.other());
        let mut outcome = ScoreOutcome::default();

        let title_rule = title_rule(&active.title, normalized_query)
            .into_iter()
            .chain(title_rule(&other.title, normalized_query))
            .min();
        if let Some(rule) = title_rule {
            self.record(&mut outcome, rule);
        }

        let field_rules: [(MatchRule, fn(&NormalizedFields, &str) -> bool); 3] = [
            (MatchRule::Keyword, keyword_matches),
            (MatchRule::DescriptionContains, description_matches),
            (MatchRule::CategoryContains, category_matches),
        ];
        for (rule, check) in field_rules {
            if check(active, normalized_query) || check(other, normalized_query) {
                self.record(&mut outcome, rule);
            }
        }

        outcome
    }

    fn record(&self, outcome: &mut ScoreOutcome, rule: MatchRule) {
        let weight = self.weights.weight(rule);
        if weight == 0 {
            return;
        }
        outcome.score = outcome.score.saturating_add(weight);
        outcome.matched_fields.insert(rule.field());
    }
}

fn title_rule(title: &str, query: &str) -> Option<MatchRule> {
    if title.is_empty() {
        return None;
    }
    if title == query {
        Some(MatchRule::TitleExact)
    } else if title.starts_with(query) {
        Some(MatchRule::TitlePrefix)
    } else if title.contains(query) {
        Some(MatchRule::TitleContains)
    } else {
        None
    }
}

fn keyword_matches(fields: &NormalizedFields, query: &str) -> bool {
    fields
        .keywords
        .iter()
        .any(|keyword| keyword.starts_with(query))
}

fn description_matches(fields: &NormalizedFields, query: &str) -> bool {
    fields.description.contains(query)
}

fn category_matches(fields: &NormalizedFields, query: &str) -> bool {
    fields.category.contains(query)
}
