use serde::{Deserialize, Serialize};

use crate::engine::SearchEngine;
use crate::group::ResultGroup;
use crate::model::{Locale, MatchedField, RecentSearch, SearchResult};
use crate::navigation::UrlResolver;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateQueryRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetLocaleRequest {
    pub locale: Locale,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoveRecentRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum HostCommand {
    UpdateQuery(UpdateQueryRequest),
    ClearSearch,
    NavigateUp,
    NavigateDown,
    Commit,
    Cancel,
    Submit,
    Tick,
    SetLocale(SetLocaleRequest),
    RemoveRecent(RemoveRecentRequest),
    Snapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub score: u32,
    pub matched_fields: Vec<MatchedField>,
    pub popular: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupDto {
    pub category: String,
    pub label: String,
    pub results: Vec<ResultDto>,
}

/// Everything a host UI observes about one engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub query: String,
    pub locale: Locale,
    pub is_searching: bool,
    pub selected_index: Option<usize>,
    pub has_results: bool,
    pub groups: Vec<GroupDto>,
    pub recent: Vec<RecentSearch>,
}

impl EngineSnapshot {
    pub fn capture(engine: &SearchEngine, resolver: &UrlResolver) -> Self {
        let locale = engine.locale();
        Self {
            query: engine.query().to_string(),
            locale,
            is_searching: engine.is_searching(),
            selected_index: engine.selected_index(),
            has_results: engine.has_results(),
            groups: engine
                .results()
                .groups()
                .iter()
                .map(|group| GroupDto::from_group(group, resolver, locale))
                .collect(),
            recent: engine.recent_searches(),
        }
    }
}

impl GroupDto {
    fn from_group(group: &ResultGroup, resolver: &UrlResolver, locale: Locale) -> Self {
        Self {
            category: group.category.clone(),
            label: group.label.clone(),
            results: group
                .results
                .iter()
                .map(|result| ResultDto::from_result(result, resolver, locale))
                .collect(),
        }
    }
}

impl ResultDto {
    pub fn from_result(result: &SearchResult, resolver: &UrlResolver, locale: Locale) -> Self {
        let entry = &result.entry;
        Self {
            id: entry.id.clone(),
            title: entry.title.get_or_fallback(locale).to_string(),
            description: entry.description.get_or_fallback(locale).to_string(),
            url: resolver.resolve(entry, locale),
            score: result.score,
            matched_fields: result.matched_fields.iter().copied().collect(),
            popular: entry.popular,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommittedDto {
    pub result: ResultDto,
    pub snapshot: EngineSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum HostResponse {
    Snapshot(EngineSnapshot),
    Committed(CommittedDto),
    Closed(EngineSnapshot),
}
