use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{CatalogIndex, CategoryLabels};
use crate::config::Config;
use crate::debounce::{Clock, Debouncer, SearchTicket, SystemClock, DEFAULT_QUIET_PERIOD};
use crate::group::{group, GroupedResults};
use crate::model::{CatalogEntry, Locale, RecentSearch, SearchResult};
use crate::navigation::{NavigationError, Navigator};
use crate::normalize::normalize;
use crate::rank::{rank, DEFAULT_RESULT_CAP};
use crate::recent::RecentSearchStore;
use crate::score::{ScoreWeights, Scorer, DEFAULT_MIN_QUERY_CHARS};
use crate::selection::{NavigationPolicy, SelectionController, SelectionEvent};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub max_results: usize,
    pub min_query_chars: usize,
    pub debounce: Duration,
    pub navigation: NavigationPolicy,
    pub locale: Locale,
    pub weights: ScoreWeights,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_RESULT_CAP,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            debounce: DEFAULT_QUIET_PERIOD,
            navigation: NavigationPolicy::Clamp,
            locale: Locale::En,
            weights: ScoreWeights::default(),
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            max_results: cfg.max_results as usize,
            min_query_chars: cfg.min_query_chars,
            debounce: cfg.debounce(),
            navigation: cfg.navigation,
            locale: cfg.default_locale,
            weights: cfg.weights,
        }
    }
}

/// What the panel shows before anything is typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    pub recent: Vec<RecentSearch>,
    pub popular: Vec<Arc<CatalogEntry>>,
}

/// One search surface. Owns the session state (query, results, highlight,
/// timer) exclusively; a second search box needs its own engine.
pub struct SearchEngine {
    index: CatalogIndex,
    labels: Box<dyn CategoryLabels>,
    scorer: Scorer,
    max_results: usize,
    debouncer: Debouncer,
    selection: SelectionController,
    recent: RecentSearchStore,
    clock: Arc<dyn Clock>,
    locale: Locale,
    query: String,
    results: GroupedResults,
    is_searching: bool,
    search_passes: u64,
}

impl SearchEngine {
    pub fn new(
        index: CatalogIndex,
        labels: impl CategoryLabels + 'static,
        recent: RecentSearchStore,
        settings: EngineSettings,
    ) -> Self {
        Self {
            index,
            labels: Box::new(labels),
            scorer: Scorer::new(settings.weights, settings.min_query_chars),
            max_results: settings.max_results,
            debouncer: Debouncer::new(settings.debounce),
            selection: SelectionController::new(settings.navigation),
            recent,
            clock: Arc::new(SystemClock),
            locale: settings.locale,
            query: String::new(),
            results: GroupedResults::default(),
            is_searching: false,
            search_passes: 0,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn labels(&self) -> &dyn CategoryLabels {
        self.labels.as_ref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &GroupedResults {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.selected_index()
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Number of scoring passes run through the debounced path.
    pub fn search_passes(&self) -> u64 {
        self.search_passes
    }

    /// Runs normalize, score, rank and group for `query` right away.
    pub fn search(&self, query: &str) -> GroupedResults {
        let normalized = normalize(query);
        if !self.scorer.accepts(&normalized) {
            return GroupedResults::default();
        }

        let scored: Vec<SearchResult> = self
            .index
            .indexed()
            .iter()
            .filter_map(|indexed| {
                let outcome = self.scorer.score(indexed, &normalized, self.locale);
                outcome.is_match().then(|| {
                    SearchResult::with_title_key(
                        Arc::clone(indexed.entry()),
                        indexed.title_key(self.locale).to_string(),
                        outcome.score,
                        outcome.matched_fields,
                    )
                })
            })
            .collect();
        let ranked = rank(scored, self.max_results, self.locale);
        log::debug!("query '{normalized}' matched {} entries", ranked.len());

        group(ranked, self.labels.as_ref(), self.locale)
    }

    pub fn update_query(&mut self, text: &str) {
        self.query = text.to_string();

        if !self.scorer.accepts(&normalize(text)) {
            self.debouncer.cancel();
            self.is_searching = false;
            self.set_results(GroupedResults::default());
            return;
        }

        self.debouncer.schedule(text, self.clock.now());
        self.is_searching = true;
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.debouncer.cancel();
        self.is_searching = false;
        self.set_results(GroupedResults::default());
    }

    /// Runs the armed search if its quiet period has passed.
    /// Returns whether the visible results changed.
    pub fn tick(&mut self) -> bool {
        match self.poll_due() {
            Some(ticket) => self.run_ticket(ticket),
            None => false,
        }
    }

    /// Takes the armed search once it is due, for hosts that run the
    /// pipeline elsewhere and report back through [`Self::apply_results`].
    pub fn poll_due(&mut self) -> Option<SearchTicket> {
        self.debouncer.poll(self.clock.now())
    }

    /// Applies a completed search. Completions of superseded or cancelled
    /// tickets are dropped.
    pub fn apply_results(&mut self, seq: u64, results: GroupedResults) -> bool {
        if !self.debouncer.is_current(seq) {
            log::debug!("discarding stale search completion seq={seq}");
            return false;
        }

        self.is_searching = false;
        self.set_results(results);
        true
    }

    /// Explicit submission: runs any pending search now and records the query.
    pub fn submit(&mut self) -> bool {
        if let Some(ticket) = self.debouncer.flush() {
            self.run_ticket(ticket);
        }

        if !self.scorer.accepts(&normalize(&self.query)) {
            return false;
        }
        self.recent.add(&self.query);
        true
    }

    pub fn navigate_down(&mut self) -> SelectionEvent {
        self.selection.navigate_down()
    }

    pub fn navigate_up(&mut self) -> SelectionEvent {
        self.selection.navigate_up()
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.selection.selected_index()?)
    }

    /// Enter: hands back the highlighted result, records the query and ends
    /// the interaction. Does nothing when nothing is highlighted.
    pub fn commit(&mut self) -> Option<SearchResult> {
        let SelectionEvent::Committed(index) = self.selection.commit() else {
            return None;
        };
        let committed = self.results.get(index).cloned()?;

        self.recent.add(&self.query);
        log::info!("committed '{}' for query '{}'", committed.id(), self.query.trim());
        self.clear_search();
        Some(committed)
    }

    pub fn commit_and_navigate(
        &mut self,
        navigator: &mut dyn Navigator,
    ) -> Result<Option<SearchResult>, NavigationError> {
        let locale = self.locale;
        let Some(committed) = self.commit() else {
            return Ok(None);
        };
        navigator.navigate(&committed.entry, locale)?;
        Ok(Some(committed))
    }

    /// Escape: drops the highlight and tells the host to close the panel.
    pub fn cancel(&mut self) -> SelectionEvent {
        self.selection.cancel()
    }

    pub fn set_locale(&mut self, locale: Locale) {
        if self.locale == locale {
            return;
        }
        self.locale = locale;

        // An armed search has not been dispatched yet and will run in the new locale.
        if self.debouncer.is_armed() || !self.scorer.accepts(&normalize(&self.query)) {
            return;
        }
        // Supersede any ticket the host already holds for the old locale.
        self.debouncer.cancel();
        let results = self.search(&self.query);
        self.is_searching = false;
        self.set_results(results);
    }

    pub fn suggestions(&self) -> Suggestions {
        let mut popular: Vec<&Arc<CatalogEntry>> =
            self.index.entries().filter(|entry| entry.popular).collect();
        popular.sort_by_cached_key(|entry| {
            (
                normalize(entry.title.get_or_fallback(self.locale)),
                entry.id.clone(),
            )
        });

        Suggestions {
            recent: self.recent.get(),
            popular: popular
                .into_iter()
                .take(self.max_results)
                .map(Arc::clone)
                .collect(),
        }
    }

    pub fn recent_searches(&self) -> Vec<RecentSearch> {
        self.recent.get()
    }

    pub fn remove_recent(&mut self, query: &str) {
        self.recent.remove(query);
    }

    fn run_ticket(&mut self, ticket: SearchTicket) -> bool {
        let results = self.search(&ticket.query);
        self.search_passes += 1;
        self.apply_results(ticket.seq, results)
    }

    fn set_results(&mut self, results: GroupedResults) {
        self.selection.reset(results.len());
        self.results = results;
    }
}
