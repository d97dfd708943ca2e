use std::sync::Arc;

use calcfind_core::catalog::{parse_catalog, CatalogIndex, CategoryMap};
use calcfind_core::group::group;
use calcfind_core::model::{
    CatalogEntry, Locale, LocalizedText, MatchedField, SearchResult,
};
use calcfind_core::normalize::normalize;
use calcfind_core::rank::rank;
use calcfind_core::score::{ScoreWeights, Scorer};

const CATALOG: &str = include_str!("fixtures/catalog.json5");

fn fixture() -> (CatalogIndex, CategoryMap) {
    parse_catalog(CATALOG).unwrap().into_index().unwrap()
}

fn score_all(index: &CatalogIndex, scorer: &Scorer, query: &str, locale: Locale) -> Vec<SearchResult> {
    let normalized = normalize(query);
    index
        .indexed()
        .iter()
        .map(|indexed| {
            let outcome = scorer.score(indexed, &normalized, locale);
            SearchResult::new(
                Arc::clone(indexed.entry()),
                locale,
                outcome.score,
                outcome.matched_fields,
            )
        })
        .collect()
}

fn ids(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(SearchResult::id).collect()
}

#[test]
fn turkish_case_and_diacritics_fold_together() {
    assert_eq!(normalize("AĞIRLIK"), normalize("agirlik"));
    assert_eq!(normalize("  İdeal   Ağırlık "), "ideal agirlik");

    let (index, _) = fixture();
    let scorer = Scorer::default();
    for query in ["AĞIRLIK", "agirlik"] {
        let ranked = rank(score_all(&index, &scorer, query, Locale::Tr), 20, Locale::Tr);
        assert_eq!(ids(&ranked), vec!["ideal-weight"], "query {query}");
        assert!(ranked[0].matched_fields.contains(&MatchedField::Title));
    }
}

#[test]
fn longer_query_never_scores_higher_on_same_entry() {
    let (index, _) = fixture();
    let scorer = Scorer::default();

    for (shorter, longer) in [("calc", "calcul"), ("lo", "loan"), ("ov", "ovul"), ("he", "hesap")] {
        let short_scores = score_all(&index, &scorer, shorter, Locale::En);
        let long_scores = score_all(&index, &scorer, longer, Locale::En);
        for (short, long) in short_scores.iter().zip(&long_scores) {
            if long.score > 0 {
                assert!(
                    long.score <= short.score,
                    "{}: '{longer}' scored {} above '{shorter}' {}",
                    long.id(),
                    long.score,
                    short.score
                );
            }
        }
    }
}

#[test]
fn ranking_is_deterministic() {
    let (index, _) = fixture();
    let scorer = Scorer::default();
    let first = rank(score_all(&index, &scorer, "calculator", Locale::En), 20, Locale::En);
    let again = rank(score_all(&index, &scorer, "calculator", Locale::En), 20, Locale::En);
    assert_eq!(ids(&first), ids(&again));
    assert_eq!(ids(&rank(first.clone(), 20, Locale::En)), ids(&first));
}

#[test]
fn rank_never_exceeds_cap() {
    let labels = CategoryMap::new();
    let entries = (0..250)
        .map(|i| {
            CatalogEntry::new(
                &format!("calc-{i}"),
                "misc",
                LocalizedText::only(Locale::En, &format!("Calculator {i}")),
            )
        })
        .collect();
    let index = CatalogIndex::build(entries, &labels).unwrap();
    let scored = score_all(&index, &Scorer::default(), "calculator", Locale::En);

    assert_eq!(rank(scored.clone(), 20, Locale::En).len(), 20);
    assert_eq!(rank(scored, 300, Locale::En).len(), 250);
}

#[test]
fn zero_weight_rule_does_not_match() {
    let (index, _) = fixture();
    let weights = ScoreWeights {
        description_contains: 0,
        ..ScoreWeights::default()
    };
    let scorer = Scorer::new(weights, 2);
    let ranked = rank(score_all(&index, &scorer, "bmi", Locale::En), 20, Locale::En);
    assert_eq!(ids(&ranked), vec!["bmi"]);
}

#[test]
fn query_below_minimum_length_scores_nothing() {
    let (index, _) = fixture();
    let scorer = Scorer::new(ScoreWeights::default(), 3);
    let scored = score_all(&index, &scorer, "bm", Locale::En);
    assert!(scored.iter().all(|result| result.score == 0));
    assert!(rank(scored, 20, Locale::En).is_empty());
}

#[test]
fn category_label_matches_in_either_locale() {
    let (index, labels) = fixture();
    let scorer = Scorer::default();
    let ranked = rank(score_all(&index, &scorer, "gebelik", Locale::En), 20, Locale::En);
    assert_eq!(ids(&ranked), vec!["due-date", "ovulation"]);
    assert!(ranked
        .iter()
        .all(|result| result.matched_fields.contains(&MatchedField::Category)));

    let grouped = group(ranked, &labels, Locale::En);
    assert_eq!(grouped.groups().len(), 1);
    assert_eq!(grouped.groups()[0].label, "Pregnancy");
}
