use crate::catalog::CategoryLabels;
use crate::model::{Locale, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGroup {
    pub category: String,
    pub label: String,
    pub results: Vec<SearchResult>,
}

/// Ranked results bucketed by category. Buckets appear in the order their
/// category first shows up in the ranking; each bucket keeps rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedResults {
    groups: Vec<ResultGroup>,
}

impl GroupedResults {
    pub fn groups(&self) -> &[ResultGroup] {
        &self.groups
    }

    /// Results in display order, the order selection indexes refer to.
    pub fn flatten(&self) -> impl Iterator<Item = &SearchResult> + '_ {
        self.groups.iter().flat_map(|group| group.results.iter())
    }

    pub fn get(&self, flat_index: usize) -> Option<&SearchResult> {
        let mut remaining = flat_index;
        for group in &self.groups {
            if remaining < group.results.len() {
                return group.results.get(remaining);
            }
            remaining -= group.results.len();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.results.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn group(
    ranked: Vec<SearchResult>,
    labels: &dyn CategoryLabels,
    locale: Locale,
) -> GroupedResults {
    let mut groups: Vec<ResultGroup> = Vec::new();
    for result in ranked {
        match groups
            .iter_mut()
            .find(|group| group.category == result.entry.category)
        {
            Some(existing) => existing.results.push(result),
            None => groups.push(ResultGroup {
                category: result.entry.category.clone(),
                label: labels.label_or_id(&result.entry.category, locale).to_string(),
                results: vec![result],
            }),
        }
    }

    GroupedResults { groups }
}
