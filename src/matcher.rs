//! This module contains the matching coordinator
use crate::engine::exact::ExactEngine;
use crate::item::{ItemStore, MatchedItem};
use crate::{CaseMatching, PickerOptions};

/// Matches every entry of `store` against `query` and ranks the survivors.
///
/// The result is ordered by tier (exact, prefix, substring); entries of the same tier keep
/// their store order.
pub fn compute_matches(store: &ItemStore, query: &str, case: CaseMatching) -> Vec<MatchedItem> {
    let engine = ExactEngine::builder(query, case).build();
    debug!("engine: {engine}");

    let mut matched: Vec<MatchedItem> = store
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| engine.match_text(entry.text()).map(|tier| MatchedItem { index, tier }))
        .collect();

    // stable: ties keep store order
    matched.sort_by_key(|item| item.tier);
    trace!("matcher stop, total matched: {}/{}", matched.len(), store.len());
    matched
}

//==============================================================================
/// Runs the matching for a session and remembers enough of the previous run to skip
/// hopeless work.
///
/// Once a query matched nothing, any query extending it matches nothing either, since
/// every token of the old query still has to occur.
#[derive(Debug, Default)]
pub struct Matcher {
    case_matching: CaseMatching,
    last_query: Option<String>,
    last_was_empty: bool,
}

impl Matcher {
    /// Creates a new Matcher builder
    pub fn builder() -> Self {
        Self::default()
    }

    /// Sets the case matching mode
    pub fn case(mut self, case_matching: CaseMatching) -> Self {
        self.case_matching = case_matching;
        self
    }

    /// Finalizes the builder and returns the configured Matcher.
    pub fn build(self) -> Self {
        self
    }

    /// Creates a Matcher configured from the given options.
    pub fn from_options(options: &PickerOptions) -> Self {
        Matcher::builder().case(options.case).build()
    }

    /// Returns the case matching setting for this matcher.
    pub fn case_matching(&self) -> CaseMatching {
        self.case_matching
    }

    /// Matches `query`, or returns `None` when the previous (empty) result still holds.
    pub fn run(&mut self, store: &ItemStore, query: &str) -> Option<Vec<MatchedItem>> {
        if self.last_was_empty
            && let Some(last) = &self.last_query
            && query.len() > last.len()
            && query.starts_with(last.as_str())
        {
            trace!("query {query:?} extends {last:?} which matched nothing, skipping");
            self.last_query = Some(query.to_string());
            return None;
        }

        let matched = compute_matches(store, query, self.case_matching);
        self.last_query = Some(query.to_string());
        self.last_was_empty = matched.is_empty();
        Some(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchTier;

    fn store() -> ItemStore {
        ["apple", "Apple Pie", "snapple", "grape"].into_iter().collect()
    }

    fn texts<'a>(store: &'a ItemStore, items: &[MatchedItem]) -> Vec<&'a str> {
        items.iter().map(|m| store.get(m.index).unwrap().text()).collect()
    }

    #[test]
    fn test_tier_order() {
        let store: ItemStore = ["xab", "ab", "abc", "zab", "ab", "abd"].into_iter().collect();
        let matched = compute_matches(&store, "ab", CaseMatching::Respect);
        assert_eq!(
            matched.iter().map(|m| m.index).collect::<Vec<_>>(),
            vec![1, 4, 2, 5, 0, 3]
        );
        assert_eq!(matched[0].tier, MatchTier::Exact);
        assert_eq!(matched[2].tier, MatchTier::Prefix);
        assert_eq!(matched[5].tier, MatchTier::Substring);
    }

    #[test]
    fn test_case_modes() {
        let store = store();
        let respect = compute_matches(&store, "app", CaseMatching::Respect);
        assert_eq!(texts(&store, &respect), vec!["apple", "snapple"]);
        let ignore = compute_matches(&store, "app", CaseMatching::Ignore);
        assert_eq!(texts(&store, &ignore), vec!["apple", "Apple Pie", "snapple"]);
    }

    #[test]
    fn test_short_circuit() {
        let store = store();
        let mut matcher = Matcher::builder().build();

        assert_eq!(matcher.run(&store, "zz").map(|m| m.len()), Some(0));
        // extension of an empty result is skipped
        assert!(matcher.run(&store, "zzz").is_none());
        assert!(matcher.run(&store, "zzz top").is_none());
        // shrinking recomputes
        assert_eq!(matcher.run(&store, "z").map(|m| m.len()), Some(0));
        // anything not extending the previous query recomputes
        assert_eq!(matcher.run(&store, "ap").map(|m| m.len()), Some(2));
        assert_eq!(matcher.run(&store, "app").map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_same_query_recomputes() {
        let store = store();
        let mut matcher = Matcher::builder().build();
        assert_eq!(matcher.run(&store, "zz").map(|m| m.len()), Some(0));
        assert_eq!(matcher.run(&store, "zz").map(|m| m.len()), Some(0));
    }
}
