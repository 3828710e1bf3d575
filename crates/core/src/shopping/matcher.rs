//! Fuzzy matching of basket items against the household shopping list

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use harvest_domain::constants::{CHARACTER_WEIGHT, SUBSTRING_SIMILARITY_FLOOR, WORD_WEIGHT};
use harvest_domain::{
    BasketItem, ListMatch, MatchResult, Result, ShoppingListConfig, ShoppingListEntry,
};
use tracing::{debug, error, info, instrument};

use super::normalize::normalize;
use super::ports::ShoppingList;

/// Similarity of two item names in `[0, 1]`.
///
/// Normalised Levenshtein ratio, floored when one name contains the other,
/// blended with word overlap when both sides have words. A name that
/// normalises to nothing is contained in every other name.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    let mut character = strsim::normalized_levenshtein(&a, &b);
    if a.contains(&b) || b.contains(&a) {
        character = character.max(SUBSTRING_SIMILARITY_FLOOR);
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return character;
    }

    let shared = words_a.intersection(&words_b).count();
    let overlap = shared as f64 / words_a.len().max(words_b.len()) as f64;

    CHARACTER_WEIGHT * character + WORD_WEIGHT * overlap
}

/// Greedy best match per basket item.
///
/// Every basket item independently picks the open entry with the highest
/// score at or above `threshold`; the first entry wins ties and a zero score
/// never matches. One entry may
/// be claimed by several items. A later basket item with the same name
/// replaces the earlier match.
pub fn match_entries(
    items: &[BasketItem],
    entries: &[ShoppingListEntry],
    threshold: f64,
) -> MatchResult {
    let candidates: Vec<&ShoppingListEntry> =
        entries.iter().filter(|entry| !entry.complete && !entry.name.is_empty()).collect();

    let mut matches = MatchResult::new();
    for item in items {
        let mut best: Option<(&ShoppingListEntry, f64)> = None;
        for entry in &candidates {
            let score = similarity(&item.name, &entry.name);
            if score <= 0.0 || score < threshold {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((entry, score));
            }
        }

        if let Some((entry, score)) = best {
            debug!(item = %item.name, entry = %entry.name, similarity = score, "Matched basket item");
            matches.insert(item.name.clone(), ListMatch { entry: entry.clone(), similarity: score });
        }
    }
    matches
}

/// Matches delivered items to shopping-list entries and completes them.
pub struct ShoppingListMatcher {
    list: Arc<dyn ShoppingList>,
    threshold: f64,
}

impl ShoppingListMatcher {
    /// `threshold` is a ratio and is clamped to `[0, 1]`.
    pub fn new(list: Arc<dyn ShoppingList>, threshold: f64) -> Self {
        Self { list, threshold: threshold.clamp(0.0, 1.0) }
    }

    pub fn from_config(list: Arc<dyn ShoppingList>, config: &ShoppingListConfig) -> Self {
        Self::new(list, config.threshold())
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Entries that are not yet complete.
    pub async fn active_entries(&self) -> Result<Vec<ShoppingListEntry>> {
        let entries = self.list.list_entries().await?;
        Ok(entries.into_iter().filter(|entry| !entry.complete).collect())
    }

    #[instrument(skip_all, fields(items = items.len(), threshold = self.threshold))]
    pub async fn match_items(&self, items: &[BasketItem]) -> Result<MatchResult> {
        if items.is_empty() {
            return Ok(MatchResult::new());
        }
        let entries = self.active_entries().await?;
        if entries.is_empty() {
            debug!("No active shopping list entries to match");
            return Ok(MatchResult::new());
        }

        let matches = match_entries(items, &entries, self.threshold);
        info!(matched = matches.len(), total = items.len(), "Matched basket items");
        Ok(matches)
    }

    /// Complete every matched entry by name. Returns how many succeeded.
    ///
    /// A failing entry is logged and skipped.
    pub async fn mark_delivered(
        &self,
        matches: &MatchResult,
        delivery_date: Option<NaiveDate>,
    ) -> usize {
        let when = delivery_date.map_or_else(|| "upcoming delivery".to_string(), |d| d.to_string());
        let mut completed = 0;

        for (item, found) in matches {
            match self.list.complete_entry(&found.entry.name).await {
                Ok(()) => {
                    completed += 1;
                    info!(
                        entry = %found.entry.name,
                        item = %item,
                        delivery = %when,
                        "Marked shopping list entry complete"
                    );
                }
                Err(err) => {
                    error!(entry = %found.entry.name, error = %err, "Failed to complete shopping list entry");
                }
            }
        }
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<ShoppingListEntry> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| ShoppingListEntry::open(format!("id-{i}"), *name))
            .collect()
    }

    fn basket(names: &[&str]) -> Vec<BasketItem> {
        names.iter().map(|name| BasketItem::new(*name, 1.0)).collect()
    }

    #[test]
    fn identical_names_score_one() {
        assert!((similarity("Tomatoes", "tomatoes") - 1.0).abs() < 1e-9);
        assert!((similarity("milk", "Organic Milk") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn related_names_score_above_unrelated() {
        assert!(similarity("tomatoes", "tomato") > 0.5);
        assert!(similarity("cherry tomatoes", "tomatoes") > 0.5);
        assert!(similarity("tomatoes", "bananas") < 0.5);
        assert!(similarity("milk", "organic milk") >= 0.85);
    }

    #[test]
    fn disjoint_names_score_zero() {
        assert!(similarity("abc", "xyz").abs() < 1e-9);
    }

    #[test]
    fn name_without_words_is_floored_as_substring() {
        assert!((similarity("Organic", "Milk") - SUBSTRING_SIMILARITY_FLOOR).abs() < 1e-9);
        assert!((similarity("milk", "1kg") - SUBSTRING_SIMILARITY_FLOOR).abs() < 1e-9);
        assert!((similarity("", "") - 1.0).abs() < 1e-9);

        let matches = match_entries(&basket(&["Organic"]), &entries(&["Milk"]), 0.8);
        assert_eq!(matches["Organic"].entry.name, "Milk");
    }

    #[test]
    fn zero_score_never_matches() {
        assert!(match_entries(&basket(&["abc"]), &entries(&["xyz"]), 0.0).is_empty());
    }

    #[test]
    fn similarity_is_symmetric_and_bounded() {
        let names = ["Kale", "Curly kale", "Carrots 1kg", "Bio Karotten", "Apples", "apple juice"];
        for a in names {
            for b in names {
                let ab = similarity(a, b);
                assert!((ab - similarity(b, a)).abs() < 1e-12, "{a} / {b}");
                assert!((0.0..=1.0).contains(&ab), "{a} / {b} = {ab}");
            }
        }
    }

    #[test]
    fn picks_best_entry_above_threshold() {
        let matches =
            match_entries(&basket(&["Organic Tomatoes"]), &entries(&["Bananas", "tomatoes"]), 0.8);
        assert_eq!(matches["Organic Tomatoes"].entry.name, "tomatoes");
    }

    #[test]
    fn completed_entries_are_never_matched() {
        let mut list = entries(&["Milk"]);
        list[0].complete = true;
        assert!(match_entries(&basket(&["Milk"]), &list, 0.5).is_empty());
    }

    #[test]
    fn first_entry_wins_ties() {
        let matches = match_entries(&basket(&["Milk"]), &entries(&["milk", "Milk!"]), 0.8);
        assert_eq!(matches["Milk"].entry.id, "id-0");
    }

    #[test]
    fn one_entry_can_be_claimed_twice() {
        let matches =
            match_entries(&basket(&["Carrots", "Bio Carrots 1kg"]), &entries(&["carrots"]), 0.8);
        assert_eq!(matches.len(), 2);
        assert!(matches.values().all(|m| m.entry.id == "id-0"));
    }

    #[test]
    fn raising_threshold_only_removes_matches() {
        let items = basket(&["Tomatoes", "Cherry tomatoes", "Milk", "Kale"]);
        let list = entries(&["tomato", "milk 1l", "curly kale", "bread"]);

        let mut previous = match_entries(&items, &list, 0.0);
        for step in 1..=10 {
            let threshold = f64::from(step) / 10.0;
            let current = match_entries(&items, &list, threshold);
            for (name, found) in &current {
                assert!(found.similarity >= threshold);
                assert!(previous.contains_key(name));
            }
            previous = current;
        }
    }
}
