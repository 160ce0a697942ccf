use crate::domain::{SearchQuery, TravelEntry};

/// First entry, in dataset order, whose name contains the query.
#[must_use]
pub fn first_match<'a>(entries: &'a [TravelEntry], query: &SearchQuery) -> Option<&'a TravelEntry> {
    entries.iter().find(|entry| entry.matches(query))
}

/// Every matching entry, in dataset order.
#[must_use]
pub fn all_matches(entries: &[TravelEntry], query: &SearchQuery) -> Vec<TravelEntry> {
    entries
        .iter()
        .filter(|entry| entry.matches(query))
        .cloned()
        .collect()
}

/// Problems worth reporting in a dataset: blank names or urls, and names
/// that appear more than once (only the first of those can ever be a
/// redirect target).
#[must_use]
pub fn audit_entries(entries: &[TravelEntry]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen = std::collections::HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        if entry.name.trim().is_empty() {
            problems.push(format!("entry {index}: empty name"));
        }
        if entry.url.trim().is_empty() {
            problems.push(format!("entry {index}: empty url ({})", entry.name));
        }

        let key = entry.name.to_lowercase();
        if let Some(first) = seen.get(&key) {
            problems.push(format!(
                "entry {index}: duplicate name '{}' (first seen at entry {first})",
                entry.name
            ));
        } else {
            seen.insert(key, index);
        }
    }

    problems
}
