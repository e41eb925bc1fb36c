use schema::SpeciesId;
use std::collections::HashMap;

/// Normalize a species, ability or move name into its canonical lookup
/// key: lowercase, every run of characters outside `[a-z0-9]` collapses
/// to a single hyphen, no leading or trailing hyphens.
///
/// `"Sirfetch'd"` -> `"sirfetch-d"`
pub fn normalize(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    for ch in text.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            key.push(ch);
        } else if !key.is_empty() && !key.ends_with('-') {
            key.push('-');
        }
    }
    key.trim_end_matches('-').to_string()
}

/// Species name index: exact normalized-key lookup plus a deterministic
/// fuzzy fallback for punctuation and hyphenation variance.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    exact: HashMap<String, SpeciesId>,
    /// `(normalized key, id)` sorted by key length then key. The fuzzy
    /// fallback scans this in order, so a multi-match resolves the same
    /// way on every load.
    ordered: Vec<(String, SpeciesId)>,
}

impl NameIndex {
    pub fn new() -> NameIndex {
        NameIndex::default()
    }

    /// Register a raw name for a species. The first registration of a
    /// key wins; re-registering the same key is a no-op.
    pub fn insert(&mut self, raw: &str, id: SpeciesId) {
        let key = normalize(raw);
        if key.is_empty() || self.exact.contains_key(&key) {
            return;
        }
        self.exact.insert(key.clone(), id);
        self.ordered.push((key, id));
    }

    /// Fix the fuzzy scan order. Call once after the last `insert`.
    pub fn finalize(&mut self) {
        self.ordered
            .sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Resolve a user-supplied name. Tries the exact normalized key
    /// first, then hyphen-stripped equality, then substring containment
    /// in either direction, shortest candidate key first.
    pub fn resolve(&self, name: &str) -> Option<SpeciesId> {
        let key = normalize(name);
        if let Some(&id) = self.exact.get(&key) {
            return Some(id);
        }

        let target = key.replace('-', "");
        if target.is_empty() {
            return None;
        }
        for (candidate, id) in &self.ordered {
            if candidate.replace('-', "") == target {
                return Some(*id);
            }
        }
        for (candidate, id) in &self.ordered {
            let candidate = candidate.replace('-', "");
            if candidate.contains(target.as_str()) || target.contains(candidate.as_str()) {
                return Some(*id);
            }
        }
        None
    }
}
