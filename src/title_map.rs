//!
//! src/title_map.rs  Andrew Belles  Oct 18th, 2026
//!
//! Ordered associative container keyed by normalized title. This is the
//! dedup mechanism for albums and tracks: a later insert under an equal
//! normalized title silently replaces the stored display title and value
//! (last write wins) while the entry keeps the position of its first insert.
//!

use std::collections::HashMap;

use crate::types::normalize_title;

#[derive(Debug, Clone, PartialEq)]
pub struct TitleEntry<V> {
    pub key: String,
    pub title: String,
    pub value: V
}

#[derive(Debug, Clone)]
pub struct TitleMap<V> {
    entries: Vec<TitleEntry<V>>,
    index: HashMap<String, usize>
}

impl<V> Default for TitleMap<V> {
    fn default() -> Self {
        Self { entries: Vec::new(), index: HashMap::new() }
    }
}

impl<V> TitleMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under the normalized title, returning the value it replaced
    pub fn insert(&mut self, title: &str, value: V) -> Option<V> {
        let key = normalize_title(title);
        match self.index.get(&key) {
            Some(&at) => {
                let entry = &mut self.entries[at];
                entry.title = title.to_string();
                Some(std::mem::replace(&mut entry.value, value))
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(TitleEntry { key, title: title.to_string(), value });
                None
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&V> {
        self.index
            .get(&normalize_title(title))
            .map(|&at| &self.entries[at].value)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.index.contains_key(&normalize_title(title))
    }

    /// Removes the entry and closes the gap, preserving relative order
    pub fn remove(&mut self, title: &str) -> Option<TitleEntry<V>> {
        let at = self.index.remove(&normalize_title(title))?;
        let entry = self.entries.remove(at);
        for slot in self.index.values_mut() {
            if *slot > at {
                *slot -= 1;
            }
        }
        Some(entry)
    }

    /// Folds `other` into self entry by entry, with the same policy as `insert`
    pub fn merge(&mut self, other: TitleMap<V>) {
        for entry in other.entries {
            self.insert(&entry.title, entry.value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TitleEntry<V>> {
        self.entries.iter()
    }
}

impl<V> IntoIterator for TitleMap<V> {
    type Item = TitleEntry<V>;
    type IntoIter = std::vec::IntoIter<TitleEntry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a TitleMap<V> {
    type Item = &'a TitleEntry<V>;
    type IntoIter = std::slice::Iter<'a, TitleEntry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<V> FromIterator<(String, V)> for TitleMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = TitleMap::new();
        for (title, value) in iter {
            map.insert(&title, value);
        }
        map
    }
}
