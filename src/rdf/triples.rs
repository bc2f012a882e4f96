//! Deduplicated triple collection

use std::collections::hash_map::{HashMap, IntoValues, Values};

use super::term::Triple;

/// Set of triples keyed by their canonical string form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleSet {
    triples: HashMap<String, Triple>,
}

impl TripleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple. Returns false if an identical triple was present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple.key(), triple).is_none()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains_key(&triple.key())
    }

    /// Look a triple up by canonical key
    pub fn get(&self, key: &str) -> Option<&Triple> {
        self.triples.get(key)
    }

    /// Iterate in no particular order
    pub fn iter(&self) -> Values<'_, String, Triple> {
        self.triples.values()
    }

    /// Triples ordered by canonical key
    pub fn sorted(&self) -> Vec<&Triple> {
        let mut entries: Vec<(&String, &Triple)> = self.triples.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, triple)| triple).collect()
    }

    /// The underlying key -> triple map
    pub fn as_map(&self) -> &HashMap<String, Triple> {
        &self.triples
    }

    pub fn into_map(self) -> HashMap<String, Triple> {
        self.triples
    }
}

impl IntoIterator for TripleSet {
    type Item = Triple;
    type IntoIter = IntoValues<String, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_values()
    }
}

impl<'a> IntoIterator for &'a TripleSet {
    type Item = &'a Triple;
    type IntoIter = Values<'a, String, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Triple> for TripleSet {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut set = TripleSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Triple> for TripleSet {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}
