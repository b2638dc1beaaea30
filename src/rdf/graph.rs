//! In-memory triple graph
//!
//! Triples are kept in insertion (document) order, with two indexes:
//! - SPO: subject -> predicate -> objects
//! - POS: predicate -> object -> subjects
//!
//! The graph has set semantics, so merging overlapping documents (for
//! example successive query pages) never duplicates a statement.

use super::types::{RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Insertion-ordered RDF graph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// All triples (primary storage)
    triples: IndexSet<Triple>,

    /// SPO index: Subject -> Predicate IRI -> Objects
    spo_index: HashMap<RdfSubject, IndexMap<String, IndexSet<RdfObject>>>,

    /// POS index: Predicate IRI -> Object -> Subjects
    pos_index: HashMap<String, HashMap<RdfObject, IndexSet<RdfSubject>>>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check whether the graph holds no triples
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Check whether a triple is present
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Insert a triple, returning false when it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }

        let predicate = triple.predicate.as_str().to_string();
        self.spo_index
            .entry(triple.subject.clone())
            .or_default()
            .entry(predicate.clone())
            .or_default()
            .insert(triple.object.clone());
        self.pos_index
            .entry(predicate)
            .or_default()
            .entry(triple.object.clone())
            .or_default()
            .insert(triple.subject.clone());

        self.triples.insert(triple)
    }

    /// Remove a triple, returning false when it was not present
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.shift_remove(triple) {
            return false;
        }

        let predicate = triple.predicate.as_str();
        if let Some(by_predicate) = self.spo_index.get_mut(&triple.subject) {
            if let Some(objects) = by_predicate.get_mut(predicate) {
                objects.shift_remove(&triple.object);
                if objects.is_empty() {
                    by_predicate.shift_remove(predicate);
                }
            }
            if by_predicate.is_empty() {
                self.spo_index.remove(&triple.subject);
            }
        }

        if let Some(by_object) = self.pos_index.get_mut(predicate) {
            if let Some(subjects) = by_object.get_mut(&triple.object) {
                subjects.shift_remove(&triple.subject);
                if subjects.is_empty() {
                    by_object.remove(&triple.object);
                }
            }
            if by_object.is_empty() {
                self.pos_index.remove(predicate);
            }
        }

        true
    }

    /// Remove every triple with the given subject and predicate
    ///
    /// Returns the number of triples removed.
    pub fn remove_matching(&mut self, subject: &RdfSubject, predicate: &str) -> usize {
        let doomed: Vec<Triple> = self
            .objects(subject, predicate)
            .into_iter()
            .filter_map(|object| {
                RdfPredicate::new(predicate)
                    .ok()
                    .map(|p| Triple::new(subject.clone(), p, object.clone()))
            })
            .collect();

        doomed.iter().filter(|t| self.remove(t)).count()
    }

    /// Objects of (subject, predicate) in document order
    pub fn objects(&self, subject: &RdfSubject, predicate: &str) -> Vec<&RdfObject> {
        self.spo_index
            .get(subject)
            .and_then(|by_predicate| by_predicate.get(predicate))
            .map(|objects| objects.iter().collect())
            .unwrap_or_default()
    }

    /// First object of (subject, predicate), if any
    pub fn any_object(&self, subject: &RdfSubject, predicate: &str) -> Option<&RdfObject> {
        self.spo_index
            .get(subject)
            .and_then(|by_predicate| by_predicate.get(predicate))
            .and_then(|objects| objects.first())
    }

    /// Subjects of (predicate, object) in document order
    pub fn subjects(&self, predicate: &str, object: &RdfObject) -> Vec<&RdfSubject> {
        self.pos_index
            .get(predicate)
            .and_then(|by_object| by_object.get(object))
            .map(|subjects| subjects.iter().collect())
            .unwrap_or_default()
    }

    /// Predicates used on a subject, in document order
    pub fn predicates(&self, subject: &RdfSubject) -> Vec<&str> {
        self.spo_index
            .get(subject)
            .map(|by_predicate| by_predicate.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default()
    }

    /// Triples whose subject is the given node
    pub fn triples_for_subject(&self, subject: &RdfSubject) -> Vec<&Triple> {
        self.query(&TriplePattern::new(Some(subject.clone()), None, None))
    }

    /// Distinct subjects in document order
    pub fn subject_nodes(&self) -> Vec<&RdfSubject> {
        let mut seen = IndexSet::new();
        for triple in &self.triples {
            seen.insert(&triple.subject);
        }
        seen.into_iter().collect()
    }

    /// Match a triple pattern
    pub fn query(&self, pattern: &TriplePattern) -> Vec<&Triple> {
        match (&pattern.subject, &pattern.predicate) {
            (Some(subject), _) if !self.spo_index.contains_key(subject) => Vec::new(),
            _ => self.triples.iter().filter(|t| pattern.matches(t)).collect(),
        }
    }

    /// Iterate over all triples in document order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Merge another graph into this one
    pub fn merge(&mut self, other: Graph) {
        self.extend(other.triples);
    }

    /// Remove all triples
    pub fn clear(&mut self) {
        self.triples.clear();
        self.spo_index.clear();
        self.pos_index.clear();
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        graph.extend(iter);
        graph
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = indexmap::set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}
