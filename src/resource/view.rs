//! Generic OSLC resource: a subject plus the graph describing it
//!
//! Properties are read and written by predicate IRI, so any OSLC domain can
//! be used without domain-specific types. Following the open-world
//! assumption, reading a property that is not there is not an error; it is
//! simply unset.

use crate::rdf::{
    BlankNode, Graph, Literal, RdfObject, RdfPredicate, RdfResult, RdfSubject, Triple,
};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The value(s) of one property, as returned by [`Resource::get`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Exactly one value
    Single(String),
    /// Two or more values, in document order
    Many(Vec<String>),
    /// No value
    Unset,
}

impl PropertyValue {
    fn from_values(mut values: Vec<String>) -> Self {
        match values.len() {
            0 => PropertyValue::Unset,
            1 => PropertyValue::Single(values.remove(0)),
            _ => PropertyValue::Many(values),
        }
    }

    /// Check if the property is unset
    pub fn is_unset(&self) -> bool {
        matches!(self, PropertyValue::Unset)
    }

    /// First value, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            PropertyValue::Single(v) => Some(v),
            PropertyValue::Many(vs) => vs.first().map(|v| v.as_str()),
            PropertyValue::Unset => None,
        }
    }

    /// All values as a slice-like vector
    pub fn to_vec(&self) -> Vec<&str> {
        match self {
            PropertyValue::Single(v) => vec![v.as_str()],
            PropertyValue::Many(vs) => vs.iter().map(|v| v.as_str()).collect(),
            PropertyValue::Unset => Vec::new(),
        }
    }

    fn push(self, value: String) -> Self {
        match self {
            PropertyValue::Unset => PropertyValue::Single(value),
            PropertyValue::Single(first) => PropertyValue::Many(vec![first, value]),
            PropertyValue::Many(mut vs) => {
                vs.push(value);
                PropertyValue::Many(vs)
            }
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Single(v) => write!(f, "{}", v),
            PropertyValue::Many(vs) => write!(f, "{}", vs.join(", ")),
            PropertyValue::Unset => Ok(()),
        }
    }
}

/// An OSLC resource
#[derive(Debug, Clone)]
pub struct Resource {
    subject: RdfSubject,
    graph: Graph,
    etag: Option<String>,
}

impl Resource {
    /// Wrap a graph describing the resource at `uri`
    pub fn new(uri: &str, graph: Graph) -> RdfResult<Self> {
        Ok(Self::from_parts(RdfSubject::iri(uri)?, graph, None))
    }

    /// A new, empty resource with an anonymous subject, ready to be filled
    /// in and created on a server
    pub fn anonymous() -> Self {
        Self::from_parts(RdfSubject::BlankNode(BlankNode::new()), Graph::new(), None)
    }

    pub fn from_parts(subject: RdfSubject, graph: Graph, etag: Option<String>) -> Self {
        Self {
            subject,
            graph,
            etag,
        }
    }

    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }

    /// The resource URI (a blank node label for anonymous resources)
    pub fn uri(&self) -> &str {
        self.subject.as_str()
    }

    pub fn subject(&self) -> &RdfSubject {
        &self.subject
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Concurrency token from the last GET
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn set_etag(&mut self, etag: Option<String>) {
        self.etag = etag;
    }

    /// First object of a property
    pub fn get_one(&self, property: &str) -> Option<&RdfObject> {
        self.graph.any_object(&self.subject, property)
    }

    /// All objects of a property
    pub fn get_all(&self, property: &str) -> Vec<&RdfObject> {
        self.graph.objects(&self.subject, property)
    }

    /// First value (IRI or lexical form) of a property
    pub fn get_value(&self, property: &str) -> Option<&str> {
        self.get_one(property).map(|o| o.value())
    }

    /// All values (IRIs or lexical forms) of a property
    pub fn get_values(&self, property: &str) -> Vec<&str> {
        self.get_all(property).into_iter().map(|o| o.value()).collect()
    }

    /// Property value(s): unset, single or many
    pub fn get(&self, property: &str) -> PropertyValue {
        PropertyValue::from_values(self.get_values(property).into_iter().map(String::from).collect())
    }

    /// Replace every value of a property
    ///
    /// All existing triples for (resource, property) are removed first, so
    /// an empty `values` removes the property.
    pub fn set<I>(&mut self, property: &str, values: I) -> RdfResult<()>
    where
        I: IntoIterator<Item = RdfObject>,
    {
        let predicate = RdfPredicate::new(property)?;
        self.graph.remove_matching(&self.subject, property);
        for value in values {
            self.graph
                .insert(Triple::new(self.subject.clone(), predicate.clone(), value));
        }
        Ok(())
    }

    /// Replace a property with a single plain literal
    pub fn set_literal(&mut self, property: &str, value: impl Into<String>) -> RdfResult<()> {
        self.set(property, [RdfObject::Literal(Literal::new_simple_literal(value))])
    }

    /// Replace a property with a single link
    pub fn set_link(&mut self, property: &str, target: &str) -> RdfResult<()> {
        self.set(property, [RdfObject::iri(target)?])
    }

    /// Add one more value to a property
    pub fn add(&mut self, property: &str, value: RdfObject) -> RdfResult<()> {
        let predicate = RdfPredicate::new(property)?;
        self.graph
            .insert(Triple::new(self.subject.clone(), predicate, value));
        Ok(())
    }

    /// Remove a property, returning how many values were removed
    pub fn remove(&mut self, property: &str) -> usize {
        self.graph.remove_matching(&self.subject, property)
    }

    /// Predicates whose value is a link to another resource
    pub fn link_types(&self) -> IndexSet<String> {
        self.graph
            .triples_for_subject(&self.subject)
            .into_iter()
            .filter(|t| t.object.is_named_node())
            .map(|t| t.predicate.as_str().to_string())
            .collect()
    }

    /// Every property of the resource, in document order
    pub fn properties(&self) -> IndexMap<String, PropertyValue> {
        let mut props: IndexMap<String, PropertyValue> = IndexMap::new();
        for triple in self.graph.triples_for_subject(&self.subject) {
            let slot = props
                .entry(triple.predicate.as_str().to_string())
                .or_insert(PropertyValue::Unset);
            *slot = std::mem::replace(slot, PropertyValue::Unset)
                .push(triple.object.value().to_string());
        }
        props
    }
}
