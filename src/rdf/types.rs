//! RDF terms
//!
//! Newtypes over the oxrdf primitives. Subjects, predicates and objects are
//! separate types, so a triple cannot put a literal where a node belongs.

use super::vocab;
use oxrdf::{BlankNode as OxBlankNode, Literal as OxLiteral, NamedNode as OxNamedNode};
use std::fmt;
use thiserror::Error;

/// Invalid RDF term
#[derive(Error, Debug)]
pub enum RdfError {
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// An absolute IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedNode(OxNamedNode);

impl NamedNode {
    pub fn new(iri: &str) -> RdfResult<Self> {
        match OxNamedNode::new(iri) {
            Ok(node) => Ok(Self(node)),
            Err(e) => Err(RdfError::InvalidIri(format!("{}: {}", iri, e))),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// An anonymous node; every [`BlankNode::new`] is distinct
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BlankNode(OxBlankNode);

impl BlankNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A literal: plain, language-tagged or typed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    /// `xsd:string` literal
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> RdfResult<Self> {
        OxLiteral::new_language_tagged_literal(value, language)
            .map(Self)
            .map_err(|e| RdfError::InvalidLiteral(e.to_string()))
    }

    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self(OxLiteral::new_typed_literal(value, datatype.0))
    }

    /// `rdf:XMLLiteral`, which Jazz servers use for `dcterms:title`
    pub fn new_xml_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_typed_literal(
            value,
            OxNamedNode::new_unchecked(vocab::RDF_XML_LITERAL),
        ))
    }

    /// Lexical form
    pub fn value(&self) -> &str {
        self.0.value()
    }

    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Datatype IRI (`rdf:langString` for tagged literals)
    pub fn datatype(&self) -> &str {
        self.0.datatype().as_str()
    }

    /// No language tag and `xsd:string` datatype
    pub fn is_plain(&self) -> bool {
        self.language().is_none() && self.datatype() == vocab::XSD_STRING
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Subject position: IRI or blank node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfSubject {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
}

/// Predicate position: always an IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfPredicate(NamedNode);

/// Object position: IRI, blank node or literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfObject {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl RdfSubject {
    pub fn iri(iri: &str) -> RdfResult<Self> {
        Ok(RdfSubject::NamedNode(NamedNode::new(iri)?))
    }

    pub fn is_named_node(&self) -> bool {
        matches!(self, RdfSubject::NamedNode(_))
    }

    pub fn is_blank_node(&self) -> bool {
        !self.is_named_node()
    }

    /// IRI, or the blank node label
    pub fn as_str(&self) -> &str {
        match self {
            RdfSubject::NamedNode(n) => n.as_str(),
            RdfSubject::BlankNode(b) => b.as_str(),
        }
    }
}

impl RdfPredicate {
    pub fn new(iri: &str) -> RdfResult<Self> {
        NamedNode::new(iri).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl RdfObject {
    pub fn iri(iri: &str) -> RdfResult<Self> {
        Ok(RdfObject::NamedNode(NamedNode::new(iri)?))
    }

    /// Plain string literal
    pub fn literal(value: impl Into<String>) -> Self {
        RdfObject::Literal(Literal::new_simple_literal(value))
    }

    pub fn is_named_node(&self) -> bool {
        matches!(self, RdfObject::NamedNode(_))
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, RdfObject::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, RdfObject::Literal(_))
    }

    /// IRI, blank node label or lexical form
    pub fn value(&self) -> &str {
        match self {
            RdfObject::NamedNode(n) => n.as_str(),
            RdfObject::BlankNode(b) => b.as_str(),
            RdfObject::Literal(l) => l.value(),
        }
    }

    /// The same node in subject position; `None` for literals
    pub fn as_subject(&self) -> Option<RdfSubject> {
        match self {
            RdfObject::NamedNode(n) => Some(RdfSubject::NamedNode(n.clone())),
            RdfObject::BlankNode(b) => Some(RdfSubject::BlankNode(b.clone())),
            RdfObject::Literal(_) => None,
        }
    }
}

impl fmt::Display for RdfSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfSubject::NamedNode(n) => n.fmt(f),
            RdfSubject::BlankNode(b) => b.fmt(f),
        }
    }
}

impl fmt::Display for RdfPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for RdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfObject::NamedNode(n) => n.fmt(f),
            RdfObject::BlankNode(b) => b.fmt(f),
            RdfObject::Literal(l) => l.fmt(f),
        }
    }
}

macro_rules! term_from {
    ($($from:ty => $to:ty: $variant:path),* $(,)?) => {
        $(
            impl From<$from> for $to {
                fn from(term: $from) -> Self {
                    $variant(term)
                }
            }
        )*
    };
}

term_from! {
    NamedNode => RdfSubject: RdfSubject::NamedNode,
    BlankNode => RdfSubject: RdfSubject::BlankNode,
    NamedNode => RdfPredicate: RdfPredicate,
    NamedNode => RdfObject: RdfObject::NamedNode,
    BlankNode => RdfObject: RdfObject::BlankNode,
    Literal => RdfObject: RdfObject::Literal,
}

impl From<RdfSubject> for RdfObject {
    fn from(subject: RdfSubject) -> Self {
        match subject {
            RdfSubject::NamedNode(n) => n.into(),
            RdfSubject::BlankNode(b) => b.into(),
        }
    }
}

/// One statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: RdfSubject,
    pub predicate: RdfPredicate,
    pub object: RdfObject,
}

impl Triple {
    pub fn new(subject: RdfSubject, predicate: RdfPredicate, object: RdfObject) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// A triple with optional positions; `None` matches anything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Option<RdfSubject>,
    pub predicate: Option<RdfPredicate>,
    pub object: Option<RdfObject>,
}

impl TriplePattern {
    pub fn new(
        subject: Option<RdfSubject>,
        predicate: Option<RdfPredicate>,
        object: Option<RdfObject>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.as_ref().map_or(true, |s| *s == triple.subject)
            && self.predicate.as_ref().map_or(true, |p| *p == triple.predicate)
            && self.object.as_ref().map_or(true, |o| *o == triple.object)
    }
}
