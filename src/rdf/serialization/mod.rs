//! RDF serialization formats
//!
//! Supports:
//! - Turtle (TTL)
//! - N-Triples (NT)
//! - RDF/XML (and the OSLC compact representation, which is RDF/XML)
//! - JSON-LD (expanded form, output only)
//!
//! Parsing streams straight into a [`Graph`]. When a document is malformed
//! the triples read before the syntax error stay in the graph and the error
//! is returned, so callers can decide to keep the partial data.

mod jsonld;
mod rdfxml;
mod turtle;

use super::{BlankNode, Graph, Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple};
use rio_api::model;
use std::collections::HashMap;
use thiserror::Error;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// RDF/XML format (.rdf)
    RdfXml,
    /// JSON-LD format (.jsonld)
    JsonLd,
}

impl RdfFormat {
    /// Pick a format from a Content-Type header value
    ///
    /// Parameters such as `charset` are ignored. Plain XML and Atom are not
    /// RDF and yield `None`, as do the JSON types, which are only written.
    pub fn from_media_type(content_type: &str) -> Option<Self> {
        match media_type_essence(content_type).as_str() {
            "text/turtle" | "application/x-turtle" | "application/turtle" => Some(Self::Turtle),
            "application/n-triples" | "text/n-triples" => Some(Self::NTriples),
            "application/rdf+xml" | "application/x-oslc-compact+xml" => Some(Self::RdfXml),
            _ => None,
        }
    }

    /// Media type used for Content-Type when sending this format
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Turtle => "text/turtle",
            Self::NTriples => "application/n-triples",
            Self::RdfXml => "application/rdf+xml",
            Self::JsonLd => "application/ld+json",
        }
    }
}

/// `type/subtype` of a Content-Type value, lower-cased, parameters dropped
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.essence_str().to_ascii_lowercase())
        .unwrap_or_else(|_| {
            content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Turtle / N-Triples syntax error
    #[error("Turtle syntax error: {0}")]
    Turtle(#[from] rio_turtle::TurtleError),

    /// RDF/XML syntax error
    #[error("RDF/XML syntax error: {0}")]
    RdfXml(#[from] rio_xml::RdfXmlError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse a document into an existing graph
    ///
    /// `base_iri` resolves relative references such as `rdf:about=""`.
    /// Returns the number of triples read from the document.
    pub fn parse_into(
        graph: &mut Graph,
        input: &str,
        format: RdfFormat,
        base_iri: Option<&str>,
    ) -> ParseResult<usize> {
        let before = graph.len();
        let mut terms = TermConverter::default();

        match format {
            RdfFormat::Turtle | RdfFormat::NTriples => {
                turtle::parse_into(graph, &mut terms, input, base_iri)?
            }
            RdfFormat::RdfXml => rdfxml::parse_into(graph, &mut terms, input, base_iri)?,
            RdfFormat::JsonLd => jsonld::parse_into(graph, input)?,
        }

        Ok(graph.len() - before)
    }

    /// Parse a document into a fresh graph
    pub fn parse(input: &str, format: RdfFormat, base_iri: Option<&str>) -> ParseResult<Graph> {
        let mut graph = Graph::new();
        Self::parse_into(&mut graph, input, format, base_iri)?;
        Ok(graph)
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize a graph to a string
    pub fn serialize(graph: &Graph, format: RdfFormat) -> SerializeResult<String> {
        match format {
            RdfFormat::Turtle => turtle::serialize(graph),
            RdfFormat::NTriples => Ok(graph.iter().map(|t| format!("{}\n", t)).collect()),
            RdfFormat::RdfXml => rdfxml::serialize(graph),
            RdfFormat::JsonLd => jsonld::serialize(graph),
        }
    }
}

/// Converts parser terms into graph terms
///
/// Blank node labels are only meaningful inside one document, so each label
/// is mapped to a freshly minted node for the lifetime of one parse.
#[derive(Default)]
pub(crate) struct TermConverter {
    blank_nodes: HashMap<String, BlankNode>,
}

impl TermConverter {
    pub(crate) fn blank_node(&mut self, label: &str) -> BlankNode {
        self.blank_nodes
            .entry(label.to_string())
            .or_insert_with(BlankNode::new)
            .clone()
    }

    pub(crate) fn named_node(&self, iri: &str) -> ParseResult<NamedNode> {
        NamedNode::new(iri).map_err(|e| ParseError::Parse(e.to_string()))
    }

    pub(crate) fn triple(&mut self, t: model::Triple<'_>) -> ParseResult<Triple> {
        let subject = match t.subject {
            model::Subject::NamedNode(n) => RdfSubject::NamedNode(self.named_node(n.iri)?),
            model::Subject::BlankNode(b) => RdfSubject::BlankNode(self.blank_node(b.id)),
            _ => return Err(ParseError::Parse("Unsupported subject type".to_string())),
        };

        let predicate = RdfPredicate::from(self.named_node(t.predicate.iri)?);

        let object = match t.object {
            model::Term::NamedNode(n) => RdfObject::NamedNode(self.named_node(n.iri)?),
            model::Term::BlankNode(b) => RdfObject::BlankNode(self.blank_node(b.id)),
            model::Term::Literal(model::Literal::Simple { value }) => {
                RdfObject::Literal(Literal::new_simple_literal(value))
            }
            model::Term::Literal(model::Literal::LanguageTaggedString { value, language }) => {
                RdfObject::Literal(
                    Literal::new_language_tagged_literal(value, language)
                        .map_err(|e| ParseError::Parse(e.to_string()))?,
                )
            }
            model::Term::Literal(model::Literal::Typed { value, datatype }) => RdfObject::Literal(
                Literal::new_typed_literal(value, self.named_node(datatype.iri)?),
            ),
            _ => return Err(ParseError::Parse("Unsupported object type".to_string())),
        };

        Ok(Triple::new(subject, predicate, object))
    }
}

/// Borrow a graph triple as a formatter triple
pub(crate) fn to_rio(triple: &Triple) -> model::Triple<'_> {
    let subject = match &triple.subject {
        RdfSubject::NamedNode(n) => model::Subject::NamedNode(model::NamedNode { iri: n.as_str() }),
        RdfSubject::BlankNode(b) => model::Subject::BlankNode(model::BlankNode { id: b.as_str() }),
    };

    let object = match &triple.object {
        RdfObject::NamedNode(n) => model::Term::NamedNode(model::NamedNode { iri: n.as_str() }),
        RdfObject::BlankNode(b) => model::Term::BlankNode(model::BlankNode { id: b.as_str() }),
        RdfObject::Literal(l) => model::Term::Literal(match l.language() {
            Some(language) => model::Literal::LanguageTaggedString {
                value: l.value(),
                language,
            },
            None if l.is_plain() => model::Literal::Simple { value: l.value() },
            None => model::Literal::Typed {
                value: l.value(),
                datatype: model::NamedNode { iri: l.datatype() },
            },
        }),
    };

    model::Triple {
        subject,
        predicate: model::NamedNode {
            iri: triple.predicate.as_str(),
        },
        object,
    }
}

pub(crate) fn base_iri(base: Option<&str>) -> Option<oxiri::Iri<String>> {
    base.and_then(|b| oxiri::Iri::parse(b.to_string()).ok())
}
