//! RDF support for the OSLC client
//!
//! OSLC documents are RDF graphs. This module provides:
//! - RDF terms and triples (thin wrappers over `oxrdf`)
//! - an insertion-ordered, indexed in-memory [`Graph`]
//! - parsing and serialization (Turtle, N-Triples, RDF/XML; JSON-LD output)
//! - the immutable [`Namespaces`] prefix table and well-known [`vocab`] IRIs
//!
//! # Example
//!
//! ```rust
//! use oslc_client::rdf::{Graph, RdfFormat, RdfParser, RdfSubject, vocab};
//!
//! let doc = r#"<http://example.com/wi/257> <http://purl.org/dc/terms/identifier> "257" ."#;
//! let graph = RdfParser::parse(doc, RdfFormat::Turtle, None).unwrap();
//!
//! let wi = RdfSubject::iri("http://example.com/wi/257").unwrap();
//! assert_eq!(graph.any_object(&wi, vocab::DCTERMS_IDENTIFIER).unwrap().value(), "257");
//! ```

mod graph;
mod namespace;
mod serialization;
mod types;
pub mod vocab;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    Triple, TriplePattern,
};

pub use graph::Graph;

pub use namespace::{Namespace, Namespaces, PrefixError, PrefixResult};

pub use serialization::{
    media_type_essence, ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer, SerializeError,
    SerializeResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdf_module_exports() {
        let _graph: Graph = Graph::new();
        let _ns = Namespaces::oslc_defaults();
        assert_eq!(RdfFormat::RdfXml.media_type(), "application/rdf+xml");
    }
}
