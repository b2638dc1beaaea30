//! RDF/XML format implementation
//!
//! Most Jazz-era OSLC servers answer in RDF/XML, and the OSLC compact
//! representation (`application/x-oslc-compact+xml`) is RDF/XML as well.

use super::{base_iri, to_rio, ParseError, ParseResult, SerializeResult, TermConverter};
use crate::rdf::Graph;
use rio_api::formatter::TriplesFormatter;
use rio_api::parser::TriplesParser;
use rio_xml::{RdfXmlFormatter, RdfXmlParser};
use std::io::{BufReader, Cursor};

pub(super) fn parse_into(
    graph: &mut Graph,
    terms: &mut TermConverter,
    input: &str,
    base: Option<&str>,
) -> ParseResult<()> {
    let reader = BufReader::new(Cursor::new(input));
    let mut parser = RdfXmlParser::new(reader, base_iri(base));

    parser.parse_all(&mut |t| -> Result<(), ParseError> {
        graph.insert(terms.triple(t)?);
        Ok(())
    })
}

pub(super) fn serialize(graph: &Graph) -> SerializeResult<String> {
    let mut formatter = RdfXmlFormatter::new(Vec::new())?;
    for triple in graph.iter() {
        formatter.format(&to_rio(triple))?;
    }
    let output = formatter.finish()?;
    String::from_utf8(output).map_err(|e| super::SerializeError::Serialize(e.to_string()))
}
