//! Turtle format implementation

use super::{base_iri, to_rio, ParseError, ParseResult, SerializeError, SerializeResult, TermConverter};
use crate::rdf::Graph;
use rio_api::formatter::TriplesFormatter;
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleFormatter, TurtleParser};
use std::io::{BufReader, Cursor};

/// Parse Turtle (or N-Triples, a subset of it) into a graph
pub(super) fn parse_into(
    graph: &mut Graph,
    terms: &mut TermConverter,
    input: &str,
    base: Option<&str>,
) -> ParseResult<()> {
    let mut reader = BufReader::new(Cursor::new(input));
    let mut parser = TurtleParser::new(&mut reader, base_iri(base));

    parser.parse_all(&mut |t| -> Result<(), ParseError> {
        graph.insert(terms.triple(t)?);
        Ok(())
    })
}

/// Serialize a graph to Turtle
pub(super) fn serialize(graph: &Graph) -> SerializeResult<String> {
    let mut formatter = TurtleFormatter::new(Vec::new());

    for triple in graph.iter() {
        formatter
            .format(&to_rio(triple))
            .map_err(|e| SerializeError::Serialize(e.to_string()))?;
    }

    let output = formatter.finish()?;
    String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
}
