//! JSON-LD format implementation (write-only)
//!
//! Reading JSON-LD needs a full expansion processor (contexts, `@vocab`,
//! `@list`, remote documents); responses are requested as Turtle or RDF/XML
//! instead. Output is expanded JSON-LD, one node object per subject.

use super::{ParseError, ParseResult, SerializeError, SerializeResult};
use crate::rdf::{Graph, RdfObject, RdfSubject};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

pub(super) fn parse_into(_graph: &mut Graph, _input: &str) -> ParseResult<()> {
    Err(ParseError::Parse(
        "JSON-LD reading is not supported; request text/turtle or application/rdf+xml".to_string(),
    ))
}

/// One node object per subject, in document order.
pub(super) fn serialize(graph: &Graph) -> SerializeResult<String> {
    let mut nodes: IndexMap<String, IndexMap<String, Vec<Value>>> = IndexMap::new();

    for triple in graph.iter() {
        let subject = match &triple.subject {
            RdfSubject::NamedNode(n) => n.as_str().to_string(),
            RdfSubject::BlankNode(b) => format!("_:{}", b.as_str()),
        };

        let value = match &triple.object {
            RdfObject::NamedNode(n) => json!({ "@id": n.as_str() }),
            RdfObject::BlankNode(b) => json!({ "@id": format!("_:{}", b.as_str()) }),
            RdfObject::Literal(l) => match l.language() {
                Some(lang) => json!({ "@value": l.value(), "@language": lang }),
                None if l.is_plain() => json!({ "@value": l.value() }),
                None => json!({ "@value": l.value(), "@type": l.datatype() }),
            },
        };

        nodes
            .entry(subject)
            .or_default()
            .entry(triple.predicate.as_str().to_string())
            .or_default()
            .push(value);
    }

    let output: Vec<Value> = nodes
        .into_iter()
        .map(|(subject, props)| {
            let mut node = Map::new();
            node.insert("@id".to_string(), Value::String(subject));
            for (predicate, values) in props {
                node.insert(predicate, Value::Array(values));
            }
            Value::Object(node)
        })
        .collect();

    serde_json::to_string_pretty(&output).map_err(|e| SerializeError::Serialize(e.to_string()))
}
