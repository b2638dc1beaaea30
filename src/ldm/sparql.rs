//! LQE SPARQL: query text and result normalization
//!
//! LQE deployments answer the same SELECT in several shapes depending on
//! version and proxy configuration. [`normalize_response`] accepts:
//!
//! - SPARQL results JSON (`{"results": {"bindings": [...]}}`)
//! - a bare `{"bindings": [...]}` object
//! - a row array (`{"results": [{"s": .., "p": .., "o": ..}]}`), where each
//!   cell is either a string or a `{"value": ..}` object and the columns may
//!   be named `subject`/`predicate`/`object`
//! - an RDF graph (Turtle, RDF/XML), one link per triple
//!
//! Anything else is an [`OslcError::UnexpectedResponse`] carrying the first
//! 800 characters of the body.

use super::LinkTriple;
use crate::error::{OslcError, OslcResult};
use crate::rdf::{media_type_essence, Graph, RdfFormat, RdfParser};
use crate::transport::{HttpResponse, WEB_AUTH_MSG_HEADER};
use serde_json::Value;
use tracing::debug;

const SNIPPET_LEN: usize = 800;

/// `SELECT ?s ?p ?o` for links into `targets`, optionally limited to `link_types`
pub fn incoming_links_query(targets: &[String], link_types: &[String]) -> String {
    let objects = iri_list(targets);
    let mut clauses = Vec::with_capacity(3);
    if !link_types.is_empty() {
        clauses.push(format!("VALUES ?p {{ {} }}", iri_list(link_types)));
    }
    clauses.push(format!("VALUES ?o {{ {} }}", objects));
    clauses.push("?s ?p ?o .".to_string());

    format!("SELECT ?s ?p ?o WHERE {{ {} }}", clauses.join(" "))
}

fn iri_list(iris: &[String]) -> String {
    iris.iter()
        .map(|iri| format!("<{}>", iri))
        .collect::<Vec<_>>()
        .join(" ")
}

/// True for the 400 some LQE versions return when the query is in the body
/// rather than a `query=` form field
pub fn is_missing_query_string(response: &HttpResponse) -> bool {
    response.status == 400
        && response
            .text()
            .to_ascii_lowercase()
            .contains("does not contain a query string")
}

/// Normalize an LQE response into link triples
pub fn normalize_response(response: &HttpResponse, base: &str) -> OslcResult<Vec<LinkTriple>> {
    let content_type = response.content_type().to_string();
    let text = response.text();
    let essence = media_type_essence(&content_type);
    debug!("LQE response content-type: {}", essence);
    let is_json = essence.contains("sparql-results+json") || essence == "application/json";

    // JSON bodies carry IRIs and literals, so only text bodies are sniffed
    if response.status == 401 || (!is_json && text.to_ascii_lowercase().contains("unauthorized")) {
        return Err(unauthorized(response, &content_type, &text));
    }

    if is_json {
        let json: Value = serde_json::from_str(&text).map_err(|_| unexpected(&content_type, &text))?;
        return triples_from_json(&json).ok_or_else(|| unexpected(&content_type, &text));
    }

    if let Some(format) = RdfFormat::from_media_type(&essence) {
        let graph = RdfParser::parse(&text, format, Some(base))?;
        return Ok(triples_from_graph(&graph));
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(json) => {
                if let Some(triples) = triples_from_json(&json) {
                    return Ok(triples);
                }
            }
            Err(e) => debug!("LQE body is not JSON: {}", e),
        }
    }
    if trimmed.starts_with("@prefix") || trimmed.starts_with('<') || trimmed.contains("PREFIX ") {
        match RdfParser::parse(trimmed, RdfFormat::Turtle, Some(base)) {
            Ok(graph) => return Ok(triples_from_graph(&graph)),
            Err(e) => debug!("LQE body is not Turtle: {}", e),
        }
    }

    Err(unexpected(&content_type, &text))
}

fn unauthorized(response: &HttpResponse, content_type: &str, text: &str) -> OslcError {
    let www_authenticate = response.header("www-authenticate").unwrap_or_default();
    let hint = if www_authenticate.contains("OAuth realm") {
        "Note: LQE is requesting OAuth Authorization; provide an Authorization header (e.g., Bearer token). "
    } else {
        ""
    };

    OslcError::Unauthorized {
        status: response.status,
        content_type: content_type.to_string(),
        www_authenticate: www_authenticate.to_string(),
        web_auth_msg: response.header(WEB_AUTH_MSG_HEADER).unwrap_or_default().to_string(),
        hint: hint.to_string(),
        body: text.trim().to_string(),
    }
}

fn unexpected(content_type: &str, text: &str) -> OslcError {
    OslcError::UnexpectedResponse {
        content_type: content_type.to_string(),
        snippet: text.chars().take(SNIPPET_LEN).collect(),
    }
}

/// Link triples from one of the JSON result shapes, `None` for other shapes
pub fn triples_from_json(json: &Value) -> Option<Vec<LinkTriple>> {
    let bindings = json
        .pointer("/results/bindings")
        .or_else(|| json.get("bindings"))
        .and_then(Value::as_array);

    if let Some(bindings) = bindings {
        return Some(
            bindings
                .iter()
                .filter_map(|b| {
                    let value = |name: &str| b.get(name)?.get("value")?.as_str();
                    link(value("s"), value("p"), value("o"))
                })
                .collect(),
        );
    }

    let rows = json.get("results").and_then(Value::as_array)?;
    Some(
        rows.iter()
            .filter_map(|row| {
                let column = |short: &str, long: &str| cell(row, short).or_else(|| cell(row, long));
                link(
                    column("s", "subject"),
                    column("p", "predicate"),
                    column("o", "object"),
                )
            })
            .collect(),
    )
}

fn cell<'a>(row: &'a Value, name: &str) -> Option<&'a str> {
    let value = row.get(name)?;
    value
        .get("value")
        .and_then(Value::as_str)
        .or_else(|| value.as_str())
}

fn link(source: Option<&str>, link_type: Option<&str>, target: Option<&str>) -> Option<LinkTriple> {
    let nonempty = |s: Option<&str>| s.filter(|v| !v.is_empty()).map(String::from);
    Some(LinkTriple {
        source_url: nonempty(source)?,
        link_type: nonempty(link_type)?,
        target_url: nonempty(target)?,
    })
}

/// Every triple of an RDF response as a link
pub fn triples_from_graph(graph: &Graph) -> Vec<LinkTriple> {
    graph
        .iter()
        .map(|t| LinkTriple {
            source_url: t.subject.as_str().to_string(),
            link_type: t.predicate.as_str().to_string(),
            target_url: t.object.value().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SATISFIES: &str = "http://open-services.net/ns/rm#satisfies";

    fn expected() -> Vec<LinkTriple> {
        vec![LinkTriple {
            source_url: "http://x/1".to_string(),
            link_type: SATISFIES.to_string(),
            target_url: "http://x/2".to_string(),
        }]
    }

    #[test]
    fn test_query_text() {
        let targets = vec!["http://x/2".to_string(), "http://x/3".to_string()];
        assert_eq!(
            incoming_links_query(&targets, &[]),
            "SELECT ?s ?p ?o WHERE { VALUES ?o { <http://x/2> <http://x/3> } ?s ?p ?o . }"
        );
        assert_eq!(
            incoming_links_query(&targets[..1], &[SATISFIES.to_string()]),
            "SELECT ?s ?p ?o WHERE { VALUES ?p { <http://open-services.net/ns/rm#satisfies> } \
             VALUES ?o { <http://x/2> } ?s ?p ?o . }"
        );
    }

    #[test]
    fn test_json_shapes() {
        let standard = json!({"head": {"vars": ["s", "p", "o"]}, "results": {"bindings": [
            {"s": {"type": "uri", "value": "http://x/1"},
             "p": {"type": "uri", "value": SATISFIES},
             "o": {"type": "uri", "value": "http://x/2"}}
        ]}});
        assert_eq!(triples_from_json(&standard), Some(expected()));

        let bare = json!({"bindings": [
            {"s": {"value": "http://x/1"}, "p": {"value": SATISFIES}, "o": {"value": "http://x/2"}},
            {"s": {"value": "http://x/9"}}
        ]});
        assert_eq!(triples_from_json(&bare), Some(expected()));

        let rows = json!({"results": [
            {"subject": "http://x/1", "predicate": {"value": SATISFIES}, "o": "http://x/2"}
        ]});
        assert_eq!(triples_from_json(&rows), Some(expected()));

        assert_eq!(triples_from_json(&json!({"boolean": true})), None);
    }

    #[test]
    fn test_normalize_by_content_type() {
        let body = json!({"results": {"bindings": [
            {"s": {"value": "http://x/1"}, "p": {"value": SATISFIES}, "o": {"value": "http://x/2"}}
        ]}})
        .to_string();
        let response = HttpResponse::new(200, "http://lqe/sparql")
            .with_header("Content-Type", "application/sparql-results+json;charset=UTF-8")
            .with_body(body);
        assert_eq!(normalize_response(&response, "http://lqe/sparql").unwrap(), expected());

        let turtle = HttpResponse::new(200, "http://lqe/sparql")
            .with_header("Content-Type", "text/turtle")
            .with_body(format!("<http://x/1> <{}> <http://x/2> .", SATISFIES));
        assert_eq!(normalize_response(&turtle, "http://lqe/sparql").unwrap(), expected());
    }

    #[test]
    fn test_normalize_by_sniffing() {
        let json_body = HttpResponse::new(200, "u").with_header("Content-Type", "text/plain").with_body(
            r#"{"bindings":[{"s":{"value":"http://x/1"},"p":{"value":"http://open-services.net/ns/rm#satisfies"},"o":{"value":"http://x/2"}}]}"#,
        );
        assert_eq!(normalize_response(&json_body, "u").unwrap(), expected());

        let turtle_body = HttpResponse::new(200, "u")
            .with_body(format!("<http://x/1> <{}> <http://x/2> .", SATISFIES));
        assert_eq!(normalize_response(&turtle_body, "u").unwrap(), expected());
    }

    #[test]
    fn test_unexpected_shape_carries_snippet() {
        let long = "x".repeat(2000);
        let response = HttpResponse::new(200, "u")
            .with_header("Content-Type", "text/html")
            .with_body(long);
        match normalize_response(&response, "u") {
            Err(OslcError::UnexpectedResponse { content_type, snippet }) => {
                assert_eq!(content_type, "text/html");
                assert_eq!(snippet.len(), 800);
            }
            other => panic!("expected UnexpectedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_unauthorized() {
        let response = HttpResponse::new(401, "u")
            .with_header("WWW-Authenticate", "OAuth realm=\"lqe\"")
            .with_body("Unauthorized");
        let err = normalize_response(&response, "u").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("LQE unauthorized. status=401."));
        assert!(message.contains("requesting OAuth Authorization"));
        assert!(message.ends_with("body=Unauthorized"));

        let body_only = HttpResponse::new(200, "u").with_body("<html>unauthorized</html>");
        assert!(matches!(
            normalize_response(&body_only, "u"),
            Err(OslcError::Unauthorized { status: 200, .. })
        ));
    }

    #[test]
    fn test_json_values_are_not_sniffed_for_unauthorized() {
        let body = json!({"results": {"bindings": [
            {"s": {"type": "uri", "value": "http://x/req/Unauthorized-Access"},
             "p": {"type": "uri", "value": SATISFIES},
             "o": {"type": "uri", "value": "http://x/2"}}
        ]}})
        .to_string();
        let response = HttpResponse::new(200, "u")
            .with_header("Content-Type", "application/sparql-results+json")
            .with_body(body);

        let links = normalize_response(&response, "u").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source_url, "http://x/req/Unauthorized-Access");
        assert_eq!(links[0].target_url, "http://x/2");

        let denied = HttpResponse::new(401, "u")
            .with_header("Content-Type", "application/json")
            .with_body("{}");
        assert!(matches!(
            normalize_response(&denied, "u"),
            Err(OslcError::Unauthorized { status: 401, .. })
        ));
    }

    #[test]
    fn test_missing_query_string() {
        let response = HttpResponse::new(400, "u")
            .with_body("CRJZS5006E The request does not contain a query string");
        assert!(is_missing_query_string(&response));
        assert!(!is_missing_query_string(&HttpResponse::new(400, "u").with_body("bad query")));
    }
}
