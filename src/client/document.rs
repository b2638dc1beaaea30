//! Turning a fetched response into a document

use crate::error::OslcResult;
use crate::rdf::{media_type_essence, Graph, RdfFormat, RdfParser};
use crate::resource::Resource;
use crate::transport::HttpResponse;
use tracing::warn;

/// A fetched document, by representation
#[derive(Debug, Clone)]
pub enum Document {
    /// Any RDF serialization
    Rdf(Resource),
    /// Plain XML (`text/xml`, `application/xml`), kept as text
    Xml {
        text: String,
        etag: Option<String>,
    },
    /// Atom feed (`application/atom+xml`), kept as text
    Feed {
        text: String,
        etag: Option<String>,
    },
}

impl Document {
    pub fn etag(&self) -> Option<&str> {
        match self {
            Document::Rdf(resource) => resource.etag(),
            Document::Xml { etag, .. } | Document::Feed { etag, .. } => etag.as_deref(),
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Document::Rdf(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn into_resource(self) -> Option<Resource> {
        match self {
            Document::Rdf(resource) => Some(resource),
            _ => None,
        }
    }
}

/// RDF format announced by a response, RDF/XML when unknown or missing
///
/// JSON bodies map to JSON-LD so the parser reports them as unreadable
/// instead of failing on them as XML.
pub(crate) fn rdf_format(response: &HttpResponse) -> RdfFormat {
    let essence = media_type_essence(response.content_type());
    if essence == "application/ld+json" || essence == "application/json" {
        return RdfFormat::JsonLd;
    }
    RdfFormat::from_media_type(&essence).unwrap_or(RdfFormat::RdfXml)
}

/// Parse a response body into `graph`, keeping whatever was read before a
/// syntax error
pub(crate) fn parse_best_effort(
    graph: &mut Graph,
    response: &HttpResponse,
    format: RdfFormat,
    base: &str,
) {
    let text = response.text();
    if text.trim().is_empty() {
        return;
    }
    if let Err(e) = RdfParser::parse_into(graph, &text, format, Some(base)) {
        warn!("partial parse of {} ({}): {}", base, format.media_type(), e);
    }
}

/// Classify a response by Content-Type and build the matching document
pub(crate) fn from_response(url: &str, response: &HttpResponse) -> OslcResult<Document> {
    let etag = response.etag().map(String::from);

    match media_type_essence(response.content_type()).as_str() {
        "text/xml" | "application/xml" => Ok(Document::Xml {
            text: response.text(),
            etag,
        }),
        "application/atom+xml" => Ok(Document::Feed {
            text: response.text(),
            etag,
        }),
        _ => {
            let mut graph = Graph::new();
            parse_best_effort(&mut graph, response, rdf_format(response), url);
            Ok(Document::Rdf(Resource::new(url, graph)?.with_etag(etag)))
        }
    }
}
