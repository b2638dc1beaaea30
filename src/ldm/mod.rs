//! Incoming-link discovery
//!
//! OSLC links are stored on the source resource only. To find what links
//! *to* a resource, ask either a Link Discovery Management (LDM) service or
//! a Lifecycle Query Engine (LQE) SPARQL endpoint. [`IncomingLinkResolver`]
//! picks the protocol from the base URL: anything containing `/lqe` is
//! queried with SPARQL, everything else through `discover-links`.
//!
//! The LDM path tries three request encodings in order, each failure
//! falling through to the next:
//!
//! 1. a Turtle body (`oslc_ldm:resources`, `oslc_ldm:linkPredicates`)
//! 2. a form with `objectResources` + `predicateFilters`
//! 3. a form with `objectConceptResources` + `predicateFilters`
//!
//! The LQE path POSTs the query as `application/sparql-query` and, if the
//! server insists on a query string, again as a `query=` form. Its
//! responses are normalized by [`sparql::normalize_response`].

mod inverse;
pub mod sparql;

pub use inverse::{inverse_link_types, lookup_inverse, InverseLookup};

use crate::config::ClientConfig;
use crate::error::{OslcError, OslcResult};
use crate::rdf::{vocab, RdfFormat, RdfParser};
use crate::transport::{AuthenticatingTransport, HttpRequest, HttpResponse, ReqwestBackend};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// A link from `source_url` to `target_url`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkTriple {
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    #[serde(rename = "linkType")]
    pub link_type: String,
    #[serde(rename = "targetURL")]
    pub target_url: String,
}

/// The same link seen from its target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvertedLinkTriple {
    #[serde(rename = "targetURL")]
    pub target_url: String,
    #[serde(rename = "inverseLinkType")]
    pub inverse_link_type: String,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
}

/// Finds links pointing at a set of resources
pub struct IncomingLinkResolver {
    transport: Arc<AuthenticatingTransport>,
    base_url: String,
    warned: Mutex<HashSet<String>>,
}

impl IncomingLinkResolver {
    /// Resolver over an existing (possibly already authenticated) transport
    pub fn new(transport: Arc<AuthenticatingTransport>, base_url: &str) -> OslcResult<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(OslcError::InvalidArgument(
                "link discovery base URL is required".to_string(),
            ));
        }

        Ok(Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            warned: Mutex::new(HashSet::new()),
        })
    }

    /// Resolver with its own reqwest transport
    pub fn from_config(config: ClientConfig, base_url: &str) -> OslcResult<Self> {
        let backend = ReqwestBackend::new(&config)?;
        let transport = AuthenticatingTransport::new(Arc::new(backend), config);
        Self::new(Arc::new(transport), base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when the base URL points at LQE
    pub fn is_lqe(&self) -> bool {
        self.base_url.contains("/lqe")
    }

    /// Link types already reported as unmapped or ambiguous
    pub fn warned_predicates(&self) -> Vec<String> {
        let mut warned: Vec<String> = self
            .warned
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect();
        warned.sort();
        warned
    }

    /// Links whose target is one of `targets`, optionally limited to `link_types`
    ///
    /// `configuration_context` overrides the configured one for this call.
    pub async fn get_incoming_links(
        &self,
        targets: &[String],
        link_types: &[String],
        configuration_context: Option<&str>,
    ) -> OslcResult<Vec<LinkTriple>> {
        if targets.is_empty() {
            return Err(OslcError::InvalidArgument(
                "target resource URLs must be a non-empty list".to_string(),
            ));
        }
        require_all(targets, "target resource URL")?;
        require_all(link_types, "link type")?;

        let context = match configuration_context {
            Some(context) => Some(require(context, "configuration context")?.to_string()),
            None => self.transport.config().configuration_context.clone(),
        };

        if self.is_lqe() {
            self.via_lqe(targets, link_types, context.as_deref()).await
        } else {
            self.via_ldm(targets, link_types, context.as_deref()).await
        }
    }

    async fn via_ldm(
        &self,
        targets: &[String],
        link_types: &[String],
        context: Option<&str>,
    ) -> OslcResult<Vec<LinkTriple>> {
        let url = format!("{}/discover-links", self.base_url);

        match self.ldm_turtle_request(&url, targets, link_types, context).await {
            Ok(links) => return Ok(links),
            Err(e) => debug!("LDM Turtle request failed, trying objectResources form: {}", e),
        }
        match self
            .ldm_form_request(&url, "objectResources", targets, link_types, context)
            .await
        {
            Ok(links) => return Ok(links),
            Err(e) => debug!("LDM objectResources form failed, trying objectConceptResources: {}", e),
        }
        self.ldm_form_request(&url, "objectConceptResources", targets, link_types, context)
            .await
    }

    async fn ldm_turtle_request(
        &self,
        url: &str,
        targets: &[String],
        link_types: &[String],
        context: Option<&str>,
    ) -> OslcResult<Vec<LinkTriple>> {
        let request = self
            .ldm_request(url, context)
            .header("Content-Type", "text/turtle")
            .body(discover_links_body(targets, link_types));
        let response = self.transport.request(request).await?;
        parse_links(&response, url)
    }

    async fn ldm_form_request(
        &self,
        url: &str,
        object_field: &str,
        targets: &[String],
        link_types: &[String],
        context: Option<&str>,
    ) -> OslcResult<Vec<LinkTriple>> {
        let fields: Vec<(&str, &str)> = targets
            .iter()
            .map(|t| (object_field, t.as_str()))
            .chain(link_types.iter().map(|p| ("predicateFilters", p.as_str())))
            .collect();

        let request = self
            .ldm_request(url, context)
            .form(&fields)
            .map_err(|e| OslcError::InvalidArgument(e.to_string()))?;
        let response = self.transport.request(request).await?;
        parse_links(&response, url)
    }

    fn ldm_request(&self, url: &str, context: Option<&str>) -> HttpRequest {
        let mut request = HttpRequest::post(url).header("Accept", self.transport.config().accept.as_str());
        if let Some(context) = context {
            request.set_header("Configuration-Context", context);
        }
        request
    }

    async fn via_lqe(
        &self,
        targets: &[String],
        link_types: &[String],
        context: Option<&str>,
    ) -> OslcResult<Vec<LinkTriple>> {
        let url = format!("{}/sparql", self.base_url);
        let query = sparql::incoming_links_query(targets, link_types);
        debug!("LQE base URL: {}", self.base_url);
        debug!("SPARQL request body:\n{}", query);

        let mut base = HttpRequest::post(url.as_str())
            .header("Accept", "application/sparql-results+json")
            .header("X-Jazz-CSRF-Prevent", "1");
        if let Some(context) = context {
            base.set_header("Configuration-Context", context);
        }
        if !self.transport.has_authorization().await {
            base.basic_auth = self.transport.credentials();
        }

        let request = base
            .clone()
            .header("Content-Type", "application/sparql-query")
            .body(query.clone());
        let mut response = self.transport.send_direct(request).await?;

        if sparql::is_missing_query_string(&response) {
            debug!("LQE wants a query string, retrying as form");
            let request = base
                .form(&[("query", query.as_str())])
                .map_err(|e| OslcError::InvalidArgument(e.to_string()))?;
            response = self.transport.send_direct(request).await?;
        }

        if !response.is_success() && response.status != 401 {
            return Err(OslcError::RequestFailed {
                status: response.status,
                url,
                body: response.text(),
            });
        }
        sparql::normalize_response(&response, &url)
    }

    /// Swap source and target and map each link type to its inverse
    ///
    /// Unknown link types are kept as their own inverse. Unknown and
    /// ambiguous link types are logged once per resolver.
    pub fn invert(&self, triples: &[LinkTriple]) -> OslcResult<Vec<InvertedLinkTriple>> {
        triples
            .iter()
            .map(|t| {
                let source = require(&t.source_url, "sourceURL")?;
                let link_type = require(&t.link_type, "linkType")?;
                let target = require(&t.target_url, "targetURL")?;

                let inverse = match lookup_inverse(link_type) {
                    InverseLookup::Ambiguous { chosen, candidates } => {
                        self.warn_once(link_type, || {
                            warn!(
                                "{} inverse link type mappings found for {}; using {}",
                                candidates.len(),
                                link_type,
                                chosen
                            )
                        });
                        chosen
                    }
                    InverseLookup::Identity(same) => {
                        self.warn_once(link_type, || {
                            warn!("no inverse link type mapping for {}", link_type)
                        });
                        same
                    }
                    InverseLookup::Direct(inverse) | InverseLookup::Reverse(inverse) => inverse,
                };

                Ok(InvertedLinkTriple {
                    target_url: target.to_string(),
                    inverse_link_type: inverse,
                    source_url: source.to_string(),
                })
            })
            .collect()
    }

    fn warn_once(&self, link_type: &str, emit: impl FnOnce()) {
        let first = self
            .warned
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(link_type.to_string());
        if first {
            emit();
        }
    }
}

/// Turtle request body for `discover-links`
pub fn discover_links_body(targets: &[String], link_types: &[String]) -> String {
    let list = |iris: &[String]| {
        iris.iter()
            .map(|iri| format!("<{}>", iri))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut body = format!("@prefix oslc_ldm: <{}> .\n", vocab::OSLC_LDM);
    body.push_str(&format!("[] oslc_ldm:resources {}", list(targets)));
    if !link_types.is_empty() {
        body.push_str(&format!(" ;\n   oslc_ldm:linkPredicates {}", list(link_types)));
    }
    body.push_str(" .\n");
    body
}

/// Every triple of an RDF response as a link; Turtle when unlabelled
fn parse_links(response: &HttpResponse, base: &str) -> OslcResult<Vec<LinkTriple>> {
    if !response.is_success() {
        return Err(OslcError::RequestFailed {
            status: response.status,
            url: base.to_string(),
            body: response.text(),
        });
    }
    let format = RdfFormat::from_media_type(response.content_type()).unwrap_or(RdfFormat::Turtle);
    let graph = RdfParser::parse(&response.text(), format, Some(base))?;
    Ok(sparql::triples_from_graph(&graph))
}

fn require<'a>(value: &'a str, name: &str) -> OslcResult<&'a str> {
    if value.trim().is_empty() {
        Err(OslcError::InvalidArgument(format!("{} must be a non-empty string", name)))
    } else {
        Ok(value)
    }
}

fn require_all(values: &[String], name: &str) -> OslcResult<()> {
    values.iter().try_for_each(|v| require(v, name).map(|_| ()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(base: &str) -> IncomingLinkResolver {
        IncomingLinkResolver::from_config(ClientConfig::default(), base).unwrap()
    }

    #[test]
    fn test_base_url() {
        assert!(IncomingLinkResolver::from_config(ClientConfig::default(), " ").is_err());

        let ldm = resolver("https://jazz.example.com/ldm/");
        assert_eq!(ldm.base_url(), "https://jazz.example.com/ldm");
        assert!(!ldm.is_lqe());
        assert!(resolver("https://jazz.example.com/lqe").is_lqe());
    }

    #[test]
    fn test_discover_links_body() {
        let targets = vec!["http://x/2".to_string(), "http://x/3".to_string()];
        assert_eq!(
            discover_links_body(&targets, &[]),
            "@prefix oslc_ldm: <http://open-services.net/ns/ldm#> .\n\
             [] oslc_ldm:resources <http://x/2>, <http://x/3> .\n"
        );

        let body = discover_links_body(&targets[..1], &["http://open-services.net/ns/rm#satisfies".to_string()]);
        assert!(body.ends_with(
            " ;\n   oslc_ldm:linkPredicates <http://open-services.net/ns/rm#satisfies> .\n"
        ));
        let graph = RdfParser::parse(&body, RdfFormat::Turtle, None).unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_invert_validates_fields() {
        let ldm = resolver("https://jazz.example.com/ldm");
        let bad = LinkTriple {
            source_url: String::new(),
            link_type: "http://open-services.net/ns/rm#satisfies".to_string(),
            target_url: "http://x/2".to_string(),
        };
        assert!(matches!(ldm.invert(&[bad]), Err(OslcError::InvalidArgument(_))));
        assert!(ldm.invert(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_link_triple_json_names() {
        let link = LinkTriple {
            source_url: "http://x/1".to_string(),
            link_type: "http://open-services.net/ns/rm#satisfies".to_string(),
            target_url: "http://x/2".to_string(),
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["sourceURL"], "http://x/1");
        assert_eq!(json["targetURL"], "http://x/2");
    }

    #[tokio::test]
    async fn test_empty_targets_rejected() {
        let ldm = resolver("https://jazz.example.com/ldm");
        let err = ldm.get_incoming_links(&[], &[], None).await.unwrap_err();
        assert!(matches!(err, OslcError::InvalidArgument(_)));
    }
}
