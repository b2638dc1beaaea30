//! OSLC query: parameters, request URL and `oslc:nextPage` pagination

use super::document::{parse_best_effort, rdf_format};
use super::OslcClient;
use crate::error::{OslcError, OslcResult};
use crate::rdf::{vocab, Graph, Namespaces, RdfPredicate, RdfSubject, TriplePattern};
use crate::resource::Resource;
use crate::transport::HttpRequest;
use std::collections::HashSet;
use tracing::{debug, warn};

/// `oslc.*` query fragments, passed through verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub prefix: Option<String>,
    pub select: Option<String>,
    pub where_clause: Option<String>,
    pub order_by: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set `oslc.prefix` from known prefixes, e.g. `["dcterms", "oslc_cm"]`
    pub fn prefixes(self, namespaces: &Namespaces, prefixes: &[&str]) -> OslcResult<Self> {
        Ok(self.prefix(namespaces.prefix_clause(prefixes)?))
    }

    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn where_clause(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Query string: the fragments that are set, then `oslc.paging=false`
    pub fn to_query_string(&self) -> OslcResult<String> {
        let mut pairs: Vec<(&str, &str)> = [
            ("oslc.prefix", &self.prefix),
            ("oslc.select", &self.select),
            ("oslc.where", &self.where_clause),
            ("oslc.orderBy", &self.order_by),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect();
        pairs.push(("oslc.paging", "false"));

        serde_urlencoded::to_string(&pairs).map_err(|e| OslcError::InvalidArgument(e.to_string()))
    }

    /// Full query URL for a query base
    pub fn url_for(&self, query_base: &str) -> OslcResult<String> {
        let separator = if query_base.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", query_base, separator, self.to_query_string()?))
    }
}

impl OslcClient {
    /// Run a query against the query capability for `resource_type`
    pub async fn query(&self, resource_type: &str, params: &QueryParams) -> OslcResult<Graph> {
        let query_base = self.query_base(resource_type)?;
        self.query_with_base(&query_base, params).await
    }

    /// Run a query against an explicit query base, following `oslc:nextPage`
    ///
    /// Pages are merged into one graph in link order. Following stops when a
    /// page has no next page, when a next page was already visited, or after
    /// `max_query_pages` pages.
    pub async fn query_with_base(&self, query_base: &str, params: &QueryParams) -> OslcResult<Graph> {
        let max_pages = self.config().max_query_pages.max(1);
        let mut graph = Graph::new();
        let mut visited = HashSet::new();
        let mut page_url = params.url_for(query_base)?;
        let mut lookup = query_base.to_string();

        for page in 1.. {
            visited.insert(page_url.clone());
            debug!("query page {}: {}", page, page_url);

            let response = self.transport().request(self.query_request(&page_url)).await?;
            if !response.is_success() {
                return Err(OslcError::RequestFailed {
                    status: response.status,
                    url: page_url,
                    body: response.text(),
                });
            }
            parse_best_effort(&mut graph, &response, rdf_format(&response), &page_url);

            let Some(next) = next_page(&graph, &[&lookup, &page_url]) else {
                break;
            };
            if visited.contains(&next) {
                warn!("oslc:nextPage cycle at {}, stopping after {} pages", next, page);
                break;
            }
            if page >= max_pages {
                warn!("query {} stopped at the {} page limit", query_base, max_pages);
                break;
            }
            lookup = next.clone();
            page_url = next;
        }

        Ok(graph)
    }

    /// Run a query and split the result into one resource per `rdfs:member`
    pub async fn query_resources(
        &self,
        resource_type: &str,
        params: &QueryParams,
    ) -> OslcResult<Vec<Resource>> {
        let graph = self.query(resource_type, params).await?;
        Ok(members(&graph))
    }

    fn query_request(&self, url: &str) -> HttpRequest {
        HttpRequest::get(url).header("X-Jazz-CSRF-Prevent", self.transport().csrf_token(url))
    }
}

/// First `oslc:nextPage` link found on any of the candidate subjects
fn next_page(graph: &Graph, subjects: &[&str]) -> Option<String> {
    subjects
        .iter()
        .filter_map(|s| RdfSubject::iri(s).ok())
        .find_map(|s| {
            graph
                .any_object(&s, vocab::OSLC_NEXT_PAGE)
                .filter(|o| o.is_named_node())
                .map(|o| o.value().to_string())
        })
}

/// One resource per `rdfs:member` object, holding that member's own triples
pub(crate) fn members(graph: &Graph) -> Vec<Resource> {
    let Ok(member) = RdfPredicate::new(vocab::RDFS_MEMBER) else {
        return Vec::new();
    };
    let pattern = TriplePattern::new(None, Some(member), None);

    let mut seen = HashSet::new();
    graph
        .query(&pattern)
        .into_iter()
        .filter_map(|t| t.object.as_subject())
        .filter(|subject| seen.insert(subject.clone()))
        .map(|subject| {
            let triples: Graph = graph
                .triples_for_subject(&subject)
                .into_iter()
                .cloned()
                .collect();
            Resource::from_parts(subject, triples, None)
        })
        .collect()
}
