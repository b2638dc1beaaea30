//! OSLC client: service discovery, resource CRUD and query
//!
//! [`OslcClient`] owns one [`AuthenticatingTransport`] and resolves the
//! discovery chain once per [`use_service_provider`](OslcClient::use_service_provider):
//!
//! ```text
//! {server}/rootservices ──► service provider catalog ──► service provider
//!                                                          │
//!                                      resource type ──► queryBase / creation
//! ```
//!
//! # Example
//!
//! ```no_run
//! use oslc_client::{ClientConfig, Domain, OslcClient, QueryParams};
//! use oslc_client::rdf::vocab;
//!
//! # async fn run() -> oslc_client::OslcResult<()> {
//! let mut client = OslcClient::new(ClientConfig::new("alice", "secret"))?;
//! client
//!     .use_service_provider("https://jazz.example.com/ccm", "JKE Banking (Change Management)", Domain::CM)
//!     .await?;
//!
//! let params = QueryParams::new().where_clause(r#"dcterms:identifier="257""#);
//! let results = client
//!     .query_resources("http://open-services.net/ns/cm#ChangeRequest", &params)
//!     .await?;
//! for wi in &results {
//!     println!("{:?}", wi.get_value(vocab::DCTERMS_TITLE));
//! }
//! # Ok(())
//! # }
//! ```

mod document;
mod query;

pub use document::Document;
pub use query::QueryParams;

use crate::config::ClientConfig;
use crate::error::{DiscoveryStep, OslcError, OslcResult};
use crate::ldm::IncomingLinkResolver;
use crate::rdf::{vocab, Graph, Namespaces, RdfFormat, RdfParser, RdfSerializer, RdfSubject};
use crate::resource::{Compact, Domain, Resource, RootServices, ServiceProvider, ServiceProviderCatalog};
use crate::transport::{AuthenticatingTransport, HttpBackend, HttpRequest, HttpResponse, ReqwestBackend};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const RDF_XML_UTF8: &str = "application/rdf+xml; charset=utf-8";
const UNKNOWN_OWNER: &str = "Unknown";

/// A client session against one OSLC server
pub struct OslcClient {
    transport: Arc<AuthenticatingTransport>,
    namespaces: Namespaces,
    server: Option<String>,
    rootservices: Option<RootServices>,
    catalog: Option<ServiceProviderCatalog>,
    provider: Option<ServiceProvider>,
    owners: Mutex<HashMap<String, String>>,
}

impl OslcClient {
    /// Client over the reqwest backend
    pub fn new(config: ClientConfig) -> OslcResult<Self> {
        let backend = ReqwestBackend::new(&config)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Client over any [`HttpBackend`]
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn HttpBackend>) -> Self {
        Self {
            transport: Arc::new(AuthenticatingTransport::new(backend, config)),
            namespaces: Namespaces::oslc_defaults(),
            server: None,
            rootservices: None,
            catalog: None,
            provider: None,
            owners: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the prefix table used to build query prefixes
    pub fn with_namespaces(mut self, namespaces: Namespaces) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    pub fn transport(&self) -> &Arc<AuthenticatingTransport> {
        &self.transport
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Server base URL from the last `use_service_provider`
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn rootservices(&self) -> Option<&RootServices> {
        self.rootservices.as_ref()
    }

    pub fn catalog(&self) -> Option<&ServiceProviderCatalog> {
        self.catalog.as_ref()
    }

    pub fn service_provider(&self) -> Option<&ServiceProvider> {
        self.provider.as_ref()
    }

    /// Resolve rootservices → catalog → provider and keep the result
    ///
    /// `provider_name` must equal the provider's `dcterms:title` exactly.
    pub async fn use_service_provider(
        &mut self,
        server: &str,
        provider_name: &str,
        domain: Domain,
    ) -> OslcResult<()> {
        let server = server.trim_end_matches('/').to_string();
        let rootservices_url = format!("{}/rootservices", server);

        let rootservices =
            RootServices::from(self.fetch_discovery(&rootservices_url, DiscoveryStep::RootServices).await?);

        let catalog_url = rootservices
            .catalog_for_domain(domain)
            .ok_or_else(|| OslcError::Discovery {
                step: DiscoveryStep::Catalog,
                url: rootservices_url.clone(),
                message: format!("no service provider catalog for {} services", domain),
            })?;
        let catalog =
            ServiceProviderCatalog::from(self.fetch_discovery(&catalog_url, DiscoveryStep::Catalog).await?);

        let provider_url = catalog
            .service_provider(provider_name)
            .ok_or_else(|| OslcError::Discovery {
                step: DiscoveryStep::ServiceProvider,
                url: catalog_url.clone(),
                message: format!("'{}' not found in service provider catalog", provider_name),
            })?;
        let provider =
            ServiceProvider::from(self.fetch_discovery(&provider_url, DiscoveryStep::ServiceProvider).await?);

        info!("using {} service provider {} ({})", domain, provider_name, provider_url);

        self.server = Some(server);
        self.rootservices = Some(rootservices);
        self.catalog = Some(catalog);
        self.provider = Some(provider);
        Ok(())
    }

    /// Fetch one discovery document; any failure, including unparseable
    /// RDF, is a discovery error for `step`
    async fn fetch_discovery(&self, url: &str, step: DiscoveryStep) -> OslcResult<Resource> {
        let fail = |message: String| OslcError::Discovery {
            step,
            url: url.to_string(),
            message,
        };

        let response = self
            .transport
            .request(HttpRequest::get(url))
            .await
            .map_err(|e| fail(e.to_string()))?;
        if !response.is_success() {
            return Err(fail(format!("status {}", response.status)));
        }

        let format = document::rdf_format(&response);
        let graph = RdfParser::parse(&response.text(), format, Some(url)).map_err(|e| fail(e.to_string()))?;
        debug!("{} {}: {} triples", step, url, graph.len());

        Ok(Resource::new(url, graph)
            .map_err(|e| fail(e.to_string()))?
            .with_etag(response.etag().map(String::from)))
    }

    fn provider(&self) -> OslcResult<&ServiceProvider> {
        self.provider.as_ref().ok_or(OslcError::NoServiceProvider)
    }

    /// Query base for a resource type on the current provider
    pub fn query_base(&self, resource_type: &str) -> OslcResult<String> {
        self.provider()?
            .query_base(resource_type)
            .ok_or_else(|| OslcError::NoCapability {
                kind: "query capability",
                resource_type: resource_type.to_string(),
            })
    }

    /// Creation factory for a resource type on the current provider
    pub fn creation_factory(&self, resource_type: &str) -> OslcResult<String> {
        self.provider()?
            .creation_factory(resource_type)
            .ok_or_else(|| OslcError::NoCapability {
                kind: "creation factory",
                resource_type: resource_type.to_string(),
            })
    }

    /// Fetch a document, picking the representation from its Content-Type
    ///
    /// RDF bodies that fail to parse part-way are logged and yield the
    /// triples read so far.
    pub async fn get_resource(&self, url: &str) -> OslcResult<Document> {
        let response = self.transport.request(HttpRequest::get(url)).await?;
        document::from_response(url, &response)
    }

    /// Fetch a document that must be RDF
    pub async fn get_rdf_resource(&self, url: &str) -> OslcResult<Resource> {
        match self.get_resource(url).await? {
            Document::Rdf(resource) => Ok(resource),
            Document::Xml { .. } | Document::Feed { .. } => Err(OslcError::InvalidArgument(format!(
                "{} is not an RDF document",
                url
            ))),
        }
    }

    /// Fetch the OSLC Compact (preview) representation of a resource
    pub async fn get_compact_resource(&self, url: &str) -> OslcResult<Compact> {
        let request = HttpRequest::get(url).header("Accept", "application/x-oslc-compact+xml");
        let response = self.transport.request(request).await?;

        let mut graph = Graph::new();
        document::parse_best_effort(&mut graph, &response, RdfFormat::RdfXml, url);
        let resource = Resource::new(url, graph)?.with_etag(response.etag().map(String::from));
        Ok(Compact::from(resource))
    }

    /// Create a resource through the creation factory for `resource_type`
    ///
    /// Returns the created resource as read back from its `Location`.
    pub async fn create_resource(&self, resource_type: &str, resource: &Resource) -> OslcResult<Resource> {
        let factory = self.creation_factory(resource_type)?;
        let body = RdfSerializer::serialize(resource.graph(), RdfFormat::RdfXml)?;

        let request = HttpRequest::post(factory.as_str())
            .header("Content-Type", RDF_XML_UTF8)
            .header("Accept", RDF_XML_UTF8)
            .header("X-Jazz-CSRF-Prevent", self.transport.csrf_token(&factory))
            .body(body);
        let response = self.transport.send(request).await?;
        expect_status(&response, &factory, &[200, 201])?;

        let location = response
            .location()
            .ok_or_else(|| OslcError::RequestFailed {
                status: response.status,
                url: factory.clone(),
                body: "creation response has no Location header".to_string(),
            })?
            .to_string();
        info!("created {}", location);

        self.get_rdf_resource(&location).await
    }

    /// Replace a resource, sending `If-Match` when an ETag is given
    pub async fn put_resource(&self, resource: &Resource, etag: Option<&str>) -> OslcResult<Resource> {
        let url = named_uri(resource)?;
        let body = RdfSerializer::serialize(resource.graph(), RdfFormat::RdfXml)?;

        let mut request = HttpRequest::put(url)
            .header("Content-Type", RDF_XML_UTF8)
            .header("Accept", "application/rdf+xml")
            .body(body);
        if let Some(etag) = etag {
            request.set_header("If-Match", etag);
        }

        let response = self.transport.send(request).await?;
        expect_status(&response, url, &[200, 201])?;

        Ok(resource
            .clone()
            .with_etag(response.etag().map(String::from).or_else(|| resource.etag().map(String::from))))
    }

    /// Delete a resource by URI
    pub async fn delete_resource(&self, resource: &Resource) -> OslcResult<()> {
        let url = named_uri(resource)?;
        let request = HttpRequest::delete(url)
            .header("Accept", RDF_XML_UTF8)
            .header("X-Jazz-CSRF-Prevent", self.transport.csrf_token(url));

        let response = self.transport.send(request).await?;
        expect_status(&response, url, &[200, 204])?;
        info!("deleted {}", url);
        Ok(())
    }

    /// `foaf:name` of a user resource, or `"Unknown"`
    ///
    /// Names are cached per client.
    pub async fn get_owner(&self, url: &str) -> String {
        if let Some(name) = self.cached_owner(url) {
            return name;
        }

        let request = HttpRequest::get(url).header("Accept", "application/rdf+xml");
        let response = match self.transport.send(request).await {
            Ok(response) if response.status == 200 => response,
            Ok(response) => {
                debug!("owner {} -> status {}", url, response.status);
                return UNKNOWN_OWNER.to_string();
            }
            Err(e) => {
                debug!("owner {}: {}", url, e);
                return UNKNOWN_OWNER.to_string();
            }
        };

        let subject_url = response.header("content-location").unwrap_or(url).to_string();
        let mut graph = Graph::new();
        document::parse_best_effort(&mut graph, &response, document::rdf_format(&response), url);

        let name = RdfSubject::iri(&subject_url)
            .ok()
            .and_then(|s| graph.any_object(&s, vocab::FOAF_NAME).map(|o| o.value().to_string()));

        match name {
            Some(name) => {
                self.owners
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(url.to_string(), name.clone());
                name
            }
            None => UNKNOWN_OWNER.to_string(),
        }
    }

    fn cached_owner(&self, url: &str) -> Option<String> {
        self.owners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(url)
            .cloned()
    }

    /// Incoming-link resolver sharing this client's authenticated transport
    pub fn link_resolver(&self, ldm_base: &str) -> OslcResult<IncomingLinkResolver> {
        IncomingLinkResolver::new(self.transport.clone(), ldm_base)
    }
}

fn named_uri(resource: &Resource) -> OslcResult<&str> {
    if resource.subject().is_named_node() {
        Ok(resource.uri())
    } else {
        Err(OslcError::InvalidArgument(
            "resource has no URI; create it first".to_string(),
        ))
    }
}

fn expect_status(response: &HttpResponse, url: &str, accepted: &[u16]) -> OslcResult<()> {
    if accepted.contains(&response.status) {
        Ok(())
    } else {
        Err(OslcError::RequestFailed {
            status: response.status,
            url: url.to_string(),
            body: response.text(),
        })
    }
}
