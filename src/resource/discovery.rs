//! Discovery documents
//!
//! Each kind of document in the discovery chain is a view over a
//! [`Resource`] that knows how to pull one or two well-known links out of
//! its own graph:
//!
//! - [`RootServices`]: domain → service provider catalog URL
//! - [`ServiceProviderCatalog`]: provider title → service provider URL
//! - [`ServiceProvider`]: resource type → query base / creation factory URL
//!
//! When several capabilities serve the same resource type the first one in
//! document order wins. [`Graph`](crate::rdf::Graph) preserves document
//! order, so the choice is stable for a given response body.

use super::{Resource, ResourceView};
use crate::error::OslcError;
use crate::rdf::{vocab, Literal, RdfObject, RdfSubject};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// OSLC domains with a rootservices catalog link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Domain {
    /// Change management
    CM,
    /// Requirements management
    RM,
    /// Quality management
    QM,
}

impl Domain {
    /// Rootservices predicate linking to this domain's catalog
    pub fn service_providers_predicate(&self) -> &'static str {
        match self {
            Domain::CM => vocab::CM_SERVICE_PROVIDERS,
            Domain::RM => vocab::RM_SERVICE_PROVIDERS,
            Domain::QM => vocab::QM_SERVICE_PROVIDERS,
        }
    }

    /// Domain namespace, as used by `oslc:domain`
    pub fn namespace(&self) -> &'static str {
        match self {
            Domain::CM => vocab::OSLC_CM,
            Domain::RM => vocab::OSLC_RM,
            Domain::QM => vocab::OSLC_QM,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::CM => "CM",
            Domain::RM => "RM",
            Domain::QM => "QM",
        };
        f.write_str(name)
    }
}

impl FromStr for Domain {
    type Err = OslcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CM" => Ok(Domain::CM),
            "RM" => Ok(Domain::RM),
            "QM" => Ok(Domain::QM),
            other => Err(OslcError::InvalidArgument(format!(
                "unknown OSLC domain '{}', expected CM, RM or QM",
                other
            ))),
        }
    }
}

macro_rules! document_view {
    ($name:ident) => {
        impl ResourceView for $name {
            fn resource(&self) -> &Resource {
                &self.0
            }

            fn resource_mut(&mut self) -> &mut Resource {
                &mut self.0
            }
        }

        impl From<Resource> for $name {
            fn from(resource: Resource) -> Self {
                Self(resource)
            }
        }
    };
}

/// First IRI object of (subject, predicate)
fn link(resource: &Resource, subject: &RdfSubject, predicate: &str) -> Option<String> {
    resource
        .graph()
        .objects(subject, predicate)
        .into_iter()
        .find(|o| o.is_named_node())
        .map(|o| o.value().to_string())
}

/// Node objects of (subject, predicate), as subjects to walk further
fn nodes(resource: &Resource, subject: &RdfSubject, predicate: &str) -> Vec<RdfSubject> {
    resource
        .graph()
        .objects(subject, predicate)
        .into_iter()
        .filter_map(RdfObject::as_subject)
        .collect()
}

/// The unauthenticated bootstrap document at `{server}/rootservices`
#[derive(Debug, Clone)]
pub struct RootServices(Resource);

document_view!(RootServices);

impl RootServices {
    /// Catalog URL linked from the rootservices subject by `predicate`
    pub fn service_provider_catalog(&self, predicate: &str) -> Option<String> {
        link(&self.0, self.0.subject(), predicate)
    }

    /// Catalog URL for a domain
    ///
    /// Uses the domain's `*ServiceProviders` link, falling back to the
    /// `jd:oslcCatalogs` listing filtered by `oslc:domain`.
    pub fn catalog_for_domain(&self, domain: Domain) -> Option<String> {
        self.service_provider_catalog(domain.service_providers_predicate())
            .or_else(|| self.catalog_by_oslc_domain(domain.namespace()))
    }

    fn catalog_by_oslc_domain(&self, namespace: &str) -> Option<String> {
        let domain = RdfObject::iri(namespace).ok()?;
        nodes(&self.0, self.0.subject(), vocab::JD_OSLC_CATALOGS)
            .into_iter()
            .find(|catalog| {
                self.0
                    .graph()
                    .objects(catalog, vocab::OSLC_DOMAIN)
                    .contains(&&domain)
            })
            .filter(RdfSubject::is_named_node)
            .map(|catalog| catalog.as_str().to_string())
    }
}

/// A service provider listed in a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderEntry {
    pub title: Option<String>,
    pub url: String,
}

/// A document listing named service providers (e.g. project areas)
#[derive(Debug, Clone)]
pub struct ServiceProviderCatalog(Resource);

document_view!(ServiceProviderCatalog);

impl ServiceProviderCatalog {
    /// URL of the provider whose `dcterms:title` is exactly `title`
    ///
    /// Titles are compared as `rdf:XMLLiteral` values; there is no partial
    /// or case-insensitive matching.
    pub fn service_provider(&self, title: &str) -> Option<String> {
        let title = RdfObject::Literal(Literal::new_xml_literal(title));
        self.0
            .graph()
            .subjects(vocab::DCTERMS_TITLE, &title)
            .into_iter()
            .find(|s| s.is_named_node())
            .map(|s| s.as_str().to_string())
    }

    /// Providers linked from the catalog by `oslc:serviceProvider`
    pub fn service_providers(&self) -> Vec<ProviderEntry> {
        nodes(&self.0, self.0.subject(), vocab::OSLC_SERVICE_PROVIDER)
            .into_iter()
            .filter(RdfSubject::is_named_node)
            .map(|sp| ProviderEntry {
                title: self
                    .0
                    .graph()
                    .any_object(&sp, vocab::DCTERMS_TITLE)
                    .map(|t| t.value().to_string()),
                url: sp.as_str().to_string(),
            })
            .collect()
    }
}

/// What kind of capability a [`Capability`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CapabilityKind {
    Query,
    Creation,
}

impl CapabilityKind {
    fn container_predicate(&self) -> &'static str {
        match self {
            CapabilityKind::Query => vocab::OSLC_QUERY_CAPABILITY,
            CapabilityKind::Creation => vocab::OSLC_CREATION_FACTORY,
        }
    }

    fn url_predicate(&self) -> &'static str {
        match self {
            CapabilityKind::Query => vocab::OSLC_QUERY_BASE,
            CapabilityKind::Creation => vocab::OSLC_CREATION,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            CapabilityKind::Query => "query capability",
            CapabilityKind::Creation => "creation factory",
        }
    }
}

/// A query capability or creation factory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capability {
    pub kind: CapabilityKind,
    pub title: Option<String>,
    /// `oslc:queryBase` or `oslc:creation`
    pub url: String,
    pub resource_types: Vec<String>,
    pub usages: Vec<String>,
}

impl Capability {
    fn serves(&self, resource_type: &str) -> bool {
        self.resource_types.iter().any(|t| t == resource_type)
            || (self.kind == CapabilityKind::Creation && self.usages.iter().any(|u| u == resource_type))
    }
}

/// A document enumerating the capabilities of one provider
#[derive(Debug, Clone)]
pub struct ServiceProvider(Resource);

document_view!(ServiceProvider);

impl ServiceProvider {
    /// `oslc:queryBase` of the first query capability for `resource_type`
    pub fn query_base(&self, resource_type: &str) -> Option<String> {
        self.find(CapabilityKind::Query, resource_type)
    }

    /// `oslc:creation` of the first creation factory whose resource type or
    /// usage is `resource_type`
    pub fn creation_factory(&self, resource_type: &str) -> Option<String> {
        self.find(CapabilityKind::Creation, resource_type)
    }

    pub fn query_capabilities(&self) -> Vec<Capability> {
        self.capabilities(CapabilityKind::Query)
    }

    pub fn creation_factories(&self) -> Vec<Capability> {
        self.capabilities(CapabilityKind::Creation)
    }

    fn find(&self, kind: CapabilityKind, resource_type: &str) -> Option<String> {
        self.capabilities(kind)
            .into_iter()
            .find(|c| c.serves(resource_type))
            .map(|c| c.url)
    }

    /// Walk self → oslc:service → capability, in document order
    fn capabilities(&self, kind: CapabilityKind) -> Vec<Capability> {
        let resource = &self.0;
        let graph = resource.graph();
        let values = |node: &RdfSubject, predicate: &str| -> Vec<String> {
            graph
                .objects(node, predicate)
                .into_iter()
                .map(|o| o.value().to_string())
                .collect()
        };

        nodes(resource, resource.subject(), vocab::OSLC_SERVICE)
            .iter()
            .flat_map(|service| nodes(resource, service, kind.container_predicate()))
            .filter_map(|capability| {
                Some(Capability {
                    kind,
                    title: graph
                        .any_object(&capability, vocab::DCTERMS_TITLE)
                        .map(|t| t.value().to_string()),
                    url: link(resource, &capability, kind.url_predicate())?,
                    resource_types: values(&capability, vocab::OSLC_RESOURCE_TYPE),
                    usages: values(&capability, vocab::OSLC_USAGE),
                })
            })
            .collect()
    }
}

/// A resource preview (`application/x-oslc-compact+xml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub document: String,
    pub hint_height: Option<String>,
    pub hint_width: Option<String>,
}

/// OSLC Compact representation used for resource previews
#[derive(Debug, Clone)]
pub struct Compact(Resource);

document_view!(Compact);

impl Compact {
    pub fn icon(&self) -> Option<&str> {
        self.0.get_value(vocab::OSLC_ICON)
    }

    pub fn icon_title(&self) -> Option<&str> {
        self.0.get_value(vocab::OSLC_ICON_TITLE)
    }

    pub fn icon_src_set(&self) -> Option<&str> {
        self.0.get_value(vocab::OSLC_ICON_SRC_SET)
    }

    pub fn small_preview(&self) -> Option<Preview> {
        self.preview(vocab::OSLC_SMALL_PREVIEW)
    }

    pub fn large_preview(&self) -> Option<Preview> {
        self.preview(vocab::OSLC_LARGE_PREVIEW)
    }

    fn preview(&self, predicate: &str) -> Option<Preview> {
        let graph = self.0.graph();
        let preview = self.0.get_one(predicate)?.as_subject()?;
        let value = |p: &str| graph.any_object(&preview, p).map(|o| o.value().to_string());
        Some(Preview {
            document: value(vocab::OSLC_DOCUMENT)?,
            hint_height: value(vocab::OSLC_HINT_HEIGHT),
            hint_width: value(vocab::OSLC_HINT_WIDTH),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{RdfFormat, RdfParser};
    use crate::resource::CoreAccessors;

    fn resource(url: &str, turtle: &str) -> Resource {
        let graph = RdfParser::parse(turtle, RdfFormat::Turtle, Some(url)).unwrap();
        Resource::new(url, graph).unwrap()
    }

    const ROOTSERVICES: &str = r#"
@prefix oslc_cm: <http://open-services.net/xmlns/cm/1.0/> .
@prefix jd: <http://jazz.net/xmlns/prod/jazz/discovery/1.0/> .
@prefix oslc: <http://open-services.net/ns/core#> .
<> oslc_cm:cmServiceProviders <http://example.com/ccm/catalog> ;
   jd:oslcCatalogs <http://example.com/qm/catalog> .
<http://example.com/qm/catalog> oslc:domain <http://open-services.net/ns/qm#> .
"#;

    #[test]
    fn test_domain_from_str() {
        assert_eq!("cm".parse::<Domain>().unwrap(), Domain::CM);
        assert_eq!(" RM ".parse::<Domain>().unwrap(), Domain::RM);
        assert!("AM".parse::<Domain>().is_err());
    }

    #[test]
    fn test_rootservices_catalog_lookup() {
        let root = RootServices::from(resource("http://example.com/rootservices", ROOTSERVICES));
        assert_eq!(
            root.catalog_for_domain(Domain::CM).as_deref(),
            Some("http://example.com/ccm/catalog")
        );
        assert_eq!(
            root.catalog_for_domain(Domain::QM).as_deref(),
            Some("http://example.com/qm/catalog")
        );
        assert_eq!(root.catalog_for_domain(Domain::RM), None);
    }

    #[test]
    fn test_catalog_requires_exact_xml_literal_title() {
        let catalog = ServiceProviderCatalog::from(resource(
            "http://example.com/catalog",
            r#"
@prefix oslc: <http://open-services.net/ns/core#> .
@prefix dcterms: <http://purl.org/dc/terms/> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
<> oslc:serviceProvider <http://example.com/sp/jke>, <http://example.com/sp/plain> .
<http://example.com/sp/jke> dcterms:title "JKE Banking CM"^^rdf:XMLLiteral .
<http://example.com/sp/plain> dcterms:title "Plain Title" .
"#,
        ));

        assert_eq!(
            catalog.service_provider("JKE Banking CM").as_deref(),
            Some("http://example.com/sp/jke")
        );
        assert_eq!(catalog.service_provider("jke banking cm"), None);
        assert_eq!(catalog.service_provider("JKE Banking"), None);
        assert_eq!(catalog.service_provider("Plain Title"), None);
        assert_eq!(catalog.service_providers().len(), 2);
    }

    const PROVIDER: &str = r#"
@prefix oslc: <http://open-services.net/ns/core#> .
@prefix dcterms: <http://purl.org/dc/terms/> .
<> oslc:service [
    oslc:queryCapability [
        dcterms:title "Defects" ;
        oslc:resourceType <http://open-services.net/ns/cm#ChangeRequest> ;
        oslc:queryBase <http://example.com/q/first>
    ], [
        oslc:resourceType <http://open-services.net/ns/cm#ChangeRequest> ;
        oslc:queryBase <http://example.com/q/second>
    ] ;
    oslc:creationFactory [
        oslc:usage <http://open-services.net/ns/cm#defect> ;
        oslc:creation <http://example.com/create/defect>
    ], [
        oslc:resourceType <http://open-services.net/ns/cm#Task> ;
        oslc:creation <http://example.com/create/task>
    ]
] .
"#;

    #[test]
    fn test_query_base_first_match_wins() {
        let sp = ServiceProvider::from(resource("http://example.com/sp/1", PROVIDER));
        assert_eq!(
            sp.query_base("http://open-services.net/ns/cm#ChangeRequest").as_deref(),
            Some("http://example.com/q/first")
        );
        assert_eq!(sp.query_base("http://open-services.net/ns/cm#Task"), None);
        assert_eq!(sp.query_capabilities().len(), 2);
        assert_eq!(sp.query_capabilities()[0].title.as_deref(), Some("Defects"));
    }

    #[test]
    fn test_creation_factory_by_type_or_usage() {
        let sp = ServiceProvider::from(resource("http://example.com/sp/1", PROVIDER));
        assert_eq!(
            sp.creation_factory("http://open-services.net/ns/cm#defect").as_deref(),
            Some("http://example.com/create/defect")
        );
        assert_eq!(
            sp.creation_factory("http://open-services.net/ns/cm#Task").as_deref(),
            Some("http://example.com/create/task")
        );
        assert_eq!(sp.creation_factory("http://open-services.net/ns/cm#ChangeRequest"), None);
    }

    #[test]
    fn test_compact_preview() {
        let compact = Compact::from(resource(
            "http://example.com/wi/1",
            r#"
@prefix oslc: <http://open-services.net/ns/core#> .
@prefix dcterms: <http://purl.org/dc/terms/> .
<> dcterms:title "Defect 1" ;
   oslc:shortTitle "1" ;
   oslc:icon <http://example.com/defect.gif> ;
   oslc:smallPreview [
       oslc:document <http://example.com/wi/1/preview> ;
       oslc:hintHeight "10em"
   ] .
"#,
        ));

        assert_eq!(compact.title(), Some("Defect 1"));
        assert_eq!(compact.short_title(), Some("1"));
        assert_eq!(compact.icon(), Some("http://example.com/defect.gif"));
        let preview = compact.small_preview().unwrap();
        assert_eq!(preview.document, "http://example.com/wi/1/preview");
        assert_eq!(preview.hint_height.as_deref(), Some("10em"));
        assert_eq!(preview.hint_width, None);
        assert!(compact.large_preview().is_none());
    }
}
