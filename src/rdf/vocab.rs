//! Well-known IRIs used by the discovery, query and link protocols

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_XML_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const RDFS_MEMBER: &str = "http://www.w3.org/2000/01/rdf-schema#member";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const DCTERMS_TITLE: &str = "http://purl.org/dc/terms/title";
pub const DCTERMS_IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
pub const DCTERMS_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";

pub const OSLC: &str = "http://open-services.net/ns/core#";
pub const OSLC_SERVICE: &str = "http://open-services.net/ns/core#service";
pub const OSLC_SERVICE_PROVIDER: &str = "http://open-services.net/ns/core#serviceProvider";
pub const OSLC_DOMAIN: &str = "http://open-services.net/ns/core#domain";
pub const OSLC_QUERY_CAPABILITY: &str = "http://open-services.net/ns/core#queryCapability";
pub const OSLC_QUERY_BASE: &str = "http://open-services.net/ns/core#queryBase";
pub const OSLC_CREATION_FACTORY: &str = "http://open-services.net/ns/core#creationFactory";
pub const OSLC_CREATION: &str = "http://open-services.net/ns/core#creation";
pub const OSLC_RESOURCE_TYPE: &str = "http://open-services.net/ns/core#resourceType";
pub const OSLC_USAGE: &str = "http://open-services.net/ns/core#usage";
pub const OSLC_NEXT_PAGE: &str = "http://open-services.net/ns/core#nextPage";
pub const OSLC_SHORT_TITLE: &str = "http://open-services.net/ns/core#shortTitle";
pub const OSLC_ICON: &str = "http://open-services.net/ns/core#icon";
pub const OSLC_ICON_TITLE: &str = "http://open-services.net/ns/core#iconTitle";
pub const OSLC_ICON_SRC_SET: &str = "http://open-services.net/ns/core#iconSrcSet";
pub const OSLC_SMALL_PREVIEW: &str = "http://open-services.net/ns/core#smallPreview";
pub const OSLC_LARGE_PREVIEW: &str = "http://open-services.net/ns/core#largePreview";
pub const OSLC_DOCUMENT: &str = "http://open-services.net/ns/core#document";
pub const OSLC_HINT_HEIGHT: &str = "http://open-services.net/ns/core#hintHeight";
pub const OSLC_HINT_WIDTH: &str = "http://open-services.net/ns/core#hintWidth";

pub const OSLC_CM: &str = "http://open-services.net/ns/cm#";
pub const OSLC_CM1: &str = "http://open-services.net/xmlns/cm/1.0/";
pub const OSLC_RM: &str = "http://open-services.net/ns/rm#";
pub const OSLC_QM: &str = "http://open-services.net/ns/qm#";
pub const OSLC_QM1: &str = "http://open-services.net/xmlns/qm/1.0/";
pub const OSLC_AM: &str = "http://open-services.net/ns/am#";
pub const OSLC_LDM: &str = "http://open-services.net/ns/ldm#";

/// Rootservices links to the per-domain service provider catalogs
pub const CM_SERVICE_PROVIDERS: &str = "http://open-services.net/xmlns/cm/1.0/cmServiceProviders";
pub const RM_SERVICE_PROVIDERS: &str = "http://open-services.net/ns/rm#rmServiceProviders";
pub const QM_SERVICE_PROVIDERS: &str = "http://open-services.net/xmlns/qm/1.0/qmServiceProviders";

pub const JD: &str = "http://jazz.net/xmlns/prod/jazz/discovery/1.0/";
pub const JD_OSLC_CATALOGS: &str = "http://jazz.net/xmlns/prod/jazz/discovery/1.0/oslcCatalogs";
pub const RTC_CM: &str = "http://jazz.net/xmlns/prod/jazz/rtc/cm/1.0/";
pub const RTC_EXT: &str = "http://jazz.net/xmlns/prod/jazz/rtc/ext/1.0/";
pub const RQM_QM: &str = "http://jazz.net/ns/qm/rqm#";
