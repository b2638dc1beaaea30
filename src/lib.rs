//! OSLC Client
//!
//! A client library for the Open Services for Lifecycle Collaboration
//! (OSLC) REST/RDF protocols spoken by change, requirements and quality
//! management servers.
//!
//! # Architecture
//!
//! - [`transport`]: HTTP with transparent authentication. A request that
//!   hits a JEE form-login wall, a `jauth` token realm or a plain 401 is
//!   authenticated once and replayed once.
//! - [`resource`]: resources as graph views, plus the discovery documents
//!   (rootservices, service provider catalog, service provider, compact).
//! - [`client`]: [`OslcClient`] walks rootservices → catalog → provider →
//!   capability, then queries (following `oslc:nextPage`), creates, updates
//!   and deletes resources.
//! - [`ldm`]: [`IncomingLinkResolver`] finds links *into* resources through
//!   LDM `discover-links` or LQE SPARQL, and inverts them.
//! - [`rdf`]: terms, an ordered in-memory graph, namespaces and
//!   Turtle / N-Triples / RDF/XML I/O, JSON-LD output.
//!
//! ## Example Usage
//!
//! ```rust
//! use oslc_client::rdf::{vocab, Graph};
//! use oslc_client::{CoreAccessors, Resource};
//!
//! let mut wi = Resource::new("https://jazz.example.com/ccm/resource/itemName/WorkItem/257", Graph::new()).unwrap();
//! wi.set_title("Crash on save").unwrap();
//! wi.set_literal(vocab::DCTERMS_IDENTIFIER, "257").unwrap();
//!
//! assert_eq!(wi.title(), Some("Crash on save"));
//! assert_eq!(wi.get_value(vocab::DCTERMS_IDENTIFIER), Some("257"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod ldm;
pub mod logging;
pub mod rdf;
pub mod resource;
pub mod transport;

// Re-export main types for convenience
pub use client::{Document, OslcClient, QueryParams};

pub use config::ClientConfig;

pub use error::{DiscoveryStep, OslcError, OslcResult};

pub use ldm::{IncomingLinkResolver, InvertedLinkTriple, LinkTriple};

pub use resource::{
    Capability, CapabilityKind, Compact, CoreAccessors, Domain, Preview, PropertyValue,
    ProviderEntry, Resource, ResourceView, RootServices, ServiceProvider, ServiceProviderCatalog,
};

pub use transport::{
    AuthChallenge, AuthState, AuthenticatingTransport, Credentials, HttpBackend, HttpRequest,
    HttpResponse, ReqwestBackend,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
