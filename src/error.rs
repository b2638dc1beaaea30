//! Error types for the OSLC client

use crate::rdf::{ParseError, PrefixError, RdfError, SerializeError};
use std::fmt;
use thiserror::Error;

/// Which link of the rootservices → catalog → provider → capability chain failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStep {
    /// Fetching the rootservices document
    RootServices,
    /// Finding or fetching the service provider catalog
    Catalog,
    /// Finding or fetching the service provider
    ServiceProvider,
}

impl fmt::Display for DiscoveryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiscoveryStep::RootServices => "rootservices",
            DiscoveryStep::Catalog => "service provider catalog",
            DiscoveryStep::ServiceProvider => "service provider",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when talking to an OSLC server
#[derive(Error, Debug)]
pub enum OslcError {
    /// HTTP transport error (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Transport failure reported by a non-reqwest backend
    #[error("Transport error for {url}: {message}")]
    Backend { url: String, message: String },

    /// An authentication strategy ran but did not succeed
    #[error("{strategy} authentication failed at {url} (status {status})")]
    AuthenticationFailed {
        strategy: &'static str,
        url: String,
        status: u16,
    },

    /// Service discovery could not resolve one link of the chain
    #[error("Discovery failed at {step} ({url}): {message}")]
    Discovery {
        step: DiscoveryStep,
        url: String,
        message: String,
    },

    /// Non-2xx response on a query/create/update/delete
    #[error("Request to {url} failed with status {status}\n{body}")]
    RequestFailed { status: u16, url: String, body: String },

    /// RDF parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// RDF serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// A response body that matches none of the known result shapes
    #[error("Unexpected SPARQL results format. content-type={content_type}. body={snippet}")]
    UnexpectedResponse { content_type: String, snippet: String },

    /// The link index rejected the request as unauthorized
    #[error(
        "LQE unauthorized. status={status}. content-type={content_type}. \
         www-authenticate={www_authenticate}. \
         x-com-ibm-team-repository-web-auth-msg={web_auth_msg}. {hint}body={body}"
    )]
    Unauthorized {
        status: u16,
        content_type: String,
        www_authenticate: String,
        web_auth_msg: String,
        hint: String,
        body: String,
    },

    /// Caller supplied an invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation needs a service provider, but `use_service_provider` was not called
    #[error("No service provider selected; call use_service_provider first")]
    NoServiceProvider,

    /// The service provider has no matching capability
    #[error("No {kind} found for {resource_type}")]
    NoCapability {
        kind: &'static str,
        resource_type: String,
    },

    /// Invalid RDF term
    #[error("RDF error: {0}")]
    Rdf(#[from] RdfError),

    /// Unknown namespace prefix
    #[error("Prefix error: {0}")]
    Prefix(#[from] PrefixError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OslcError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            OslcError::RequestFailed { status, .. }
            | OslcError::AuthenticationFailed { status, .. }
            | OslcError::Unauthorized { status, .. } => Some(*status),
            OslcError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body carried by the error, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            OslcError::RequestFailed { body, .. } | OslcError::Unauthorized { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }
}

pub type OslcResult<T> = Result<T, OslcError>;
