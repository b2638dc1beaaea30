//! Client configuration
//!
//! A [`ClientConfig`] can be built in code, read from the environment or
//! loaded from a YAML file:
//!
//! ```yaml
//! user: alice
//! password: secret
//! configuration_context: https://jazz.example.com/gc/configuration/17
//! timeout_secs: 60
//! ```

use crate::error::{OslcError, OslcResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Accept header used for RDF content negotiation
pub const DEFAULT_ACCEPT: &str =
    "text/turtle, application/rdf+xml;q=0.9, application/ld+json;q=0.8, application/json;q=0.7";

/// OSLC-Core-Version sent on every request
pub const DEFAULT_OSLC_VERSION: &str = "2.0";

/// Configuration for an OSLC client session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// User id for authentication challenges
    pub user: Option<String>,
    /// Password for authentication challenges
    pub password: Option<String>,
    /// Global configuration context, sent as `Configuration-Context`
    pub configuration_context: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// OSLC-Core-Version header value
    pub oslc_version: String,
    /// Accept header for RDF reads
    pub accept: String,
    /// Accept self-signed TLS certificates
    pub accept_invalid_certs: bool,
    /// Upper bound on `oslc:nextPage` pages followed by one query
    pub max_query_pages: usize,
    /// Verbose tracing of authentication and link discovery
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user: None,
            password: None,
            configuration_context: None,
            timeout_secs: 30,
            oslc_version: DEFAULT_OSLC_VERSION.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_invalid_certs: false,
            max_query_pages: 1000,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Configuration with credentials
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Read configuration from `OSLC_*` environment variables
    pub fn from_env() -> OslcResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OslcResult<Self> {
        let mut config = Self {
            user: lookup("OSLC_USER"),
            password: lookup("OSLC_PASSWORD"),
            configuration_context: lookup("OSLC_CONFIGURATION_CONTEXT"),
            ..Self::default()
        };

        if let Some(timeout) = lookup("OSLC_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_| OslcError::Config(format!("OSLC_TIMEOUT_SECS is not a number: {}", timeout)))?;
        }
        config.accept_invalid_certs = lookup("OSLC_INSECURE_TLS").map(|v| is_truthy(&v)).unwrap_or(false);
        config.debug = ["OSLC_DEBUG", "DEBUG_LQE"]
            .iter()
            .any(|key| lookup(key).map(|v| is_truthy(&v)).unwrap_or(false));

        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> OslcResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| OslcError::Config(e.to_string()))
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> OslcResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| OslcError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_configuration_context(mut self, context: impl Into<String>) -> Self {
        self.configuration_context = Some(context.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_max_query_pages(mut self, pages: usize) -> Self {
        self.max_query_pages = pages;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Credentials, when both user and password are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
