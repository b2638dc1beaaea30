//! Namespace prefixes for compact IRI notation
//!
//! `Namespaces` is an immutable value: it is built once (usually with
//! [`Namespaces::oslc_defaults`]) and handed to whatever needs to expand a
//! prefixed name or build an `oslc.prefix` clause. Adding a prefix yields a
//! new value instead of mutating shared state.

use indexmap::IndexMap;
use thiserror::Error;

use super::vocab;

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Not a prefixed name
    #[error("Invalid prefixed name: {0}")]
    InvalidPrefixedName(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Namespace (prefix → IRI mapping)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Prefix
    pub prefix: String,
    /// IRI
    pub iri: String,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }
}

/// Immutable prefix table
#[derive(Debug, Clone, Default)]
pub struct Namespaces {
    prefixes: IndexMap<String, String>,
}

impl Namespaces {
    /// An empty table
    pub fn empty() -> Self {
        Self::default()
    }

    /// The vocabularies OSLC lifecycle servers commonly use
    pub fn oslc_defaults() -> Self {
        [
            ("rdf", vocab::RDF),
            ("rdfs", vocab::RDFS),
            ("xsd", vocab::XSD),
            ("dcterms", vocab::DCTERMS),
            ("foaf", vocab::FOAF),
            ("oslc", vocab::OSLC),
            ("oslc_cm", vocab::OSLC_CM),
            ("oslc_cm1", vocab::OSLC_CM1),
            ("oslc_rm", vocab::OSLC_RM),
            ("oslc_qm", vocab::OSLC_QM),
            ("oslc_qm1", vocab::OSLC_QM1),
            ("oslc_am", vocab::OSLC_AM),
            ("oslc_ldm", vocab::OSLC_LDM),
            ("jd", vocab::JD),
            ("rtc_cm", vocab::RTC_CM),
            ("rtc_ext", vocab::RTC_EXT),
            ("rqm_qm", vocab::RQM_QM),
        ]
        .into_iter()
        .fold(Self::empty(), |ns, (prefix, iri)| ns.with_prefix(prefix, iri))
    }

    /// Return a copy with one more (or a replaced) prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), iri.into());
        self
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Build a full IRI from a prefix and a local name
    pub fn term(&self, prefix: &str, local: &str) -> PrefixResult<String> {
        Ok(format!("{}{}", self.get_iri(prefix)?, local))
    }

    /// Expand a prefixed name (`prefix:local`) to a full IRI
    pub fn expand(&self, prefixed: &str) -> PrefixResult<String> {
        match prefixed.split_once(':') {
            Some((prefix, local)) => self.term(prefix, local),
            None => Err(PrefixError::InvalidPrefixedName(prefixed.to_string())),
        }
    }

    /// Compact an IRI using the longest matching namespace
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()) && iri.len() > ns.len())
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| format!("{}:{}", prefix, &iri[ns.len()..]))
    }

    /// Render an `oslc.prefix` clause, e.g. `dcterms=<http://purl.org/dc/terms/>`
    pub fn prefix_clause(&self, prefixes: &[&str]) -> PrefixResult<String> {
        let parts = prefixes
            .iter()
            .map(|prefix| Ok(format!("{}=<{}>", prefix, self.get_iri(prefix)?)))
            .collect::<PrefixResult<Vec<_>>>()?;
        Ok(parts.join(","))
    }

    /// Get all registered prefixes in registration order
    pub fn prefixes(&self) -> Vec<Namespace> {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| Namespace::new(prefix.clone(), iri.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefixes() {
        let ns = Namespaces::oslc_defaults();
        assert_eq!(ns.get_iri("oslc").unwrap(), "http://open-services.net/ns/core#");
        assert_eq!(ns.get_iri("dcterms").unwrap(), "http://purl.org/dc/terms/");
        assert!(ns.get_iri("nope").is_err());
    }

    #[test]
    fn test_expand() {
        let ns = Namespaces::oslc_defaults();
        assert_eq!(
            ns.expand("oslc_cm:ChangeRequest").unwrap(),
            "http://open-services.net/ns/cm#ChangeRequest"
        );
        assert!(matches!(
            ns.expand("ChangeRequest"),
            Err(PrefixError::InvalidPrefixedName(_))
        ));
    }

    #[test]
    fn test_compact_prefers_longest_namespace() {
        let ns = Namespaces::oslc_defaults()
            .with_prefix("wi", "http://open-services.net/ns/cm#Change");
        assert_eq!(
            ns.compact("http://open-services.net/ns/cm#ChangeRequest"),
            Some("wi:Request".to_string())
        );
        assert_eq!(ns.compact("http://unknown.example/x"), None);
    }

    #[test]
    fn test_with_prefix_leaves_original_untouched() {
        let base = Namespaces::oslc_defaults();
        let extended = base.clone().with_prefix("ex", "http://example.com/");
        assert!(base.get_iri("ex").is_err());
        assert_eq!(extended.expand("ex:a").unwrap(), "http://example.com/a");
    }

    #[test]
    fn test_prefix_clause() {
        let ns = Namespaces::oslc_defaults();
        assert_eq!(
            ns.prefix_clause(&["dcterms", "oslc"]).unwrap(),
            "dcterms=<http://purl.org/dc/terms/>,oslc=<http://open-services.net/ns/core#>"
        );
    }
}
