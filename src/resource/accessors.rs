//! Capability traits over the generic resource
//!
//! Document kinds (service providers, compact previews, work items) are
//! thin views over a [`Resource`]. Shared accessors are expressed as traits
//! with blanket implementations instead of a type hierarchy.

use super::Resource;
use crate::rdf::{vocab, RdfResult};

/// Anything that is a view over a resource graph
pub trait ResourceView {
    fn resource(&self) -> &Resource;

    fn resource_mut(&mut self) -> &mut Resource;

    /// The resource URI
    fn uri(&self) -> &str {
        self.resource().uri()
    }
}

impl ResourceView for Resource {
    fn resource(&self) -> &Resource {
        self
    }

    fn resource_mut(&mut self) -> &mut Resource {
        self
    }
}

/// OSLC core vocabulary most resources carry
pub trait CoreAccessors: ResourceView {
    /// `dcterms:title` (first value when repeated)
    fn title(&self) -> Option<&str> {
        self.resource().get_value(vocab::DCTERMS_TITLE)
    }

    /// `dcterms:identifier`
    fn identifier(&self) -> Option<&str> {
        self.resource().get_value(vocab::DCTERMS_IDENTIFIER)
    }

    /// `dcterms:description` (first value when repeated)
    fn description(&self) -> Option<&str> {
        self.resource().get_value(vocab::DCTERMS_DESCRIPTION)
    }

    /// `oslc:shortTitle`
    fn short_title(&self) -> Option<&str> {
        self.resource().get_value(vocab::OSLC_SHORT_TITLE)
    }

    fn set_title(&mut self, title: &str) -> RdfResult<()> {
        self.resource_mut().set_literal(vocab::DCTERMS_TITLE, title)
    }

    fn set_description(&mut self, description: &str) -> RdfResult<()> {
        self.resource_mut()
            .set_literal(vocab::DCTERMS_DESCRIPTION, description)
    }
}

impl<T: ResourceView + ?Sized> CoreAccessors for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::Graph;

    #[test]
    fn test_core_accessors_on_resource() {
        let mut wi = Resource::new("http://example.com/wi/1", Graph::new()).unwrap();
        assert!(wi.title().is_none());

        wi.set_title("Crash on save").unwrap();
        wi.set_title("Crash on close").unwrap();
        wi.set_description("Steps to reproduce").unwrap();

        assert_eq!(wi.title(), Some("Crash on close"));
        assert_eq!(wi.description(), Some("Steps to reproduce"));
        assert_eq!(wi.get_values(vocab::DCTERMS_TITLE).len(), 1);
        assert_eq!(ResourceView::uri(&wi), "http://example.com/wi/1");
    }
}
