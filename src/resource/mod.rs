//! OSLC resources and discovery documents
//!
//! A [`Resource`] is a subject URI plus the graph that describes it. The
//! discovery documents and the compact preview are newtype views over it
//! that add one or two lookups each.

mod accessors;
mod discovery;
mod view;

pub use accessors::{CoreAccessors, ResourceView};
pub use discovery::{
    Capability, CapabilityKind, Compact, Domain, Preview, ProviderEntry, RootServices,
    ServiceProvider, ServiceProviderCatalog,
};
pub use view::{PropertyValue, Resource};
