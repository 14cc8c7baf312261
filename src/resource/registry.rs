//! Resource Registry - type name to implementation
//!
//! Built once on first access and shared for the life of the process.

use super::data_sources;
use super::lifecycle::{DataSource, Resource};
use super::resources;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Every resource and data source, keyed by type name
pub struct Registry {
    resources: BTreeMap<&'static str, Box<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DataSource>>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Get the registry (built on first access)
pub fn get_registry() -> &'static Registry {
    REGISTRY.get_or_init(|| Registry {
        resources: resources::all().into_iter().map(|r| (r.type_name(), r)).collect(),
        data_sources: data_sources::all()
            .into_iter()
            .map(|d| (d.type_name(), d))
            .collect(),
    })
}

/// Get a resource implementation by type name
pub fn get_resource(type_name: &str) -> Option<&'static dyn Resource> {
    get_registry().resources.get(type_name).map(|r| r.as_ref())
}

/// Get a data source implementation by type name
pub fn get_data_source(type_name: &str) -> Option<&'static dyn DataSource> {
    get_registry().data_sources.get(type_name).map(|d| d.as_ref())
}

/// Registered resource type names, sorted
pub fn resource_type_names() -> Vec<&'static str> {
    get_registry().resources.keys().copied().collect()
}

/// Registered data source type names, sorted
pub fn data_source_type_names() -> Vec<&'static str> {
    get_registry().data_sources.keys().copied().collect()
}
