//! Resource Index / Relationship Resolver
//!
//! Built once per document over `included`, read-only afterwards. All
//! lookups are in-memory; an unresolved reference is `None`, never an error.

use super::attrs::{self, Attributes};
use super::document::Resource;
use super::relationship::ResourceIdentifier;
use std::collections::HashMap;

/// Attributes tried, in order, when labelling a related resource
pub const DEFAULT_LABEL_ATTRIBUTES: &[&str] = &[
    "name",
    "company-name",
    "title",
    "display-name",
    "full-name",
    "email-address",
];

/// Composite `(type, id)` lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKey<'a> {
    pub ty: &'a str,
    pub id: &'a str,
}

impl<'a> ResourceKey<'a> {
    pub fn new(ty: &'a str, id: &'a str) -> Self {
        Self { ty, id }
    }
}

impl<'a> From<&'a ResourceIdentifier> for ResourceKey<'a> {
    fn from(identifier: &'a ResourceIdentifier) -> Self {
        Self::new(&identifier.ty, &identifier.id)
    }
}

/// Lookup over sideloaded resources
#[derive(Debug, Clone, Default)]
pub struct ResourceIndex<'a> {
    entries: HashMap<ResourceKey<'a>, &'a Resource>,
}

/// Index `included` by `(type, id)`. A later duplicate replaces an earlier one.
pub fn build_index(included: &[Resource]) -> ResourceIndex<'_> {
    let mut entries = HashMap::with_capacity(included.len());
    for resource in included {
        entries.insert(ResourceKey::new(&resource.ty, &resource.id), resource);
    }
    ResourceIndex { entries }
}

impl<'a> ResourceIndex<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: ResourceKey<'_>) -> Option<&'a Resource> {
        self.entries.get(&key).copied()
    }

    /// Attributes of the referenced resource, if it was sideloaded
    pub fn resolve(&self, reference: &ResourceIdentifier) -> Option<&'a Attributes> {
        self.get(reference.into()).map(|resource| &resource.attributes)
    }

    /// The sideloaded resource behind a to-one relationship
    pub fn related_one(&self, resource: &Resource, name: &str) -> Option<&'a Resource> {
        self.get(resource.relationship_to_one(name)?.into())
    }

    /// Sideloaded resources behind a relationship, in linkage order.
    /// References that were not sideloaded are skipped.
    pub fn related_many(&self, resource: &Resource, name: &str) -> Vec<&'a Resource> {
        resource
            .relationship_to_many(name)
            .iter()
            .filter_map(|reference| self.get(reference.into()))
            .collect()
    }

    /// Display label for a reference: the first non-empty string among
    /// `label_attrs` on the sideloaded resource, or `""` when unresolved.
    pub fn label(&self, reference: &ResourceIdentifier, label_attrs: &[&str]) -> String {
        self.resolve(reference)
            .and_then(|attributes| {
                label_attrs
                    .iter()
                    .map(|key| attrs::string_attr(attributes, key))
                    .find(|value| !value.trim().is_empty())
            })
            .unwrap_or_default()
    }
}
