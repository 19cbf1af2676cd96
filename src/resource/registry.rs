//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads all resource definitions from embedded JSON files
//! and provides lookup functions for the rest of the application.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("definitions/planning.json"),
    include_str!("definitions/organizations.json"),
    include_str!("definitions/materials.json"),
];

/// How an attribute value is coerced for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    String,
    Bool,
    Int,
    Float,
    Number,
    Date,
    Datetime,
    Time,
    List,
}

/// Where a column reads its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource<'a> {
    Attribute { name: &'a str, kind: ValueKind },
    Relationship { name: &'a str, label: Option<&'a str> },
}

/// Column definition from JSON
///
/// Exactly one of `attr` and `rel` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    #[serde(default)]
    pub attr: Option<String>,
    #[serde(default)]
    pub kind: ValueKind,
    #[serde(default)]
    pub rel: Option<String>,
    /// Attribute of the related resource used as its label
    #[serde(default)]
    pub label: Option<String>,
    /// Maximum table width in characters
    #[serde(default)]
    pub width: Option<usize>,
}

impl ColumnDef {
    pub fn source(&self) -> ColumnSource<'_> {
        match (&self.rel, &self.attr) {
            (Some(rel), _) => ColumnSource::Relationship {
                name: rel,
                label: self.label.as_deref(),
            },
            (None, Some(attr)) => ColumnSource::Attribute {
                name: attr,
                kind: self.kind,
            },
            (None, None) => ColumnSource::Attribute {
                name: &self.header,
                kind: self.kind,
            },
        }
    }

    /// snake_case key used for this column in JSON output
    pub fn json_key(&self) -> String {
        let name = match self.source() {
            ColumnSource::Attribute { name, .. } | ColumnSource::Relationship { name, .. } => name,
        };
        name.replace('-', "_")
    }
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// Singular noun used in confirmation messages
    pub singular: String,
    /// Collection path, e.g. `/v1/objectives`
    pub path: String,
    /// JSON:API type of the primary resources
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub include: Vec<String>,
    /// Sparse fieldsets sent on list and show, keyed by JSON:API type
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub default_sort: Option<String>,
    pub columns: Vec<ColumnDef>,
    /// Fields shown by `show`; falls back to `columns` when empty
    #[serde(default)]
    pub details: Vec<ColumnDef>,
}

impl ResourceDef {
    pub fn detail_columns(&self) -> &[ColumnDef] {
        if self.details.is_empty() {
            &self.columns
        } else {
            &self.details
        }
    }

    /// Default `fields[...]` and `include` query parameters
    pub fn default_query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .fields
            .iter()
            .filter(|(_, fields)| !fields.is_empty())
            .map(|(ty, fields)| (format!("fields[{}]", ty), fields.join(",")))
            .collect();
        if !self.include.is_empty() {
            query.push(("include".to_string(), self.include.join(",")));
        }
        query
    }
}

/// Root structure of definitions/*.json
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig::default();

        for content in RESOURCE_FILES {
            match serde_json::from_str::<ResourceConfig>(content) {
                Ok(partial) => final_config.resources.extend(partial.resources),
                Err(e) => tracing::error!("Failed to parse embedded resource JSON: {}", e),
            }
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get all resource keys, sorted
pub fn get_all_resource_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}

/// Get a resource definition by its JSON:API type
pub fn resource_for_type(ty: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.values().find(|def| def.ty == ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert!(
            !registry.resources.is_empty(),
            "Registry should have resources"
        );
    }

    #[test]
    fn test_every_embedded_file_parses() {
        for content in RESOURCE_FILES {
            let parsed: Result<ResourceConfig, _> = serde_json::from_str(content);
            assert!(parsed.is_ok(), "{:?}", parsed.err());
        }
    }

    #[test]
    fn test_objectives_resource_exists() {
        let resource = get_resource("objectives");
        assert!(resource.is_some(), "Objectives resource should exist");

        let resource = resource.unwrap();
        assert_eq!(resource.display_name, "Objectives");
        assert_eq!(resource.ty, "objectives");
        assert_eq!(resource.path, "/v1/objectives");
    }

    #[test]
    fn test_get_all_resource_keys_sorted() {
        let keys = get_all_resource_keys();
        assert!(keys.contains(&"objectives"), "Should contain objectives");
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_resource_for_type() {
        let def = resource_for_type("material-types").unwrap();
        assert_eq!(def.display_name, "Material Types");
        assert!(resource_for_type("unknown-things").is_none());
    }

    #[test]
    fn test_columns_name_exactly_one_source() {
        for (key, def) in &get_registry().resources {
            for column in def.columns.iter().chain(&def.details) {
                assert!(
                    column.attr.is_some() != column.rel.is_some(),
                    "{}: column {} must set exactly one of attr/rel",
                    key,
                    column.header
                );
            }
        }
    }

    #[test]
    fn test_default_query() {
        let def = get_resource("objectives").unwrap();
        let query = def.default_query();
        assert!(query.iter().any(|(k, v)| k == "include" && v.contains("owner")));
        assert!(query.iter().any(|(k, _)| k == "fields[objectives]"));
    }

    #[test]
    fn test_json_key() {
        let column: ColumnDef =
            serde_json::from_str(r#"{"header":"OWNER","rel":"sales-responsible-person"}"#).unwrap();
        assert_eq!(column.json_key(), "sales_responsible_person");
        assert_eq!(
            column.source(),
            ColumnSource::Relationship {
                name: "sales-responsible-person",
                label: None
            }
        );
    }
}
