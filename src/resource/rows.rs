//! Typed rows built from resource definitions
//!
//! Each column reads either an attribute (coerced per its [`ValueKind`]) or
//! a relationship resolved through the document's [`ResourceIndex`]. A
//! relationship whose target was not sideloaded falls back to the bare id.

use super::registry::{resource_for_type, ColumnDef, ColumnSource, ResourceDef, ValueKind};
use crate::jsonapi::{
    attrs, format, Resource, ResourceIdentifier, ResourceIndex, DEFAULT_LABEL_ATTRIBUTES,
};
use crate::output::Column;
use serde_json::{json, Map, Value};

fn label_for(
    index: &ResourceIndex<'_>,
    target: &ResourceIdentifier,
    label: Option<&str>,
) -> String {
    match label {
        Some(attr) => index
            .resolve(target)
            .map(|a| attrs::string_attr(a, attr).trim().to_string())
            .unwrap_or_default(),
        None => index.label(target, DEFAULT_LABEL_ATTRIBUTES).trim().to_string(),
    }
}

fn attribute_display(resource: &Resource, name: &str, kind: ValueKind) -> String {
    let attributes = &resource.attributes;
    if attrs::any_attr(attributes, name).is_none() {
        return String::new();
    }

    match kind {
        ValueKind::String => attrs::string_attr(attributes, name).trim().to_string(),
        ValueKind::Bool => attrs::format_bool(attrs::bool_attr(attributes, name)),
        ValueKind::Int => attrs::int_attr(attributes, name).to_string(),
        ValueKind::Float => attrs::format_float(attrs::float_attr(attributes, name)),
        ValueKind::Number => attrs::number_attr_as_string(attributes, name),
        ValueKind::Date => format::format_date(&attrs::string_attr(attributes, name)),
        ValueKind::Datetime => format::format_datetime(&attrs::string_attr(attributes, name)),
        ValueKind::Time => format::format_time(&attrs::string_attr(attributes, name)),
        ValueKind::List => attrs::string_slice_attr(attributes, name).join(", "),
    }
}

fn attribute_value(resource: &Resource, name: &str, kind: ValueKind) -> Value {
    let attributes = &resource.attributes;
    if attrs::any_attr(attributes, name).is_none() {
        return Value::Null;
    }

    match kind {
        ValueKind::Bool => Value::Bool(attrs::bool_attr(attributes, name)),
        ValueKind::Int => json!(attrs::int_attr(attributes, name)),
        ValueKind::Float => json!(attrs::float_attr(attributes, name)),
        ValueKind::List => json!(attrs::string_slice_attr(attributes, name)),
        _ => Value::String(attribute_display(resource, name, kind)),
    }
}

/// Attribute coercion for sparse rendering. Attributes declared as a
/// column of the resource's definition are coerced by that column's kind,
/// the same as typed rows; anything else is rendered as received.
pub fn sparse_attribute(resource: &Resource, name: &str) -> Option<(Value, String)> {
    let value = resource.attributes.get(name)?;
    if value.is_null() {
        return Some((Value::Null, String::new()));
    }

    let kind = resource_for_type(&resource.ty).and_then(|def| {
        def.columns
            .iter()
            .chain(&def.details)
            .find_map(|column| match column.source() {
                ColumnSource::Attribute { name: attr, kind } if attr == name => Some(kind),
                _ => None,
            })
    });

    Some(match kind {
        Some(kind) => (
            attribute_value(resource, name, kind),
            attribute_display(resource, name, kind),
        ),
        None => (value.clone(), attrs::display_value(value)),
    })
}

/// Table cell for one column. Relationships show the related label when
/// sideloaded, else the id.
pub fn column_display(
    resource: &Resource,
    column: &ColumnDef,
    index: &ResourceIndex<'_>,
) -> String {
    match column.source() {
        ColumnSource::Attribute { name, kind } => attribute_display(resource, name, kind),
        ColumnSource::Relationship { name, label } => resource
            .relationship_to_many(name)
            .iter()
            .map(|target| {
                let text = label_for(index, target, label);
                if text.is_empty() {
                    target.id.clone()
                } else {
                    text
                }
            })
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Detail value for one field: relationships render as `label (id)`
pub fn detail_display(
    resource: &Resource,
    column: &ColumnDef,
    index: &ResourceIndex<'_>,
) -> String {
    match column.source() {
        ColumnSource::Attribute { name, kind } => attribute_display(resource, name, kind),
        ColumnSource::Relationship { name, label } => resource
            .relationship_to_many(name)
            .iter()
            .map(|target| attrs::format_related(&label_for(index, target, label), &target.id))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn insert_column(
    record: &mut Map<String, Value>,
    resource: &Resource,
    column: &ColumnDef,
    index: &ResourceIndex<'_>,
) {
    let key = column.json_key();
    match column.source() {
        ColumnSource::Attribute { name, kind } => {
            record.insert(key, attribute_value(resource, name, kind));
        }
        ColumnSource::Relationship { name, label } => {
            let targets = resource.relationship_to_many(name);
            let labels: Vec<String> = targets
                .iter()
                .map(|target| label_for(index, target, label))
                .collect();

            let relationship = resource.relationship(name);
            if relationship.is_some_and(|r| r.is_to_many()) {
                let ids: Vec<&str> = targets.iter().map(|t| t.id.as_str()).collect();
                record.insert(format!("{}_ids", key), json!(ids));
                record.insert(format!("{}_names", key), json!(labels));
            } else {
                let target = targets.first();
                record.insert(
                    format!("{}_id", key),
                    target.map_or(Value::Null, |t| Value::String(t.id.clone())),
                );
                record.insert(
                    format!("{}_type", key),
                    target.map_or(Value::Null, |t| Value::String(t.ty.clone())),
                );
                let name_value = labels
                    .into_iter()
                    .next()
                    .filter(|l| !l.is_empty())
                    .map_or(Value::Null, Value::String);
                record.insert(format!("{}_name", key), name_value);
            }
        }
    }
}

/// JSON record for one resource: `id` followed by every column
pub fn row_json(columns: &[ColumnDef], resource: &Resource, index: &ResourceIndex<'_>) -> Value {
    let mut record = Map::new();
    record.insert("id".to_string(), Value::String(resource.id.clone()));
    for column in columns {
        insert_column(&mut record, resource, column, index);
    }
    Value::Object(record)
}

/// Table headers for a list view
pub fn list_columns(def: &ResourceDef) -> Vec<Column> {
    std::iter::once(Column::new("ID"))
        .chain(def.columns.iter().map(|column| {
            let header = Column::new(column.header.clone());
            match column.width {
                Some(width) => header.with_max_width(width),
                None => header,
            }
        }))
        .collect()
}

/// Table rows for a list view, one per resource
pub fn list_rows(
    def: &ResourceDef,
    resources: &[Resource],
    index: &ResourceIndex<'_>,
) -> Vec<Vec<String>> {
    resources
        .iter()
        .map(|resource| {
            std::iter::once(resource.id.clone())
                .chain(
                    def.columns
                        .iter()
                        .map(|column| column_display(resource, column, index)),
                )
                .collect()
        })
        .collect()
}

/// `Label: value` pairs for a show view
pub fn detail_pairs(
    def: &ResourceDef,
    resource: &Resource,
    index: &ResourceIndex<'_>,
) -> Vec<(String, String)> {
    std::iter::once(("ID".to_string(), resource.id.clone()))
        .chain(def.detail_columns().iter().map(|column| {
            (column.header.clone(), detail_display(resource, column, index))
        }))
        .collect()
}
