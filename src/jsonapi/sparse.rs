//! Sparse Fieldset Renderer
//!
//! Renders exactly the fields and includes the caller asked for, in the
//! order asked, straight from the parsed document. Attribute values go
//! through an [`AttributeCoercion`]; callers that know the resource's column
//! kinds pass the same coercion their typed rows use.

use super::attrs::{self, Attributes};
use super::document::{Document, PrimaryData, Resource};
use super::index::{build_index, ResourceIndex, DEFAULT_LABEL_ATTRIBUTES};
use super::relationship::{Relationship, ResourceIdentifier};
use serde_json::{Map, Value};

/// How requested fields with no value are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NullMode {
    /// Absent fields are omitted; explicit nulls are kept
    #[default]
    Default,
    /// Absent fields and explicit nulls are both omitted
    Omit,
    /// Absent fields are rendered as null
    Show,
}

/// Fields and includes requested by the caller
///
/// `--fields` takes `field,field` for the primary type, optionally followed
/// by `;type:field,field` segments for related types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    pub primary: Vec<String>,
    pub related: Vec<(String, Vec<String>)>,
    pub include: Vec<String>,
}

fn split_list(value: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in value.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        if !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}

impl FieldSelection {
    pub fn parse(fields: Option<&str>, include: Option<&str>) -> Self {
        let mut selection = Self {
            include: include.map(split_list).unwrap_or_default(),
            ..Self::default()
        };

        for segment in fields.unwrap_or_default().split(';') {
            match segment.split_once(':') {
                Some((ty, list)) if !ty.trim().is_empty() => {
                    selection.related.push((ty.trim().to_string(), split_list(list)));
                }
                _ => {
                    for field in split_list(segment) {
                        if !selection.primary.contains(&field) {
                            selection.primary.push(field);
                        }
                    }
                }
            }
        }

        selection
    }

    pub fn is_requested(&self) -> bool {
        !self.primary.is_empty() || !self.related.is_empty() || !self.include.is_empty()
    }

    /// Whether `name` is the first segment of a requested include path
    pub fn includes(&self, name: &str) -> bool {
        self.include
            .iter()
            .any(|path| path.split('.').next() == Some(name))
    }

    fn include_roots(&self) -> Vec<String> {
        let mut roots: Vec<String> = Vec::new();
        for path in &self.include {
            let root = path.split('.').next().unwrap_or_default();
            if !root.is_empty() && !roots.iter().any(|r| r == root) {
                roots.push(root.to_string());
            }
        }
        roots
    }

    /// Columns in render order: requested fields, then included
    /// relationships not already requested
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .primary
            .iter()
            .filter(|field| field.as_str() != "id")
            .cloned()
            .collect();
        for root in self.include_roots() {
            if !columns.contains(&root) {
                columns.push(root);
            }
        }
        columns
    }

    /// `fields[...]` and `include` query parameters. Included relationships
    /// are added to the primary fieldset so their linkage is returned.
    pub fn query(&self, primary_type: &str) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if !self.primary.is_empty() {
            query.push((format!("fields[{}]", primary_type), self.columns().join(",")));
        }
        for (ty, fields) in &self.related {
            if !fields.is_empty() {
                query.push((format!("fields[{}]", ty), fields.join(",")));
            }
        }
        if !self.include.is_empty() {
            query.push(("include".to_string(), self.include.join(",")));
        }
        query
    }
}

/// One rendered field
#[derive(Debug, Clone, PartialEq)]
pub struct SparseField {
    pub name: String,
    pub value: Value,
    pub display: String,
}

/// One rendered resource
#[derive(Debug, Clone, PartialEq)]
pub struct SparseRecord {
    pub id: String,
    pub ty: String,
    pub fields: Vec<SparseField>,
}

impl SparseRecord {
    pub fn get(&self, name: &str) -> Option<&SparseField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// `{"id", "type", field...}` in render order
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        map.insert("type".to_string(), Value::String(self.ty.clone()));
        for field in &self.fields {
            map.insert(field.name.clone(), field.value.clone());
        }
        Value::Object(map)
    }
}

/// Rendered document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseOutput {
    pub columns: Vec<String>,
    pub records: Vec<SparseRecord>,
}

impl SparseOutput {
    pub fn to_json(&self) -> Value {
        Value::Array(self.records.iter().map(SparseRecord::to_json).collect())
    }

    pub fn headers(&self) -> Vec<String> {
        std::iter::once("ID".to_string())
            .chain(self.columns.iter().map(|column| column.to_uppercase()))
            .collect()
    }

    /// Rectangular rows matching [`SparseOutput::headers`]; omitted fields
    /// render as empty cells
    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                std::iter::once(record.id.clone())
                    .chain(self.columns.iter().map(|column| {
                        record
                            .get(column)
                            .map(|field| field.display.clone())
                            .unwrap_or_default()
                    }))
                    .collect()
            })
            .collect()
    }
}

/// Turns one attribute into its rendered value and display text, or `None`
/// when the resource has no such attribute
pub type AttributeCoercion = fn(&Resource, &str) -> Option<(Value, String)>;

/// The attribute as received, displayed through [`attrs::display_value`]
pub fn raw_attribute(resource: &Resource, name: &str) -> Option<(Value, String)> {
    resource
        .attributes
        .get(name)
        .map(|value| (value.clone(), attrs::display_value(value)))
}

/// Render the primary data of `document` using only the requested fields.
///
/// With no fields requested, every attribute key is rendered in the order
/// it first appears across the primary resources.
pub fn render_sparse<D: PrimaryData>(
    document: &Document<D>,
    selection: &FieldSelection,
    mode: NullMode,
) -> SparseOutput {
    render_sparse_with(document, selection, mode, raw_attribute)
}

/// [`render_sparse`] with attribute values coerced by `coerce`
pub fn render_sparse_with<D: PrimaryData>(
    document: &Document<D>,
    selection: &FieldSelection,
    mode: NullMode,
    coerce: AttributeCoercion,
) -> SparseOutput {
    let index = build_index(&document.included);
    let resources = document.primary();

    let mut columns = selection.columns();
    if selection.primary.is_empty() {
        let mut attribute_columns: Vec<String> = Vec::new();
        for resource in resources {
            for key in resource.attributes.keys() {
                if !attribute_columns.contains(key) && !columns.contains(key) {
                    attribute_columns.push(key.clone());
                }
            }
        }
        attribute_columns.append(&mut columns);
        columns = attribute_columns;
    }

    let records = resources
        .iter()
        .map(|resource| render_record(resource, &columns, selection, &index, mode, coerce))
        .collect();

    SparseOutput { columns, records }
}

fn render_record(
    resource: &Resource,
    columns: &[String],
    selection: &FieldSelection,
    index: &ResourceIndex<'_>,
    mode: NullMode,
    coerce: AttributeCoercion,
) -> SparseRecord {
    let mut fields = Vec::with_capacity(columns.len());

    for column in columns {
        let linked = resource
            .relationship(column)
            .filter(|relationship| relationship.has_linkage());
        let rendered = if let Some(attribute) = coerce(resource, column) {
            Some(attribute)
        } else if let Some(relationship) = linked {
            Some(render_relationship(relationship, index, selection.includes(column)))
        } else if mode == NullMode::Show {
            Some((Value::Null, String::new()))
        } else {
            None
        };

        let Some((value, display)) = rendered else {
            continue;
        };
        if value.is_null() && mode == NullMode::Omit {
            continue;
        }
        fields.push(SparseField {
            name: column.clone(),
            value,
            display,
        });
    }

    SparseRecord {
        id: resource.id.clone(),
        ty: resource.ty.clone(),
        fields,
    }
}

fn render_relationship(
    relationship: &Relationship,
    index: &ResourceIndex<'_>,
    expand: bool,
) -> (Value, String) {
    if relationship.is_to_many() {
        let targets = relationship.targets();
        let value = Value::Array(
            targets
                .iter()
                .map(|target| reference_value(target, index, expand))
                .collect(),
        );
        let display = targets
            .iter()
            .map(|target| reference_display(target, index, expand))
            .collect::<Vec<_>>()
            .join(", ");
        return (value, display);
    }

    match relationship.target() {
        Some(target) => (
            reference_value(target, index, expand),
            reference_display(target, index, expand),
        ),
        None => (Value::Null, String::new()),
    }
}

fn reference_value(target: &ResourceIdentifier, index: &ResourceIndex<'_>, expand: bool) -> Value {
    if !expand {
        return Value::String(target.id.clone());
    }
    let mut map = Map::new();
    map.insert("id".to_string(), Value::String(target.id.clone()));
    map.insert("type".to_string(), Value::String(target.ty.clone()));
    if let Some(attributes) = index.resolve(target) {
        merge_attributes(&mut map, attributes);
    }
    Value::Object(map)
}

fn merge_attributes(map: &mut Map<String, Value>, attributes: &Attributes) {
    for (key, value) in attributes {
        if key != "id" && key != "type" {
            map.insert(key.clone(), value.clone());
        }
    }
}

fn reference_display(target: &ResourceIdentifier, index: &ResourceIndex<'_>, expand: bool) -> String {
    if !expand {
        return target.id.clone();
    }
    attrs::format_related(&index.label(target, DEFAULT_LABEL_ATTRIBUTES), &target.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonapi::document::{parse_collection, parse_single};
    use serde_json::json;

    fn widgets() -> Vec<u8> {
        json!({
            "data": [
                {
                    "id": "1",
                    "type": "widgets",
                    "attributes": {"name": "Foo", "weight": 2.5, "active": true, "note": null},
                    "relationships": {
                        "owner": {"data": {"type": "users", "id": "9"}},
                        "tags": {"data": [{"type": "tags", "id": "t1"}, {"type": "tags", "id": "t2"}]}
                    }
                },
                {
                    "id": "2",
                    "type": "widgets",
                    "attributes": {"name": "Bar"},
                    "relationships": {"owner": {"data": null}}
                }
            ],
            "included": [
                {"id": "9", "type": "users", "attributes": {"name": "Alice", "email": "a@example.com"}}
            ]
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn test_selection_parse() {
        let selection = FieldSelection::parse(
            Some("name, status,name;users:name,email"),
            Some("owner,owner.company,tags"),
        );
        assert_eq!(selection.primary, vec!["name", "status"]);
        assert_eq!(
            selection.related,
            vec![("users".to_string(), vec!["name".to_string(), "email".to_string()])]
        );
        assert!(selection.includes("owner"));
        assert!(selection.includes("tags"));
        assert!(!selection.includes("company"));
        assert_eq!(selection.columns(), vec!["name", "status", "owner", "tags"]);
        assert!(selection.is_requested());
        assert!(!FieldSelection::parse(None, None).is_requested());
    }

    #[test]
    fn test_selection_query() {
        let selection = FieldSelection::parse(Some("name;users:name"), Some("owner"));
        assert_eq!(
            selection.query("widgets"),
            vec![
                ("fields[widgets]".to_string(), "name,owner".to_string()),
                ("fields[users]".to_string(), "name".to_string()),
                ("include".to_string(), "owner".to_string()),
            ]
        );
    }

    #[test]
    fn test_fields_render_in_requested_order() {
        let doc = parse_collection(&widgets()).unwrap();
        let selection = FieldSelection::parse(Some("weight,name,active"), None);
        let output = render_sparse(&doc, &selection, NullMode::Default);

        let names: Vec<&str> = output.records[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["weight", "name", "active"]);
        assert_eq!(output.headers(), vec!["ID", "WEIGHT", "NAME", "ACTIVE"]);
        assert_eq!(output.table_rows()[0], vec!["1", "2.5", "Foo", "yes"]);
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let doc = parse_collection(&widgets()).unwrap();
        let selection = FieldSelection::parse(Some("name,weight"), None);
        let output = render_sparse(&doc, &selection, NullMode::Default);

        assert!(output.records[1].get("weight").is_none());
        assert_eq!(output.records[1].to_json(), json!({"id": "2", "type": "widgets", "name": "Bar"}));
        assert_eq!(output.table_rows()[1], vec!["2", "Bar", ""]);
    }

    #[test]
    fn test_null_modes() {
        let doc = parse_collection(&widgets()).unwrap();
        let selection = FieldSelection::parse(Some("note,weight"), None);

        let default = render_sparse(&doc, &selection, NullMode::Default);
        assert_eq!(default.records[0].get("note").map(|f| &f.value), Some(&Value::Null));
        assert!(default.records[1].get("weight").is_none());

        let omit = render_sparse(&doc, &selection, NullMode::Omit);
        assert!(omit.records[0].get("note").is_none());

        let show = render_sparse(&doc, &selection, NullMode::Show);
        assert_eq!(show.records[1].to_json(), json!({"id": "2", "type": "widgets", "note": null, "weight": null}));
    }

    #[test]
    fn test_relationships_without_include_render_ids() {
        let doc = parse_collection(&widgets()).unwrap();
        let selection = FieldSelection::parse(Some("owner,tags"), None);
        let output = render_sparse(&doc, &selection, NullMode::Default);

        assert_eq!(output.records[0].get("owner").unwrap().value, json!("9"));
        assert_eq!(output.records[0].get("tags").unwrap().value, json!(["t1", "t2"]));
        assert_eq!(output.records[0].get("tags").unwrap().display, "t1, t2");
        assert_eq!(output.records[1].get("owner").unwrap().value, Value::Null);
    }

    #[test]
    fn test_included_relationships_are_expanded() {
        let doc = parse_collection(&widgets()).unwrap();
        let selection = FieldSelection::parse(Some("name"), Some("owner"));
        let output = render_sparse(&doc, &selection, NullMode::Default);

        let owner = output.records[0].get("owner").unwrap();
        assert_eq!(
            owner.value,
            json!({"id": "9", "type": "users", "name": "Alice", "email": "a@example.com"})
        );
        assert_eq!(owner.display, "Alice (9)");
        assert_eq!(output.columns, vec!["name", "owner"]);
    }

    #[test]
    fn test_unresolved_include_falls_back_to_reference() {
        let body = json!({
            "data": {
                "id": "1",
                "type": "widgets",
                "relationships": {"owner": {"data": {"type": "users", "id": "9"}}}
            }
        })
        .to_string();
        let doc = parse_single(body.as_bytes()).unwrap();
        let selection = FieldSelection::parse(None, Some("owner"));
        let output = render_sparse(&doc, &selection, NullMode::Default);

        let owner = output.records[0].get("owner").unwrap();
        assert_eq!(owner.value, json!({"id": "9", "type": "users"}));
        assert_eq!(owner.display, "9");
    }

    #[test]
    fn test_no_fields_renders_all_attributes() {
        let doc = parse_collection(&widgets()).unwrap();
        let output = render_sparse(&doc, &FieldSelection::default(), NullMode::Default);
        assert_eq!(output.columns, vec!["name", "weight", "active", "note"]);
    }

    #[test]
    fn test_links_only_relationship_is_absent() {
        let body = json!({
            "data": {
                "id": "1",
                "type": "widgets",
                "attributes": {"name": "Foo"},
                "relationships": {"owner": {"links": {"related": "/v1/widgets/1/owner"}}}
            }
        })
        .to_string();
        let doc = parse_single(body.as_bytes()).unwrap();
        let selection = FieldSelection::parse(Some("name,owner"), None);

        let default = render_sparse(&doc, &selection, NullMode::Default);
        assert!(default.records[0].get("owner").is_none());

        let show = render_sparse(&doc, &selection, NullMode::Show);
        assert_eq!(show.records[0].get("owner").unwrap().value, Value::Null);
    }

    #[test]
    fn test_numeric_linkage_id_renders_reference() {
        let body = json!({
            "data": {
                "id": "1",
                "type": "widgets",
                "relationships": {"owner": {"data": {"type": "users", "id": 9}}}
            },
            "included": [{"id": 9, "type": "users", "attributes": {"name": "Alice"}}]
        })
        .to_string();
        let doc = parse_single(body.as_bytes()).unwrap();
        let selection = FieldSelection::parse(Some("owner"), Some("owner"));
        let output = render_sparse(&doc, &selection, NullMode::Default);

        let owner = output.records[0].get("owner").unwrap();
        assert_eq!(owner.value, json!({"id": "9", "type": "users", "name": "Alice"}));
        assert_eq!(owner.display, "Alice (9)");
    }

    #[test]
    fn test_custom_coercion_applies_to_attributes() {
        fn shouting(resource: &Resource, name: &str) -> Option<(Value, String)> {
            let text = resource.attributes.get(name)?.as_str()?.to_uppercase();
            Some((Value::String(text.clone()), text))
        }

        let doc = parse_collection(&widgets()).unwrap();
        let selection = FieldSelection::parse(Some("name"), None);
        let output = render_sparse_with(&doc, &selection, NullMode::Default, shouting);
        assert_eq!(output.records[0].get("name").unwrap().display, "FOO");
        assert_eq!(output.records[1].get("name").unwrap().value, json!("BAR"));
    }

    #[test]
    fn test_sparse_and_typed_values_agree() {
        let doc = parse_collection(&widgets()).unwrap();
        let selection = FieldSelection::parse(Some("weight,active"), None);
        let output = render_sparse(&doc, &selection, NullMode::Default);
        let attributes = &doc.data[0].attributes;

        assert_eq!(
            output.records[0].get("weight").unwrap().display,
            attrs::number_attr_as_string(attributes, "weight")
        );
        assert_eq!(
            output.records[0].get("active").unwrap().display,
            attrs::format_bool(attrs::bool_attr(attributes, "active"))
        );
    }
}
