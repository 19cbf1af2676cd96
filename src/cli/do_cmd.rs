//! `xbe do <resource> create|update|delete`

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::io::Write;

use super::args::{DoAction, WriteArgs};
use super::view::fieldset_query;
use super::OutputOptions;
use crate::api::{member_path, ApiClient};
use crate::jsonapi::{
    attrs, build_index, parse_single, Relationship, ResourceIdentifier, SingleDocument,
    DEFAULT_LABEL_ATTRIBUTES,
};
use crate::output;
use crate::resource::{rows, ResourceDef};

pub async fn run<W: Write>(
    client: &ApiClient,
    def: &ResourceDef,
    action: DoAction,
    options: &OutputOptions,
    out: &mut W,
) -> Result<()> {
    match action {
        DoAction::Create(changes) => create(client, def, &changes, options, out).await,
        DoAction::Update { id, changes } => update(client, def, &id, &changes, options, out).await,
        DoAction::Delete { id, confirm } => delete(client, def, &id, confirm, options, out).await,
    }
}

/// `--attr` value: JSON when it parses as JSON, else a plain string
pub fn attribute_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// `--rel` value: one `type:id` is to-one linkage, several are to-many,
/// an empty value clears the relationship
pub fn relationship_data(name: &str, raw: &str) -> Result<Value> {
    let refs: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut targets = refs
        .iter()
        .map(|r| {
            ResourceIdentifier::parse_ref(r)
                .with_context(|| format!("Invalid --rel {}={}: expected type:id", name, raw))
        })
        .collect::<Result<Vec<_>>>()?;

    let relationship = if targets.len() > 1 {
        Relationship::to_many(targets)
    } else {
        Relationship::to_one(targets.pop())
    };
    Ok(relationship.data_value())
}

/// Build a JSON:API request document
pub fn request_document(ty: &str, id: Option<&str>, changes: &WriteArgs) -> Result<Value> {
    let mut data = Map::new();
    if let Some(id) = id {
        data.insert("id".to_string(), Value::String(id.to_string()));
    }
    data.insert("type".to_string(), Value::String(ty.to_string()));

    let attributes: Map<String, Value> = changes
        .attrs
        .iter()
        .map(|(key, value)| (key.clone(), attribute_value(value)))
        .collect();
    data.insert("attributes".to_string(), Value::Object(attributes));

    if !changes.rels.is_empty() {
        let mut relationships = Map::new();
        for (name, raw) in &changes.rels {
            relationships.insert(name.clone(), json!({ "data": relationship_data(name, raw)? }));
        }
        data.insert("relationships".to_string(), Value::Object(relationships));
    }

    Ok(json!({ "data": data }))
}

fn write_result<W: Write>(
    verb: &str,
    def: &ResourceDef,
    doc: Option<&SingleDocument>,
    fallback_id: &str,
    options: &OutputOptions,
    out: &mut W,
) -> Result<()> {
    let resource = doc.and_then(|d| d.data.as_ref());
    let id = resource.map_or(fallback_id, |r| r.id.as_str());

    if options.json {
        let value = match (doc, resource) {
            (Some(doc), Some(resource)) => {
                rows::row_json(def.detail_columns(), resource, &build_index(&doc.included))
            }
            _ => json!({ "id": id }),
        };
        output::write_json(out, &value, options.omit_null())?;
        return Ok(());
    }

    let name = resource
        .map(|r| {
            DEFAULT_LABEL_ATTRIBUTES
                .iter()
                .map(|key| attrs::string_attr(&r.attributes, key))
                .find(|value| !value.trim().is_empty())
                .unwrap_or_default()
        })
        .unwrap_or_default();

    if name.is_empty() {
        writeln!(out, "{} {} {}", verb, def.singular, id)?;
    } else {
        writeln!(out, "{} {} {} ({})", verb, def.singular, id, name)?;
    }
    Ok(())
}

fn parse_optional(body: &[u8]) -> Result<Option<SingleDocument>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(parse_single(body)?))
}

pub async fn create<W: Write>(
    client: &ApiClient,
    def: &ResourceDef,
    changes: &WriteArgs,
    options: &OutputOptions,
    out: &mut W,
) -> Result<()> {
    let body = request_document(&def.ty, None, changes)?;
    let response = client.post(&def.path, &body).await?;
    let doc = parse_optional(&response.body)
        .with_context(|| format!("Failed to decode created {}", def.singular))?;

    write_result("Created", def, doc.as_ref(), "", options, out)
}

pub async fn update<W: Write>(
    client: &ApiClient,
    def: &ResourceDef,
    id: &str,
    changes: &WriteArgs,
    options: &OutputOptions,
    out: &mut W,
) -> Result<()> {
    if changes.is_empty() {
        anyhow::bail!("at least one --attr or --rel is required");
    }

    let body = request_document(&def.ty, Some(id), changes)?;
    let response = client.patch(&member_path(&def.path, id), &body).await?;
    let doc = parse_optional(&response.body)
        .with_context(|| format!("Failed to decode updated {}", def.singular))?;

    write_result("Updated", def, doc.as_ref(), id, options, out)
}

/// Look the resource up, show it, and delete it only when confirmed
pub async fn delete<W: Write>(
    client: &ApiClient,
    def: &ResourceDef,
    id: &str,
    confirm: bool,
    options: &OutputOptions,
    out: &mut W,
) -> Result<()> {
    let path = member_path(&def.path, id);

    let lookup = client
        .get(&path, &fieldset_query(def, options))
        .await
        .with_context(|| format!("Failed to look up {} {}", def.singular, id))?;
    let doc = parse_single(&lookup.body)
        .with_context(|| format!("Failed to decode {} response", def.singular))?;
    let Some(resource) = doc.data.as_ref() else {
        anyhow::bail!("{} {} not found", def.singular, id);
    };

    if !confirm {
        let index = build_index(&doc.included);
        if options.json {
            let mut record = rows::row_json(def.detail_columns(), resource, &index);
            if let Value::Object(map) = &mut record {
                map.insert("deleted".to_string(), Value::Bool(false));
            }
            output::write_json(out, &record, options.omit_null())?;
        } else {
            output::render_details(&rows::detail_pairs(def, resource, &index), out)?;
            writeln!(out)?;
            writeln!(out, "Re-run with --confirm to delete {} {}.", def.singular, id)?;
        }
        return Ok(());
    }

    client.delete(&path).await?;
    tracing::info!("Deleted {} {}", def.ty, id);

    if options.json {
        output::write_json(out, &json!({ "id": id, "deleted": true }), false)?;
    } else {
        writeln!(out, "Deleted {} {}", def.singular, id)?;
    }
    Ok(())
}
