//! `xbe view <resource> list|show`

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;

use super::args::{ListArgs, ViewAction};
use super::OutputOptions;
use crate::api::{member_path, ApiClient};
use crate::jsonapi::{build_index, parse_collection, parse_single, render_sparse_with};
use crate::output;
use crate::resource::{rows, ResourceDef};

pub async fn run<W: Write>(
    client: &ApiClient,
    def: &ResourceDef,
    action: ViewAction,
    options: &OutputOptions,
    out: &mut W,
) -> Result<()> {
    match action {
        ViewAction::List(args) => list(client, def, &args, options, out).await,
        ViewAction::Show { id } => show(client, def, &id, options, out).await,
    }
}

/// `fields[...]`/`include` parameters: the caller's selection when given,
/// else the definition's defaults
pub fn fieldset_query(def: &ResourceDef, options: &OutputOptions) -> Vec<(String, String)> {
    if options.selection.is_requested() {
        options.selection.query(&def.ty)
    } else {
        def.default_query()
    }
}

/// Query parameters for a list request
pub fn list_query(
    def: &ResourceDef,
    args: &ListArgs,
    options: &OutputOptions,
) -> Vec<(String, String)> {
    let mut query = fieldset_query(def, options);

    if args.limit > 0 {
        query.push(("page[limit]".to_string(), args.limit.to_string()));
    }
    if args.offset > 0 {
        query.push(("page[offset]".to_string(), args.offset.to_string()));
    }
    if let Some(sort) = args.sort.as_ref().or(def.default_sort.as_ref()) {
        query.push(("sort".to_string(), sort.clone()));
    }
    for (key, value) in &args.filters {
        query.push((format!("filter[{}]", key), value.clone()));
    }

    query
}

pub async fn list<W: Write>(
    client: &ApiClient,
    def: &ResourceDef,
    args: &ListArgs,
    options: &OutputOptions,
    out: &mut W,
) -> Result<()> {
    let query = list_query(def, args, options);
    let response = client.get(&def.path, &query).await?;
    let doc = parse_collection(&response.body)
        .with_context(|| format!("Failed to decode {} response", def.display_name))?;

    let pagination = doc.pagination();
    tracing::debug!(
        "Fetched {} {} (total: {:?})",
        doc.data.len(),
        def.ty,
        pagination.total_count
    );

    if options.selection.is_requested() {
        let rendered = render_sparse_with(
            &doc,
            &options.selection,
            options.null_mode,
            rows::sparse_attribute,
        );
        if options.json {
            output::write_json(out, &rendered.to_json(), options.omit_null())?;
        } else if rendered.records.is_empty() {
            writeln!(out, "No {} found.", def.display_name.to_lowercase())?;
        } else {
            let columns: Vec<output::Column> =
                rendered.headers().into_iter().map(output::Column::new).collect();
            output::render_table(&columns, &rendered.table_rows(), out)?;
        }
        return Ok(());
    }

    let index = build_index(&doc.included);

    if options.json {
        let records: Vec<Value> = doc
            .data
            .iter()
            .map(|resource| rows::row_json(&def.columns, resource, &index))
            .collect();
        output::write_json(out, &Value::Array(records), options.omit_null())?;
        return Ok(());
    }

    if doc.data.is_empty() {
        writeln!(out, "No {} found.", def.display_name.to_lowercase())?;
        return Ok(());
    }

    let columns = rows::list_columns(def);
    let table = rows::list_rows(def, &doc.data, &index);
    output::render_table(&columns, &table, out)?;
    Ok(())
}

pub async fn show<W: Write>(
    client: &ApiClient,
    def: &ResourceDef,
    id: &str,
    options: &OutputOptions,
    out: &mut W,
) -> Result<()> {
    let query = fieldset_query(def, options);
    let response = client.get(&member_path(&def.path, id), &query).await?;
    let doc = parse_single(&response.body)
        .with_context(|| format!("Failed to decode {} response", def.singular))?;

    let Some(resource) = doc.data.as_ref() else {
        anyhow::bail!("{} {} not found", def.singular, id);
    };

    if options.selection.is_requested() {
        let rendered = render_sparse_with(
            &doc,
            &options.selection,
            options.null_mode,
            rows::sparse_attribute,
        );
        let Some(record) = rendered.records.first() else {
            return Ok(());
        };
        if options.json {
            output::write_json(out, &record.to_json(), options.omit_null())?;
        } else {
            let mut pairs = vec![("ID".to_string(), record.id.clone())];
            pairs.extend(
                record
                    .fields
                    .iter()
                    .map(|field| (field.name.clone(), field.display.clone())),
            );
            output::render_details(&pairs, out)?;
        }
        return Ok(());
    }

    let index = build_index(&doc.included);

    if options.json {
        let record = rows::row_json(def.detail_columns(), resource, &index);
        output::write_json(out, &record, options.omit_null())?;
    } else {
        output::render_details(&rows::detail_pairs(def, resource, &index), out)?;
    }
    Ok(())
}
