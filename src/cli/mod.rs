//! Command tree
//!
//! Every command resolves the base URL and token the same way, builds an
//! [`ApiClient`], and renders through either the typed row path
//! ([`crate::resource::rows`]) or, when `--fields`/`--include` are given,
//! the sparse fieldset renderer.

pub mod args;
pub mod auth;
pub mod do_cmd;
pub mod view;

use anyhow::{Context, Result};
use std::io::Write;

use crate::api::{auth::resolve_token, ApiClient};
use crate::config::Config;
use crate::jsonapi::{FieldSelection, NullMode};
use crate::output::{self, Column};
use crate::resource::{self, ResourceDef};
pub use args::{Cli, Command, GlobalArgs};

/// Rendering options shared by every command
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub null_mode: NullMode,
    pub selection: FieldSelection,
}

impl OutputOptions {
    pub fn from_global(global: &GlobalArgs) -> Self {
        Self {
            json: global.json,
            null_mode: global.null_mode(),
            selection: global.selection(),
        }
    }

    pub fn omit_null(&self) -> bool {
        self.null_mode == NullMode::Omit
    }
}

/// Look up a resource definition, listing the valid keys on failure
pub fn find_resource(key: &str) -> Result<&'static ResourceDef> {
    resource::get_resource(key).with_context(|| {
        format!(
            "Unknown resource '{}'. Run 'xbe resources' to see available resources.",
            key
        )
    })
}

/// Build a client from flags, environment and config
pub fn build_client(global: &GlobalArgs, config: &Config) -> Result<ApiClient> {
    let base_url = config.effective_base_url(global.base_url.as_deref());

    let token = if global.no_auth {
        None
    } else {
        resolve_token(global.token.as_deref(), &base_url, config).map(|resolved| {
            tracing::debug!("Token source: {}", resolved.source);
            resolved.token
        })
    };

    tracing::info!("Using base URL: {}", base_url);
    ApiClient::new(&base_url, token)
}

/// Run a parsed command line, writing command output to `out`
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let config = Config::load();
    let options = OutputOptions::from_global(&cli.global);

    match cli.command {
        Command::Resources => list_resources(&options, out),
        Command::View { resource, action } => {
            let def = find_resource(&resource)?;
            let client = build_client(&cli.global, &config)?;
            view::run(&client, def, action, &options, out).await
        }
        Command::Do { resource, action } => {
            let def = find_resource(&resource)?;
            let client = build_client(&cli.global, &config)?;
            do_cmd::run(&client, def, action, &options, out).await
        }
        Command::Auth { action } => auth::run(action, &cli.global, config, out),
    }
}

fn list_resources<W: Write>(options: &OutputOptions, out: &mut W) -> Result<()> {
    let keys = resource::get_all_resource_keys();

    if options.json {
        let items: Vec<serde_json::Value> = keys
            .iter()
            .filter_map(|key| resource::get_resource(key).map(|def| (key, def)))
            .map(|(key, def)| {
                serde_json::json!({
                    "key": key,
                    "name": def.display_name,
                    "type": def.ty,
                    "path": def.path,
                })
            })
            .collect();
        output::write_json(out, &serde_json::Value::Array(items), false)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = keys
        .iter()
        .filter_map(|key| resource::get_resource(key).map(|def| (key, def)))
        .map(|(key, def)| vec![key.to_string(), def.display_name.clone(), def.path.clone()])
        .collect();
    let columns = [Column::new("RESOURCE"), Column::new("NAME"), Column::new("PATH")];
    output::render_table(&columns, &rows, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_resource() {
        assert!(find_resource("objectives").is_ok());

        let err = find_resource("nope").unwrap_err();
        assert!(err.to_string().contains("xbe resources"));
    }

    #[test]
    fn test_list_resources_table() {
        let mut out = Vec::new();
        list_resources(&OutputOptions::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("RESOURCE"));
        assert!(text.contains("objectives"));
        assert!(text.contains("/v1/material-types"));
    }

    #[test]
    fn test_list_resources_json() {
        let options = OutputOptions {
            json: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        list_resources(&options, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let items = value.as_array().unwrap();
        assert!(items.iter().any(|item| item["key"] == "users"));
    }

    #[test]
    fn test_build_client_no_auth() {
        let global = GlobalArgs {
            base_url: Some("https://api.example.com/".to_string()),
            token: Some("secret".to_string()),
            no_auth: true,
            ..Default::default()
        };
        let client = build_client(&global, &Config::default()).unwrap();
        assert!(!client.has_token());
        assert_eq!(client.base_url, "https://api.example.com");
    }

    #[test]
    fn test_build_client_flag_token() {
        let global = GlobalArgs {
            base_url: Some("https://api.example.com".to_string()),
            token: Some("secret".to_string()),
            ..Default::default()
        };
        let client = build_client(&global, &Config::default()).unwrap();
        assert!(client.has_token());
    }
}
