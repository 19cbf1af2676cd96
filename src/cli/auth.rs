//! `xbe auth login|logout|status`

use anyhow::Result;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;

use super::args::{AuthAction, GlobalArgs};
use crate::api::auth::resolve_token;
use crate::config::Config;
use crate::jsonapi::attrs;
use crate::output;

pub fn run<W: Write>(
    action: AuthAction,
    global: &GlobalArgs,
    config: Config,
    out: &mut W,
) -> Result<()> {
    let path = Config::config_path();
    run_with_path(action, global, config, path, out)
}

/// Same as [`run`] with an explicit config location (`None` skips saving)
pub fn run_with_path<W: Write>(
    action: AuthAction,
    global: &GlobalArgs,
    mut config: Config,
    path: Option<PathBuf>,
    out: &mut W,
) -> Result<()> {
    let base_url = config.effective_base_url(global.base_url.as_deref());
    let save = |config: &Config| -> Result<()> {
        match &path {
            Some(path) => config.save_to(path),
            None => Ok(()),
        }
    };

    match action {
        AuthAction::Login => {
            let Some(token) = global.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
            else {
                anyhow::bail!("--token is required for 'xbe auth login'");
            };
            config.set_token(&base_url, token);
            save(&config)?;
            tracing::info!("Stored token for {}", base_url);
            writeln!(out, "Saved token for {}", base_url)?;
        }
        AuthAction::Logout => {
            let removed = config.remove_token(&base_url);
            if removed {
                save(&config)?;
                writeln!(out, "Removed token for {}", base_url)?;
            } else {
                writeln!(out, "No stored token for {}", base_url)?;
            }
        }
        AuthAction::Status => {
            let resolved = if global.no_auth {
                None
            } else {
                resolve_token(global.token.as_deref(), &base_url, &config)
            };
            let source = resolved.map(|r| r.source.to_string());

            if global.json {
                let value = json!({
                    "base_url": base_url,
                    "authenticated": source.is_some(),
                    "token_source": source,
                });
                output::write_json(out, &value, global.omit_null)?;
            } else {
                let state = if source.is_some() { "set" } else { "not set" };
                writeln!(out, "Base URL: {}", base_url)?;
                writeln!(out, "Token:    {}", state)?;
                writeln!(
                    out,
                    "Source:   {}",
                    attrs::format_optional(source.as_deref().unwrap_or_default())
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(token: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            base_url: Some("https://api.example.com".to_string()),
            token: token.map(str::to_string),
            ..Default::default()
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("xbe-auth-test-{}-{}", name, std::process::id()))
            .join("config.json")
    }

    #[test]
    fn test_login_requires_token() {
        let mut out = Vec::new();
        let result = run_with_path(
            AuthAction::Login,
            &global(None),
            Config::default(),
            None,
            &mut out,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_login_then_logout_persists() {
        let path = temp_path("login");
        let mut out = Vec::new();

        run_with_path(
            AuthAction::Login,
            &global(Some("secret")),
            Config::default(),
            Some(path.clone()),
            &mut out,
        )
        .unwrap();
        let stored = Config::load_from(&path);
        assert_eq!(stored.token_for("https://api.example.com"), Some("secret"));

        run_with_path(
            AuthAction::Logout,
            &global(None),
            stored,
            Some(path.clone()),
            &mut out,
        )
        .unwrap();
        let stored = Config::load_from(&path);
        assert_eq!(stored.token_for("https://api.example.com"), None);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Saved token for https://api.example.com"));
        assert!(text.contains("Removed token for https://api.example.com"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_status_never_prints_token() {
        let mut out = Vec::new();
        run_with_path(
            AuthAction::Status,
            &global(Some("secret")),
            Config::default(),
            None,
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("--token flag"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_status_without_token_shows_no_source() {
        let mut out = Vec::new();
        let args = GlobalArgs {
            no_auth: true,
            ..global(None)
        };
        run_with_path(AuthAction::Status, &args, Config::default(), None, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Base URL: https://api.example.com\nToken:    not set\nSource:   (none)\n"
        );
    }
}
