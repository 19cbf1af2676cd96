//! API token resolution
//!
//! Tokens come from, in order: the `--token` flag, `XBE_TOKEN`,
//! `XBE_API_TOKEN`, then the token stored in the config for the base URL.

use crate::config::Config;
use std::fmt;

pub const TOKEN_ENV_VARS: &[&str] = &["XBE_TOKEN", "XBE_API_TOKEN"];

/// Where a resolved token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Flag,
    Env(&'static str),
    Config,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Flag => write!(f, "--token flag"),
            TokenSource::Env(name) => write!(f, "{} environment variable", name),
            TokenSource::Config => write!(f, "config file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub token: String,
    pub source: TokenSource,
}

/// Resolve the token for `base_url` from the process environment
pub fn resolve_token(
    explicit: Option<&str>,
    base_url: &str,
    config: &Config,
) -> Option<ResolvedToken> {
    resolve_token_with(explicit, base_url, config, |key| std::env::var(key).ok())
}

pub fn resolve_token_with<F>(
    explicit: Option<&str>,
    base_url: &str,
    config: &Config,
    env: F,
) -> Option<ResolvedToken>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(ResolvedToken {
            token: token.to_string(),
            source: TokenSource::Flag,
        });
    }

    for &name in TOKEN_ENV_VARS {
        if let Some(token) = env(name).filter(|t| !t.trim().is_empty()) {
            tracing::debug!("Using token from {}", name);
            return Some(ResolvedToken {
                token: token.trim().to_string(),
                source: TokenSource::Env(name),
            });
        }
    }

    config.token_for(base_url).map(|token| ResolvedToken {
        token: token.to_string(),
        source: TokenSource::Config,
    })
}
