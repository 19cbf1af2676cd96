//! xbe - command-line client for the XBE JSON:API backend
//!
//! The library exposes the JSON:API document model ([`jsonapi`]) used by
//! every command, plus the HTTP client, resource registry, output helpers
//! and command tree that make up the `xbe` binary.

pub mod api;
pub mod cli;
pub mod config;
pub mod jsonapi;
pub mod output;
pub mod resource;

/// Version injected at compile time via XBE_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("XBE_VERSION") {
    Some(v) => v,
    None => "dev",
};
