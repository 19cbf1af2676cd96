use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;

use crate::jsonapi::{FieldSelection, NullMode};

/// Command-line client for the XBE JSON:API backend
#[derive(Parser, Debug)]
#[command(name = "xbe", version = crate::VERSION, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// API base URL (default: XBE_BASE_URL, config, then https://app.x-b-e.com)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API token (default: XBE_TOKEN, XBE_API_TOKEN, then the stored token)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Disable auth token lookup
    #[arg(long, global = true)]
    pub no_auth: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Drop null values from output
    #[arg(long, global = true, conflicts_with = "show_null")]
    pub omit_null: bool,

    /// Render requested fields missing from the response as null
    #[arg(long, global = true)]
    pub show_null: bool,

    /// Sparse fieldset: `field,field` optionally followed by `;type:field,field`
    #[arg(long, global = true)]
    pub fields: Option<String>,

    /// Relationships to sideload, comma-separated
    #[arg(long, global = true)]
    pub include: Option<String>,

    /// Log level for debugging (written to the xbe log file)
    #[arg(long, global = true, value_enum, default_value = "off")]
    pub log_level: LogLevel,
}

impl GlobalArgs {
    pub fn null_mode(&self) -> NullMode {
        if self.omit_null {
            NullMode::Omit
        } else if self.show_null {
            NullMode::Show
        } else {
            NullMode::Default
        }
    }

    pub fn selection(&self) -> FieldSelection {
        FieldSelection::parse(self.fields.as_deref(), self.include.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List known resource types
    Resources,

    /// Read resources
    View {
        /// Resource type, e.g. objectives
        resource: String,

        #[command(subcommand)]
        action: ViewAction,
    },

    /// Create, update or delete resources
    Do {
        /// Resource type, e.g. objectives
        resource: String,

        #[command(subcommand)]
        action: DoAction,
    },

    /// Manage stored API tokens
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ViewAction {
    /// List resources with filtering and pagination
    List(ListArgs),

    /// Show one resource
    Show { id: String },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page size
    #[arg(long, default_value_t = 50)]
    pub limit: u32,

    /// Page offset
    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// Sort by field (prefix with - for descending)
    #[arg(long)]
    pub sort: Option<String>,

    /// Filter as key=value, sent as filter[key]=value (repeatable)
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            sort: None,
            filters: Vec::new(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum DoAction {
    /// Create a resource
    Create(WriteArgs),

    /// Update a resource
    Update {
        id: String,

        #[command(flatten)]
        changes: WriteArgs,
    },

    /// Delete a resource (shows it first; requires --confirm)
    Delete {
        id: String,

        /// Actually delete
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct WriteArgs {
    /// Attribute as key=value; JSON values are sent typed (repeatable)
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub attrs: Vec<(String, String)>,

    /// Relationship as name=type:id[,type:id]; empty clears it (repeatable)
    #[arg(long = "rel", value_name = "NAME=TYPE:ID", value_parser = parse_key_value)]
    pub rels: Vec<(String, String)>,
}

impl WriteArgs {
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.rels.is_empty()
    }
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Store the --token value for the base URL
    Login,

    /// Remove the stored token for the base URL
    Logout,

    /// Show where the token for the base URL comes from
    Status,
}

/// Parse `key=value`; the key must be non-empty
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
