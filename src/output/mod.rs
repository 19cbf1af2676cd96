//! Output collaborators: tables, detail lines and JSON

pub mod details;
pub mod json;
pub mod table;

pub use details::render_details;
pub use json::{prune_nulls, write_json};
pub use table::{render_table, truncate_string, Column};
