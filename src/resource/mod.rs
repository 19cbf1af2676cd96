//! Resource abstraction layer
//!
//! This module provides a data-driven approach to the backend's resource
//! types. Definitions are loaded from JSON files at compile time, allowing
//! new resource types to be added without code changes.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`rows`] - Builds typed table rows and detail fields from a parsed document
//!
//! # Resource Definitions
//!
//! Resources are defined in JSON files under `src/resource/definitions/`:
//! - `planning.json` - Objectives, projects, job production plans
//! - `organizations.json` - Brokers, customers, users
//! - `materials.json` - Material types, crew rates
//!
//! # Example
//!
//! ```ignore
//! use xbe::resource::{get_resource, rows};
//! use xbe::jsonapi::{build_index, parse_collection};
//!
//! fn table(body: &[u8]) -> anyhow::Result<Vec<Vec<String>>> {
//!     let def = get_resource("objectives").unwrap();
//!     let doc = parse_collection(body)?;
//!     let index = build_index(&doc.included);
//!     Ok(rows::list_rows(def, &doc.data, &index))
//! }
//! ```

mod registry;
pub mod rows;

pub use registry::*;
