//! JSON:API document model
//!
//! Every command decodes its response body through this module. It parses a
//! polymorphic JSON:API document, resolves relationships against the
//! sideloaded `included` set, and exposes lenient attribute accessors.
//!
//! # Module Structure
//!
//! - [`document`] - Parses single-resource and collection bodies
//! - [`relationship`] - Relationship linkage with deferred to-many decoding
//! - [`index`] - `(type, id)` lookup over `included` and relationship resolution
//! - [`attrs`] - Zero-value-fallback attribute accessors and display helpers
//! - [`format`] - Date, datetime and time display formatting
//! - [`sparse`] - Renders exactly the requested fields and includes
//!
//! Nothing here performs I/O or logs. Malformed JSON is the only error;
//! missing attributes, missing relationships and unresolved references all
//! degrade to empty values.
//!
//! # Example
//!
//! ```
//! use xbe::jsonapi::{attrs, build_index, parse_single};
//!
//! let body = br#"{"data":{"id":"1","type":"widgets","attributes":{"name":"Foo"},
//!     "relationships":{"owner":{"data":{"type":"users","id":"9"}}}},
//!     "included":[{"id":"9","type":"users","attributes":{"name":"Alice"}}]}"#;
//!
//! let doc = parse_single(body).unwrap();
//! let widget = doc.data.as_ref().unwrap();
//! let index = build_index(&doc.included);
//! let owner = widget.relationship_to_one("owner").unwrap();
//!
//! assert_eq!(attrs::string_attr(&widget.attributes, "name"), "Foo");
//! assert_eq!(attrs::string_attr(index.resolve(owner).unwrap(), "name"), "Alice");
//! ```

pub mod attrs;
pub mod document;
pub mod format;
pub mod index;
pub mod relationship;
pub mod sparse;

pub use attrs::Attributes;
pub use document::{
    parse_collection, parse_single, CollectionDocument, DecodeError, Document, Pagination,
    PrimaryData, Resource, SingleDocument,
};
pub use index::{build_index, ResourceIndex, ResourceKey, DEFAULT_LABEL_ATTRIBUTES};
pub use relationship::{Linkage, Relationship, ResourceIdentifier};
pub use sparse::{
    raw_attribute, render_sparse, render_sparse_with, AttributeCoercion, FieldSelection, NullMode,
    SparseField, SparseOutput, SparseRecord,
};
