//! Document Parser
//!
//! Decodes a JSON:API response body into [`Resource`]s plus the sideloaded
//! `included` list. Only malformed JSON (or a non-object top level) is an
//! error; every other shape problem degrades to an empty value.

use super::attrs::Attributes;
use super::relationship::{lenient_string, Relationship, ResourceIdentifier};
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Failure to decode a response body
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON in response body: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("response body is not a JSON object")]
    NotAnObject,
}

/// A JSON:API resource object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resource {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub ty: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_object")]
    pub attributes: Attributes,
    #[serde(default, deserialize_with = "lenient_relationships")]
    pub relationships: HashMap<String, Relationship>,
    #[serde(default)]
    pub meta: Option<Value>,
}

impl Resource {
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.ty.as_str(), self.id.as_str())
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    /// The reference held by a single-valued relationship. `None` when the
    /// relationship is missing, null, or not single-valued.
    pub fn relationship_to_one(&self, name: &str) -> Option<&ResourceIdentifier> {
        self.relationship(name)?.target()
    }

    /// References held by a relationship, in payload order. Missing
    /// relationships and undecodable payloads yield an empty slice.
    pub fn relationship_to_many(&self, name: &str) -> &[ResourceIdentifier] {
        self.relationship(name)
            .map(Relationship::targets)
            .unwrap_or_default()
    }

    /// Ids of a relationship's references, skipping blank ids
    pub fn relationship_ids(&self, name: &str) -> Vec<String> {
        self.relationship_to_many(name)
            .iter()
            .filter(|target| !target.id.is_empty())
            .map(|target| target.id.clone())
            .collect()
    }

    /// Id of a to-one relationship, or `""` when absent
    pub fn relationship_id(&self, name: &str) -> String {
        self.relationship_to_one(name)
            .map(|target| target.id.clone())
            .unwrap_or_default()
    }

    pub fn relationship_count(&self, name: &str) -> usize {
        self.relationship_to_many(name).len()
    }
}

/// Primary `data` of a document: one optional resource or a sequence
pub trait PrimaryData {
    fn resources(&self) -> &[Resource];
}

impl PrimaryData for Option<Resource> {
    fn resources(&self) -> &[Resource] {
        self.as_slice()
    }
}

impl PrimaryData for Vec<Resource> {
    fn resources(&self) -> &[Resource] {
        self.as_slice()
    }
}

/// Top-level JSON:API envelope
#[derive(Debug, Clone, Default)]
pub struct Document<D> {
    pub data: D,
    pub included: Vec<Resource>,
    pub meta: Option<Value>,
    pub links: Option<Value>,
}

pub type SingleDocument = Document<Option<Resource>>;
pub type CollectionDocument = Document<Vec<Resource>>;

/// Pagination details read from a collection's `meta` and `links`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pagination {
    pub total_count: Option<u64>,
    pub next: Option<String>,
}

impl<D: PrimaryData> Document<D> {
    pub fn primary(&self) -> &[Resource] {
        self.data.resources()
    }

    pub fn pagination(&self) -> Pagination {
        let total_count = self.meta.as_ref().and_then(|meta| {
            ["record-count", "total-count", "total"]
                .iter()
                .find_map(|key| meta.get(*key).and_then(Value::as_u64))
        });
        let next = self
            .links
            .as_ref()
            .and_then(|links| links.get("next"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Pagination { total_count, next }
    }
}

type Envelope = HashMap<String, Box<RawValue>>;

fn parse_envelope(bytes: &[u8]) -> Result<Envelope, DecodeError> {
    let body: Box<RawValue> = serde_json::from_slice(bytes)?;
    if !body.get().starts_with('{') {
        return Err(DecodeError::NotAnObject);
    }
    Ok(serde_json::from_str(body.get())?)
}

fn is_null(raw: &RawValue) -> bool {
    raw.get() == "null"
}

fn parse_resource(raw: &RawValue) -> Option<Resource> {
    if !raw.get().starts_with('{') {
        return None;
    }
    serde_json::from_str(raw.get()).ok()
}

fn parse_resource_list(raw: Option<&RawValue>) -> Vec<Resource> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let items: Vec<Box<RawValue>> = serde_json::from_str(raw.get()).unwrap_or_default();
    items.iter().filter_map(|item| parse_resource(item)).collect()
}

fn parse_value(raw: Option<&RawValue>) -> Option<Value> {
    raw.filter(|raw| !is_null(raw))
        .and_then(|raw| serde_json::from_str(raw.get()).ok())
}

fn envelope_parts(envelope: &Envelope) -> (Vec<Resource>, Option<Value>, Option<Value>) {
    (
        parse_resource_list(envelope.get("included").map(|raw| &**raw)),
        parse_value(envelope.get("meta").map(|raw| &**raw)),
        parse_value(envelope.get("links").map(|raw| &**raw)),
    )
}

/// Parse a single-resource response body
pub fn parse_single(bytes: &[u8]) -> Result<SingleDocument, DecodeError> {
    let envelope = parse_envelope(bytes)?;
    let data = envelope
        .get("data")
        .filter(|raw| !is_null(raw))
        .and_then(|raw| parse_resource(raw));
    let (included, meta, links) = envelope_parts(&envelope);

    Ok(Document {
        data,
        included,
        meta,
        links,
    })
}

/// Parse a collection response body. A single object in `data` is read as a
/// one-element collection.
pub fn parse_collection(bytes: &[u8]) -> Result<CollectionDocument, DecodeError> {
    let envelope = parse_envelope(bytes)?;
    let data = match envelope.get("data") {
        Some(raw) if raw.get().starts_with('[') => parse_resource_list(Some(&**raw)),
        Some(raw) => parse_resource(raw).into_iter().collect(),
        None => Vec::new(),
    };
    let (included, meta, links) = envelope_parts(&envelope);

    Ok(Document {
        data,
        included,
        meta,
        links,
    })
}

fn lenient_object<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Attributes, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Attributes::new(),
    })
}

fn lenient_relationships<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HashMap<String, Relationship>, D::Error> {
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    Ok(serde_json::from_str(raw.get()).unwrap_or_default())
}
