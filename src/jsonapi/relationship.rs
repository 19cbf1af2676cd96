//! Relationship linkage
//!
//! A relationship's `data` member is either `null`, a single identifier, or
//! an array of identifiers. Single identifiers and nulls are decoded while
//! parsing; anything else is kept as raw JSON and decoded as a to-many
//! sequence the first time it is asked for.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::{json, Value};
use std::cell::OnceCell;

/// A `{type, id}` reference to another resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub ty: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
}

/// Reads a string member, stringifying numbers and blanking anything else
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

impl ResourceIdentifier {
    pub fn new(ty: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            id: id.into(),
        }
    }

    /// Parse a `type:id` command-line reference
    pub fn parse_ref(value: &str) -> Option<Self> {
        let (ty, id) = value.split_once(':')?;
        let (ty, id) = (ty.trim(), id.trim());
        if ty.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(ty, id))
    }

    pub fn to_value(&self) -> Value {
        json!({ "type": self.ty, "id": self.id })
    }
}

/// Relationship linkage. Exactly one shape is held at a time.
#[derive(Debug, Clone)]
pub enum Linkage {
    /// Single reference, or `None` when the linkage is null
    ToOne(Option<ResourceIdentifier>),
    /// Ordered references
    ToMany(Vec<ResourceIdentifier>),
    /// Linkage kept as received; decoded as a sequence on first use
    Undecoded {
        raw: Box<RawValue>,
        decoded: OnceCell<Vec<ResourceIdentifier>>,
    },
    /// No `data` member at all (links or meta only)
    Missing,
}

/// A JSON:API relationship object
#[derive(Debug, Clone)]
pub struct Relationship {
    pub linkage: Linkage,
    pub links: Option<Value>,
    pub meta: Option<Value>,
}

#[derive(Deserialize)]
struct RelationshipRepr {
    #[serde(default, deserialize_with = "present_raw")]
    data: Option<Box<RawValue>>,
    #[serde(default)]
    links: Option<Value>,
    #[serde(default)]
    meta: Option<Value>,
}

/// Keeps an explicit `null` as raw JSON so it stays distinct from a missing member
fn present_raw<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Box<RawValue>>, D::Error> {
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

impl Relationship {
    pub fn to_one(target: Option<ResourceIdentifier>) -> Self {
        Self::with_linkage(Linkage::ToOne(target))
    }

    pub fn to_many(targets: Vec<ResourceIdentifier>) -> Self {
        Self::with_linkage(Linkage::ToMany(targets))
    }

    fn with_linkage(linkage: Linkage) -> Self {
        Self {
            linkage,
            links: None,
            meta: None,
        }
    }

    fn from_raw(raw: Box<RawValue>) -> Self {
        let Ok(repr) = serde_json::from_str::<RelationshipRepr>(raw.get()) else {
            return Self::with_linkage(Linkage::Missing);
        };

        let linkage = match repr.data {
            None => Linkage::Missing,
            Some(data) if data.get() == "null" => Linkage::ToOne(None),
            Some(data) if data.get().starts_with('{') => {
                Linkage::ToOne(serde_json::from_str::<ResourceIdentifier>(data.get()).ok())
            }
            Some(data) => Linkage::Undecoded {
                raw: data,
                decoded: OnceCell::new(),
            },
        };

        Self {
            linkage,
            links: repr.links,
            meta: repr.meta,
        }
    }

    /// The single reference, if this is a present to-one relationship
    pub fn target(&self) -> Option<&ResourceIdentifier> {
        match &self.linkage {
            Linkage::ToOne(target) => target.as_ref(),
            _ => None,
        }
    }

    /// All references in order. A to-one reference yields a one-element
    /// slice; an undecodable raw payload yields an empty slice.
    pub fn targets(&self) -> &[ResourceIdentifier] {
        match &self.linkage {
            Linkage::ToOne(Some(target)) => std::slice::from_ref(target),
            Linkage::ToOne(None) | Linkage::Missing => &[],
            Linkage::ToMany(targets) => targets.as_slice(),
            Linkage::Undecoded { raw, decoded } => decoded
                .get_or_init(|| serde_json::from_str(raw.get()).unwrap_or_default())
                .as_slice(),
        }
    }

    /// Strict variant of [`Relationship::targets`] for callers that want a
    /// malformed payload surfaced instead of read as empty.
    pub fn try_targets(&self) -> Result<Vec<ResourceIdentifier>, serde_json::Error> {
        match &self.linkage {
            Linkage::Undecoded { raw, .. } => serde_json::from_str(raw.get()),
            _ => Ok(self.targets().to_vec()),
        }
    }

    pub fn is_to_many(&self) -> bool {
        !matches!(self.linkage, Linkage::ToOne(_) | Linkage::Missing)
    }

    /// Whether the relationship carried a `data` member, even a null one
    pub fn has_linkage(&self) -> bool {
        !matches!(self.linkage, Linkage::Missing)
    }

    /// Linkage in wire form, for request documents
    pub fn data_value(&self) -> Value {
        match &self.linkage {
            Linkage::ToOne(Some(target)) => target.to_value(),
            Linkage::ToOne(None) | Linkage::Missing => Value::Null,
            _ => Value::Array(self.targets().iter().map(ResourceIdentifier::to_value).collect()),
        }
    }
}

impl<'de> Deserialize<'de> for Relationship {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}
