use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, versioned resource.
///
/// `kind`, `version`, `spec` and `status` are opaque to the storage engine:
/// they are stored and returned verbatim. Only [`ObjectMetadata`] carries
/// meaning for the engine.
///
/// Decoding rejects unknown fields; every field may be omitted and falls back
/// to its default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Object {
    /// Type tag in URI form, e.g. `example.org/Example`.
    pub kind: String,
    /// Free-form schema version, e.g. `v1`.
    pub version: String,
    pub metadata: ObjectMetadata,
    /// Desired state.
    pub spec: Value,
    /// Observed state.
    pub status: Value,
}

impl Object {
    /// Create an object with the given kind, version and name, and empty
    /// metadata tokens.
    pub fn new(kind: impl Into<String>, version: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            version: version.into(),
            metadata: ObjectMetadata::named(name),
            spec: Value::Null,
            status: Value::Null,
        }
    }

    /// Replace the `spec` payload.
    pub fn with_spec(mut self, spec: Value) -> Self {
        self.spec = spec;
        self
    }

    /// Replace the `status` payload.
    pub fn with_status(mut self, status: Value) -> Self {
        self.status = status;
        self
    }

    /// Add a label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    /// Set the expected `id` and `revision` used as a precondition on writes.
    pub fn with_precondition(mut self, id: impl Into<String>, revision: impl Into<String>) -> Self {
        self.metadata.id = id.into();
        self.metadata.revision = revision.into();
        self
    }

    /// The object's name (primary key).
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

/// Identity and versioning envelope of an [`Object`].
///
/// Once an object is stored, `creation_time`, `id` and `revision` belong to
/// the engine. On writes, callers use `id` and `revision` to state which
/// stored version they expect; an empty string means "no expectation".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectMetadata {
    /// Primary key, immutable after creation.
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Set once on first creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    /// Lineage token, assigned on creation.
    pub id: String,
    /// Version token, reassigned on every mutation.
    pub revision: String,
}

impl ObjectMetadata {
    /// Metadata with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The `{id, revision}` pair returned by every successful mutation.
///
/// The default value (both tokens empty) means "not set"; the engine never
/// generates an empty token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataResponse {
    pub id: String,
    pub revision: String,
}

impl MetadataResponse {
    pub fn new(id: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            revision: revision.into(),
        }
    }

    /// Returns `true` if both tokens are set.
    pub fn is_set(&self) -> bool {
        !self.id.is_empty() && !self.revision.is_empty()
    }
}

impl From<&ObjectMetadata> for MetadataResponse {
    fn from(metadata: &ObjectMetadata) -> Self {
        Self::new(metadata.id.clone(), metadata.revision.clone())
    }
}
