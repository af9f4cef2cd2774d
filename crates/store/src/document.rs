//! Document model for the volreg document store.
//!
//! Documents are schemaless JSON field maps addressed by
//! `(collection, id)` keys, the shape of the external document database
//! the admin surface is backed by.

use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use snafu::ResultExt;

use crate::error::{InvalidDocumentSnafu, Result, SerializationSnafu};

/// Top-level fields of a document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Addresses a single document as `(collection, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    /// Collection the document lives in, e.g. `"counters"`.
    pub collection: String,
    /// Document id within the collection, e.g. a namespace name.
    pub id: String,
}

impl DocumentKey {
    /// Creates a key from a collection name and document id.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self { collection: collection.into(), id: id.into() }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A schemaless document: a map of named JSON fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    /// The document's top-level fields.
    pub fields: Fields,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from a field map.
    #[must_use]
    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    /// Returns a field value, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields.get(field)
    }

    /// Returns a field as a non-negative integer, if present and numeric.
    #[must_use]
    pub fn get_u64(&self, field: &str) -> Option<u64> {
        self.fields.get(field)?.as_u64()
    }

    /// Returns a field as a string slice, if present and a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field)?.as_str()
    }

    /// Sets a single field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Merges `incoming` into this document at the top level.
    ///
    /// Incoming fields overwrite same-named fields; all other fields are
    /// preserved. Nested values are replaced wholesale, not merged.
    pub fn merge(&mut self, incoming: &Fields) {
        for (name, value) in incoming {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    /// Encodes a record into a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`](crate::StoreError::Serialization)
    /// if the record cannot be serialized, or
    /// [`StoreError::InvalidDocument`](crate::StoreError::InvalidDocument)
    /// if it does not serialize to a JSON object.
    pub fn serialize_from<T: Serialize>(record: &T) -> Result<Self> {
        match serde_json::to_value(record).context(SerializationSnafu)? {
            serde_json::Value::Object(fields) => Ok(Self { fields }),
            other => InvalidDocumentSnafu {
                message: format!("record serialized to {other:?}, expected an object"),
            }
            .fail(),
        }
    }

    /// Decodes this document into a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`](crate::StoreError::Serialization)
    /// if the fields do not match the record type.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(serde_json::Value::Object(self.fields.clone()))
            .context(SerializationSnafu)
    }
}
