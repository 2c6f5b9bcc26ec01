//! Generic record type: a named-attribute container with a declared allow-list.
//!
//! A [`Record`] stores attribute name → [`Value`] pairs in insertion order.
//! Its concrete kind is given by a constant [`RecordSchema`]: declared kinds
//! reject unknown attribute names eagerly, both at construction and during
//! decoding, so stale or foreign data never enters the model silently.
//!
//! # Examples
//!
//! ```
//! use sysdiff::scopes::PACKAGE;
//! use sysdiff::Record;
//! use serde_json::json;
//!
//! let package = Record::from_raw(&PACKAGE, &json!({"name": "bash", "version": "4.3"})).unwrap();
//! assert_eq!(package.get("name").and_then(|v| v.as_str()), Some("bash"));
//!
//! // "color" is not in the allow-list of the package kind
//! assert!(Record::from_raw(&PACKAGE, &json!({"color": "blue"})).is_err());
//! ```

use crate::comparison::Comparison;
use crate::error::ModelError;
use crate::schema::{decode_value, RecordSchema};
use crate::value::{ScopeRef, Value};
use indexmap::IndexMap;

/// A generic mapping from attribute name to value, tied to a declared kind.
///
/// Equality is purely structural: same kind and identical attribute mapping,
/// recursively. The optional scope back-reference never participates.
#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static RecordSchema,
    attributes: IndexMap<String, Value>,
    scope: Option<ScopeRef>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.kind == other.schema.kind && self.attributes == other.attributes
    }
}

impl Record {
    /// Creates an empty record of the given kind.
    pub fn new(schema: &'static RecordSchema) -> Self {
        Self {
            schema,
            attributes: IndexMap::new(),
            scope: None,
        }
    }

    /// Creates a record from already-decoded attributes, enforcing the
    /// allow-list.
    pub fn with_attributes(
        schema: &'static RecordSchema,
        attributes: IndexMap<String, Value>,
    ) -> Result<Self, ModelError> {
        let unknown = schema.attributes.unknown_keys(&attributes);
        if !unknown.is_empty() {
            return Err(ModelError::unknown_attributes(schema.kind, &unknown));
        }

        Ok(Self {
            schema,
            attributes,
            scope: None,
        })
    }

    /// Decodes a record of the given kind from raw JSON.
    ///
    /// Attribute values are coerced through their declared element type where
    /// one exists, and through the generic detector otherwise.
    ///
    /// # Errors
    ///
    /// Fails with [`ModelError::ExpectedObject`] if `raw` is not an object,
    /// or [`ModelError::UnknownAttributes`] if it contains a key outside the
    /// kind's allow-list. Decoding fails fast; no partial record is produced.
    pub fn from_raw(
        schema: &'static RecordSchema,
        raw: &serde_json::Value,
    ) -> Result<Self, ModelError> {
        let map = raw
            .as_object()
            .ok_or_else(|| ModelError::expected_object(schema.kind, raw))?;

        let unknown: Vec<String> = map
            .keys()
            .filter(|key| !schema.attributes.allows(key))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ModelError::unknown_attributes(schema.kind, &unknown));
        }

        let mut attributes = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            let decoded = decode_value(value, schema.element_type_of(key))?;
            attributes.insert(key.clone(), decoded);
        }

        Ok(Self {
            schema,
            attributes,
            scope: None,
        })
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    pub fn kind(&self) -> &'static str {
        self.schema.kind
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Stores an already-decoded value under `name`, enforcing the allow-list.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), ModelError> {
        if !self.schema.attributes.allows(name) {
            return Err(ModelError::unknown_attributes(
                self.schema.kind,
                &[name.to_string()],
            ));
        }
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    /// Decodes a raw value through the declared coercion rule for `name` (or
    /// the generic detector) and stores it.
    pub fn set_raw(&mut self, name: &str, raw: serde_json::Value) -> Result<(), ModelError> {
        let decoded = decode_value(&raw, self.schema.element_type_of(name))?;
        self.set(name, decoded)
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Encodes this record as a JSON object, recursively.
    pub fn to_raw(&self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(self.attributes.len());
        for (key, value) in &self.attributes {
            map.insert(key.clone(), value.to_raw());
        }
        serde_json::Value::Object(map)
    }

    /// Atomic comparison: wholly common when structurally equal, otherwise
    /// the left record lands in "only in A" and the right in "only in B".
    ///
    /// Composite kinds are decomposed per attribute instead; see
    /// [`compare_values`](crate::comparison::compare_values).
    pub fn compare_with(&self, other: &Record) -> Comparison {
        if self == other {
            Comparison {
                common: Some(Value::Record(self.clone())),
                ..Comparison::default()
            }
        } else {
            Comparison {
                only_in_a: Some(Value::Record(self.clone())),
                only_in_b: Some(Value::Record(other.clone())),
                ..Comparison::default()
            }
        }
    }

    /// Attaches a scope back-reference to this record and all nested values.
    /// Idempotent; ignored by equality and comparison.
    pub fn attach_scope(&mut self, scope: &ScopeRef) {
        self.scope = Some(scope.clone());
        for value in self.attributes.values_mut() {
            value.attach_scope(scope);
        }
    }

    pub fn scope(&self) -> Option<&ScopeRef> {
        self.scope.as_ref()
    }
}
