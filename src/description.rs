//! System description documents.
//!
//! A [`SystemDescription`] is a named snapshot of a machine's configuration:
//! a mapping from scope name (e.g. "packages", "users") to the decoded value
//! of that section, plus an optional `meta` section. Storage, validation and
//! format migration of older documents live outside this crate.
//!
//! # Examples
//!
//! ```no_run
//! use sysdiff::SystemDescription;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let description = SystemDescription::load(Path::new("machine_a.json"))?;
//! for scope in description.scope_names() {
//!     println!("{}", scope);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{ModelError, ParseError};
use crate::schema::decode_value;
use crate::scopes::scope_element_type;
use crate::value::{ScopeRef, Value};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

/// Key of the metadata section, which is not a scope.
const META_KEY: &str = "meta";

/// A named system description: scope name → decoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemDescription {
    name: String,
    scopes: IndexMap<String, Value>,
    meta: Option<Value>,
}

impl SystemDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scopes: IndexMap::new(),
            meta: None,
        }
    }

    /// Decodes a description from a raw JSON document.
    ///
    /// Each top-level key is decoded through its declared scope kind where
    /// one exists and through the generic detector otherwise. After decoding,
    /// a scope back-reference is attached to every value in a separate
    /// recursive pass.
    ///
    /// # Errors
    ///
    /// Fails with a [`ModelError`] if `raw` is not an object or any scope
    /// fails to decode.
    pub fn from_raw(name: impl Into<String>, raw: &serde_json::Value) -> Result<Self, ModelError> {
        let name = name.into();
        let map = raw
            .as_object()
            .ok_or_else(|| ModelError::expected_object("system_description", raw))?;

        let mut scopes = IndexMap::new();
        let mut meta = None;
        for (key, raw_value) in map {
            if key == META_KEY {
                meta = Some(decode_value(raw_value, None)?);
                continue;
            }

            let mut value = decode_value(raw_value, scope_element_type(key))?;
            value.attach_scope(&ScopeRef::new(key.clone()));
            scopes.insert(key.clone(), value);
        }

        Ok(Self { name, scopes, meta })
    }

    /// Loads a description from a JSON file; the description is named after
    /// the file stem.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let display_path = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(ParseError::file_not_found(display_path));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ParseError::read_error(display_path.clone(), e))?;
        let raw: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| ParseError::json_error(display_path.clone(), e))?;

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("description")
            .to_string();

        Self::from_raw(name, &raw).map_err(|e| ParseError::invalid_description(display_path, e))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self, name: &str) -> Option<&Value> {
        self.scopes.get(name)
    }

    pub fn scope_names(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    pub fn meta(&self) -> Option<&Value> {
        self.meta.as_ref()
    }

    /// Stores a scope value, attaching the scope back-reference.
    pub fn set_scope(&mut self, name: impl Into<String>, mut value: Value) {
        let name = name.into();
        value.attach_scope(&ScopeRef::new(name.clone()));
        self.scopes.insert(name, value);
    }

    /// Encodes the description back to a raw JSON document.
    pub fn to_raw(&self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(self.scopes.len() + 1);
        for (name, value) in &self.scopes {
            map.insert(name.clone(), value.to_raw());
        }
        if let Some(meta) = &self.meta {
            map.insert(META_KEY.to_string(), meta.to_raw());
        }
        serde_json::Value::Object(map)
    }
}
