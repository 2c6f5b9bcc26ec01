//! Value universe for system description data.
//!
//! Every piece of data in a system description is a [`Value`]: either a JSON
//! primitive, a [`Record`] (named attributes with a declared allow-list) or a
//! [`Collection`] (ordered elements plus the collection's own attributes).

use crate::collection::Collection;
use crate::record::Record;
use std::sync::Arc;

/// A value in a system description tree.
///
/// Numbers are kept as [`serde_json::Number`] so that round-tripping a document
/// through `from_raw`/`to_raw` never changes their representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Record(Record),
    Collection(Collection),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Record(_) => "record",
            Value::Collection(_) => "collection",
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Encodes this value back to its raw JSON form.
    pub fn to_raw(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Record(record) => record.to_raw(),
            Value::Collection(collection) => collection.to_raw(),
        }
    }

    /// Attaches a scope back-reference to this value and every nested
    /// record/collection. Idempotent; never observed by equality.
    pub fn attach_scope(&mut self, scope: &ScopeRef) {
        match self {
            Value::Record(record) => record.attach_scope(scope),
            Value::Collection(collection) => collection.attach_scope(scope),
            _ => {}
        }
    }

    /// Renders the value as a plain string for filter matching and display.
    /// Containers have no filterable string form.
    pub fn as_display_string(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Record(_) | Value::Collection(_) => None,
        }
    }

    /// Returns a short preview of the value, truncated to max_len.
    pub fn preview(&self, max_len: usize) -> String {
        let preview = match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => format!("\"{}\"", s),
            Value::Record(record) => {
                let count = record.len();
                if count == 1 {
                    format!("{{ {} attribute }}", count)
                } else {
                    format!("{{ {} attributes }}", count)
                }
            }
            Value::Collection(collection) => {
                let count = collection.len();
                if count == 1 {
                    format!("[ {} element ]", count)
                } else {
                    format!("[ {} elements ]", count)
                }
            }
        };

        if preview.chars().count() > max_len {
            let truncated: String = preview.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", truncated)
        } else {
            preview
        }
    }
}

/// Non-owning back-reference from a value to the named scope it belongs to.
///
/// Specialized collaborators (e.g. file content stores) reach sibling data
/// through this handle. It is attached by a separate recursive pass after
/// decoding (see [`SystemDescription`](crate::description::SystemDescription))
/// and deliberately takes no part in equality or comparison.
#[derive(Debug, Clone)]
pub struct ScopeRef {
    name: Arc<str>,
}

impl ScopeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
