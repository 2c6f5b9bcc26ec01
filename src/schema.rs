//! Schema descriptors for declared record and collection kinds.
//!
//! Every concrete kind in the data model is described by a constant
//! [`RecordSchema`] or [`CollectionSchema`]. The descriptors carry the
//! attribute allow-list, the expected type of nested attributes (used to
//! coerce raw input during decoding), the element-decode rules for
//! collections, and the comparison mode. They are plain `static` tables,
//! never mutated at runtime.
//!
//! Raw input with no declared expectation goes through the generic detector:
//! a JSON object carrying an `_elements` key decodes as a [`Collection`],
//! any other object as a generic [`Record`], an array as a generic
//! [`Collection`], and everything else stays a primitive.

use crate::collection::Collection;
use crate::error::ModelError;
use crate::record::Record;
use crate::value::Value;
use indexmap::IndexMap;

/// Marker key that distinguishes an encoded collection from a plain record.
pub const ELEMENTS_KEY: &str = "_elements";

/// Key under which a collection's own attributes are encoded.
pub const ATTRIBUTES_KEY: &str = "_attributes";

/// The expected type of a nested value, used for coercion during decoding.
#[derive(Debug, Clone, Copy)]
pub enum ElementType {
    Record(&'static RecordSchema),
    Collection(&'static CollectionSchema),
}

/// Allow-list policy for attribute names.
///
/// Declared kinds reject unknown attributes eagerly; the generic kinds
/// produced by the detector accept anything.
#[derive(Debug)]
pub enum AttributePolicy {
    Open,
    Declared(&'static [AttributeSpec]),
}

impl AttributePolicy {
    /// Returns the attribute names in `attributes` that this policy rejects.
    pub fn unknown_keys(&self, attributes: &IndexMap<String, Value>) -> Vec<String> {
        match self {
            AttributePolicy::Open => Vec::new(),
            AttributePolicy::Declared(specs) => attributes
                .keys()
                .filter(|key| !specs.iter().any(|spec| spec.name == key.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn allows(&self, name: &str) -> bool {
        match self {
            AttributePolicy::Open => true,
            AttributePolicy::Declared(specs) => specs.iter().any(|spec| spec.name == name),
        }
    }
}

/// One declared attribute: its name and, optionally, the kind nested raw
/// input should be decoded into.
#[derive(Debug)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub element_type: Option<ElementType>,
}

/// How a record kind participates in comparison.
#[derive(Debug, Clone, Copy)]
pub enum CompareMode {
    /// The record contributes wholly to "common" or wholly to the two
    /// "only in" partitions, based on structural equality.
    Atomic,
    /// The record is decomposed attribute by attribute: scalars split on
    /// equality, collections delegate to the collection diff. Any attribute
    /// outside these two lists is a comparison error.
    Composite {
        scalars: &'static [&'static str],
        collections: &'static [&'static str],
    },
}

/// Schema of a record kind.
#[derive(Debug)]
pub struct RecordSchema {
    pub kind: &'static str,
    pub attributes: AttributePolicy,
    pub compare: CompareMode,
}

impl RecordSchema {
    pub fn element_type_of(&self, name: &str) -> Option<ElementType> {
        match self.attributes {
            AttributePolicy::Open => None,
            AttributePolicy::Declared(specs) => specs
                .iter()
                .find(|spec| spec.name == name)
                .and_then(|spec| spec.element_type),
        }
    }
}

/// Schema of a collection kind.
#[derive(Debug)]
pub struct CollectionSchema {
    pub kind: &'static str,
    pub attributes: AttributePolicy,
    /// Evaluated in order against the collection's own attributes; the first
    /// matching rule decides the element kind. No match falls back to the
    /// generic detector.
    pub element_rules: &'static [ElementRule],
}

impl CollectionSchema {
    pub fn element_type_for(&self, attributes: &IndexMap<String, Value>) -> Option<ElementType> {
        self.element_rules
            .iter()
            .find(|rule| rule.when.evaluate(attributes))
            .map(|rule| rule.element_type)
    }
}

/// One element-decode rule: a predicate over the collection's own attributes
/// and the kind to decode elements into when it matches.
#[derive(Debug)]
pub struct ElementRule {
    pub when: RulePredicate,
    pub element_type: ElementType,
}

/// Tagged dispatch over a collection's own attributes.
#[derive(Debug)]
pub enum RulePredicate {
    Always,
    AttributeEquals(&'static str, &'static str),
}

impl RulePredicate {
    pub fn evaluate(&self, attributes: &IndexMap<String, Value>) -> bool {
        match self {
            RulePredicate::Always => true,
            RulePredicate::AttributeEquals(name, expected) => {
                matches!(attributes.get(*name), Some(Value::String(s)) if s == expected)
            }
        }
    }
}

/// Generic record kind produced by the detector for undeclared raw maps.
pub static GENERIC_RECORD: RecordSchema = RecordSchema {
    kind: "record",
    attributes: AttributePolicy::Open,
    compare: CompareMode::Atomic,
};

/// Generic collection kind produced by the detector for undeclared raw arrays
/// and `_elements`-tagged maps. Accepts arbitrary attributes so that older
/// documents always decode.
pub static GENERIC_COLLECTION: CollectionSchema = CollectionSchema {
    kind: "collection",
    attributes: AttributePolicy::Open,
    element_rules: &[],
};

/// Decodes a raw JSON value, coercing into `expected` when declared and
/// falling back to the generic detector otherwise.
pub fn decode_value(
    raw: &serde_json::Value,
    expected: Option<ElementType>,
) -> Result<Value, ModelError> {
    match expected {
        Some(ElementType::Record(schema)) => Ok(Value::Record(Record::from_raw(schema, raw)?)),
        Some(ElementType::Collection(schema)) => {
            Ok(Value::Collection(Collection::from_raw(schema, raw)?))
        }
        None => decode_generic(raw),
    }
}

fn decode_generic(raw: &serde_json::Value) -> Result<Value, ModelError> {
    match raw {
        serde_json::Value::Object(map) if map.contains_key(ELEMENTS_KEY) => Ok(Value::Collection(
            Collection::from_raw(&GENERIC_COLLECTION, raw)?,
        )),
        serde_json::Value::Object(_) => Ok(Value::Record(Record::from_raw(&GENERIC_RECORD, raw)?)),
        serde_json::Value::Array(_) => Ok(Value::Collection(Collection::from_raw(
            &GENERIC_COLLECTION,
            raw,
        )?)),
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => Ok(Value::Number(n.clone())),
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
    }
}

/// Describes a raw JSON value's shape for error messages.
pub fn raw_type_name(raw: &serde_json::Value) -> &'static str {
    match raw {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
