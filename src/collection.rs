//! Generic collection type: an ordered element sequence with its own attributes.
//!
//! A [`Collection`] carries two independent namespaces: the element sequence
//! and a small attribute mapping describing the sequence itself (e.g. a file
//! list's `extracted` flag). A collection with zero elements but non-empty
//! attributes is still a meaningful, present value.
//!
//! On the wire a collection is either a bare JSON array (no attributes) or an
//! object `{"_attributes": {...}, "_elements": [...]}`. Decoding accepts both
//! shapes unconditionally for compatibility with older documents.

use crate::comparison::Comparison;
use crate::error::{CompareError, ModelError};
use crate::schema::{decode_value, CollectionSchema, ATTRIBUTES_KEY, ELEMENTS_KEY};
use crate::value::{ScopeRef, Value};
use indexmap::IndexMap;

/// An ordered sequence of values plus the collection's own attribute mapping.
///
/// Equality is structural: same kind, elements equal in order, attribute
/// mappings equal. The scope back-reference never participates.
#[derive(Debug, Clone)]
pub struct Collection {
    schema: &'static CollectionSchema,
    elements: Vec<Value>,
    attributes: IndexMap<String, Value>,
    scope: Option<ScopeRef>,
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.schema.kind == other.schema.kind
            && self.elements == other.elements
            && self.attributes == other.attributes
    }
}

impl Collection {
    /// Creates an empty collection of the given kind.
    pub fn new(schema: &'static CollectionSchema) -> Self {
        Self {
            schema,
            elements: Vec::new(),
            attributes: IndexMap::new(),
            scope: None,
        }
    }

    /// Decodes a collection of the given kind from raw JSON.
    ///
    /// Accepts either a bare array or an `{"_attributes", "_elements"}`
    /// object. Elements are decoded through the kind's ordered rule set,
    /// dispatched on the collection's own attributes, with the generic
    /// detector as fallback.
    ///
    /// # Errors
    ///
    /// Fails with [`ModelError::ExpectedElements`] when `raw` is neither
    /// shape, or [`ModelError::UnknownAttributes`] when the attribute mapping
    /// contains a key outside the kind's allow-list.
    pub fn from_raw(
        schema: &'static CollectionSchema,
        raw: &serde_json::Value,
    ) -> Result<Self, ModelError> {
        let (raw_attributes, raw_elements) = match raw {
            serde_json::Value::Array(elements) => (None, elements),
            serde_json::Value::Object(map) => {
                let elements = map
                    .get(ELEMENTS_KEY)
                    .and_then(|e| e.as_array())
                    .ok_or_else(|| ModelError::expected_elements(schema.kind, raw))?;
                (map.get(ATTRIBUTES_KEY), elements)
            }
            _ => return Err(ModelError::expected_elements(schema.kind, raw)),
        };

        let mut attributes = IndexMap::new();
        if let Some(raw_attributes) = raw_attributes {
            let map = raw_attributes
                .as_object()
                .ok_or_else(|| ModelError::expected_object(schema.kind, raw_attributes))?;
            for (key, value) in map {
                attributes.insert(key.clone(), decode_value(value, None)?);
            }

            let unknown = schema.attributes.unknown_keys(&attributes);
            if !unknown.is_empty() {
                return Err(ModelError::unknown_attributes(schema.kind, &unknown));
            }
        }

        let element_type = schema.element_type_for(&attributes);
        let mut elements = Vec::with_capacity(raw_elements.len());
        for raw_element in raw_elements {
            elements.push(decode_value(raw_element, element_type)?);
        }

        Ok(Self {
            schema,
            elements,
            attributes,
            scope: None,
        })
    }

    pub fn schema(&self) -> &'static CollectionSchema {
        self.schema
    }

    pub fn kind(&self) -> &'static str {
        self.schema.kind
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    pub fn get_attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets one of the collection's own attributes, enforcing the allow-list.
    pub fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), ModelError> {
        if !self.schema.attributes.allows(name) {
            return Err(ModelError::unknown_attributes(
                self.schema.kind,
                &[name.to_string()],
            ));
        }
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// A collection is empty only when it has neither elements nor
    /// attributes. Attributes alone keep it present.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.attributes.is_empty()
    }

    /// Decodes a raw element through the kind's rule set and appends it.
    pub fn push(&mut self, raw: serde_json::Value) -> Result<(), ModelError> {
        let element_type = self.schema.element_type_for(&self.attributes);
        self.elements.push(decode_value(&raw, element_type)?);
        Ok(())
    }

    /// Decodes and appends several raw elements.
    pub fn append<I>(&mut self, raws: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        for raw in raws {
            self.push(raw)?;
        }
        Ok(())
    }

    /// Appends an already-decoded value as-is.
    pub fn push_value(&mut self, value: Value) {
        self.elements.push(value);
    }

    /// Elements of `self` that are not structurally equal to any element of
    /// `other`, preserving order. The result carries no attributes.
    pub fn difference(&self, other: &Collection) -> Collection {
        let elements = self
            .elements
            .iter()
            .filter(|element| !other.elements.contains(element))
            .cloned()
            .collect();
        Collection {
            schema: self.schema,
            elements,
            attributes: IndexMap::new(),
            scope: None,
        }
    }

    /// Elements of `self` that structurally equal some element of `other`,
    /// preserving order. The result carries no attributes.
    pub fn intersection(&self, other: &Collection) -> Collection {
        let elements = self
            .elements
            .iter()
            .filter(|element| other.elements.contains(element))
            .cloned()
            .collect();
        Collection {
            schema: self.schema,
            elements,
            attributes: IndexMap::new(),
            scope: None,
        }
    }

    /// Partitions two collections of the same kind into "only in A",
    /// "only in B", "changed" and "common".
    ///
    /// The base algorithm never pairs up differing versions of "the same"
    /// element, so `changed` is always absent here; see
    /// [`extract_changed_pairs`](crate::comparison::extract_changed_pairs)
    /// for the identity-key pairing used by presentation code.
    ///
    /// Attribute handling: equal attribute mappings attach to the common
    /// result; unequal mappings attach to the respective "only in" results.
    /// Each partition collapses to absent when it ends up with zero elements
    /// and zero attributes.
    ///
    /// # Errors
    ///
    /// Comparing collections of different kinds violates the contract and is
    /// rejected with [`CompareError::KindMismatch`].
    pub fn compare_with(&self, other: &Collection) -> Result<Comparison, CompareError> {
        if self.schema.kind != other.schema.kind {
            return Err(CompareError::KindMismatch {
                left: self.schema.kind.to_string(),
                right: other.schema.kind.to_string(),
            });
        }

        let mut only_in_a = self.difference(other);
        let mut only_in_b = other.difference(self);
        let mut common = self.intersection(other);
        let changed = Collection::new(self.schema);

        if self.attributes == other.attributes {
            common.attributes = self.attributes.clone();
        } else {
            only_in_a.attributes = self.attributes.clone();
            only_in_b.attributes = other.attributes.clone();
        }

        Ok(Comparison {
            only_in_a: collapse(only_in_a),
            only_in_b: collapse(only_in_b),
            changed: collapse(changed),
            common: collapse(common),
        })
    }

    /// Encodes this collection back to raw JSON: a bare array when there are
    /// no attributes, the `{"_attributes", "_elements"}` object otherwise.
    pub fn to_raw(&self) -> serde_json::Value {
        let elements: Vec<serde_json::Value> =
            self.elements.iter().map(|element| element.to_raw()).collect();

        if self.attributes.is_empty() {
            return serde_json::Value::Array(elements);
        }

        let mut attributes = serde_json::Map::with_capacity(self.attributes.len());
        for (key, value) in &self.attributes {
            attributes.insert(key.clone(), value.to_raw());
        }

        let mut map = serde_json::Map::with_capacity(2);
        map.insert(
            ATTRIBUTES_KEY.to_string(),
            serde_json::Value::Object(attributes),
        );
        map.insert(ELEMENTS_KEY.to_string(), serde_json::Value::Array(elements));
        serde_json::Value::Object(map)
    }

    /// Attaches a scope back-reference to this collection and all nested
    /// values. Idempotent; ignored by equality and comparison.
    pub fn attach_scope(&mut self, scope: &ScopeRef) {
        self.scope = Some(scope.clone());
        for element in &mut self.elements {
            element.attach_scope(scope);
        }
        for value in self.attributes.values_mut() {
            value.attach_scope(scope);
        }
    }

    pub fn scope(&self) -> Option<&ScopeRef> {
        self.scope.as_ref()
    }

    pub(crate) fn take_elements(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.elements)
    }

    pub(crate) fn set_elements(&mut self, elements: Vec<Value>) {
        self.elements = elements;
    }
}

/// The collapse rule: an empty result becomes an explicit absent marker, not
/// an empty container.
fn collapse(collection: Collection) -> Option<Value> {
    if collection.is_empty() {
        None
    } else {
        Some(Value::Collection(collection))
    }
}
