//! Structural comparison of system description values.
//!
//! Comparing two values of the same kind partitions them into four subsets:
//! "only in A", "only in B", "changed" and "common". Each partition is an
//! `Option<Value>`; `None` is the explicit absent marker produced by the
//! collapse rule. Inputs are never mutated; partitions are fresh containers.
//!
//! The base algorithms never populate "changed": the collection diff treats
//! any difference as one removal plus one addition. The independent
//! [`extract_changed_pairs`] helper pairs elements by a stable identity key
//! and is used by presentation code to show before/after values; it is not
//! part of the diff itself.
//!
//! # Examples
//!
//! ```
//! use sysdiff::scopes::PACKAGES;
//! use sysdiff::{compare_values, Collection, Value};
//! use serde_json::json;
//!
//! let a = Collection::from_raw(&PACKAGES, &json!([{"name": "bash", "version": "4.3"}])).unwrap();
//! let b = Collection::from_raw(&PACKAGES, &json!([{"name": "bash", "version": "4.4"}])).unwrap();
//!
//! let result = compare_values(&Value::Collection(a), &Value::Collection(b)).unwrap();
//! assert!(result.only_in_a.is_some());
//! assert!(result.only_in_b.is_some());
//! assert!(result.common.is_none());
//! assert!(result.changed.is_none());
//! ```

use crate::collection::Collection;
use crate::description::SystemDescription;
use crate::error::CompareError;
use crate::record::Record;
use crate::schema::CompareMode;
use crate::value::Value;

/// The 4-way partition produced by a comparison. Absent partitions are
/// `None`, never empty containers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    pub only_in_a: Option<Value>,
    pub only_in_b: Option<Value>,
    pub changed: Option<Value>,
    pub common: Option<Value>,
}

impl Comparison {
    /// True when nothing differs: both inputs were equal (or both absent).
    pub fn is_unchanged(&self) -> bool {
        self.only_in_a.is_none() && self.only_in_b.is_none() && self.changed.is_none()
    }

    /// Encodes the present partitions as a JSON object.
    pub fn to_raw(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        if let Some(value) = &self.only_in_a {
            map.insert("only_in_a".to_string(), value.to_raw());
        }
        if let Some(value) = &self.only_in_b {
            map.insert("only_in_b".to_string(), value.to_raw());
        }
        if let Some(value) = &self.changed {
            map.insert("changed".to_string(), value.to_raw());
        }
        if let Some(value) = &self.common {
            map.insert("common".to_string(), value.to_raw());
        }
        serde_json::Value::Object(map)
    }
}

/// Compares two values of matching kind.
///
/// Collections run the 4-way partition algorithm; records compare atomically
/// unless their kind declares the composite mode, in which case they are
/// decomposed attribute by attribute. Primitives compare atomically.
///
/// # Errors
///
/// Returns [`CompareError::KindMismatch`] when asked to compare a record
/// with a collection or two collections of different kinds, and
/// [`CompareError::UnknownAttribute`] when a composite record carries an
/// attribute its comparison lists do not cover.
pub fn compare_values(a: &Value, b: &Value) -> Result<Comparison, CompareError> {
    match (a, b) {
        (Value::Collection(left), Value::Collection(right)) => left.compare_with(right),
        (Value::Record(left), Value::Record(right)) => {
            if left.kind() == right.kind() {
                if let CompareMode::Composite {
                    scalars,
                    collections,
                } = left.schema().compare
                {
                    return compare_composite(left, right, scalars, collections);
                }
            }
            Ok(left.compare_with(right))
        }
        (Value::Record(_), Value::Collection(_)) | (Value::Collection(_), Value::Record(_)) => {
            Err(CompareError::KindMismatch {
                left: a.type_name().to_string(),
                right: b.type_name().to_string(),
            })
        }
        _ => {
            if a == b {
                Ok(Comparison {
                    common: Some(a.clone()),
                    ..Comparison::default()
                })
            } else {
                Ok(Comparison {
                    only_in_a: Some(a.clone()),
                    only_in_b: Some(b.clone()),
                    ..Comparison::default()
                })
            }
        }
    }
}

/// Composite record comparison: scalars split on equality, collection
/// attributes delegate to the collection diff and merge partition-wise.
///
/// Every attribute present on either side must appear in the schema's
/// comparison lists; anything else means a newly added attribute was not
/// taught to the diff logic and is a hard error rather than silent loss.
fn compare_composite(
    a: &Record,
    b: &Record,
    scalars: &[&str],
    collections: &[&str],
) -> Result<Comparison, CompareError> {
    for name in a.attribute_names().chain(b.attribute_names()) {
        if !scalars.contains(&name) && !collections.contains(&name) {
            return Err(CompareError::UnknownAttribute {
                kind: a.kind().to_string(),
                name: name.to_string(),
            });
        }
    }

    let mut only_in_a = Record::new(a.schema());
    let mut only_in_b = Record::new(b.schema());
    let mut changed = Record::new(a.schema());
    let mut common = Record::new(a.schema());

    for &name in scalars {
        match (a.get(name), b.get(name)) {
            (Some(left), Some(right)) if left == right => common.set(name, left.clone())?,
            (Some(left), Some(right)) => {
                only_in_a.set(name, left.clone())?;
                only_in_b.set(name, right.clone())?;
            }
            (Some(left), None) => only_in_a.set(name, left.clone())?,
            (None, Some(right)) => only_in_b.set(name, right.clone())?,
            (None, None) => {}
        }
    }

    for &name in collections {
        match (a.get(name), b.get(name)) {
            (Some(left), Some(right)) => {
                let sub = compare_values(left, right)?;
                if let Some(value) = sub.only_in_a {
                    only_in_a.set(name, value)?;
                }
                if let Some(value) = sub.only_in_b {
                    only_in_b.set(name, value)?;
                }
                if let Some(value) = sub.changed {
                    changed.set(name, value)?;
                }
                if let Some(value) = sub.common {
                    common.set(name, value)?;
                }
            }
            (Some(left), None) => only_in_a.set(name, left.clone())?,
            (None, Some(right)) => only_in_b.set(name, right.clone())?,
            (None, None) => {}
        }
    }

    Ok(Comparison {
        only_in_a: collapse(only_in_a),
        only_in_b: collapse(only_in_b),
        changed: collapse(changed),
        common: collapse(common),
    })
}

fn collapse(record: Record) -> Option<Value> {
    if record.is_empty() {
        None
    } else {
        Some(Value::Record(record))
    }
}

/// The comparison of one named scope across two descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeComparison {
    pub scope: String,
    pub name_a: String,
    pub name_b: String,
    pub result: Comparison,
}

impl ScopeComparison {
    pub fn has_differences(&self) -> bool {
        !self.result.is_unchanged()
    }

    pub fn to_raw(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "scope".to_string(),
            serde_json::Value::String(self.scope.clone()),
        );
        map.insert(
            "name_a".to_string(),
            serde_json::Value::String(self.name_a.clone()),
        );
        map.insert(
            "name_b".to_string(),
            serde_json::Value::String(self.name_b.clone()),
        );
        if let serde_json::Value::Object(partitions) = self.result.to_raw() {
            for (key, value) in partitions {
                map.insert(key, value);
            }
        }
        serde_json::Value::Object(map)
    }
}

/// Compares one named scope of two whole descriptions.
///
/// A scope present in only one document lands wholly in that document's
/// partition; present in both, the comparison delegates to the scope value's
/// own algorithm.
pub fn compare_scope(
    a: &SystemDescription,
    b: &SystemDescription,
    scope: &str,
) -> Result<ScopeComparison, CompareError> {
    let result = match (a.scope(scope), b.scope(scope)) {
        (Some(left), Some(right)) => compare_values(left, right)?,
        (Some(left), None) => Comparison {
            only_in_a: Some(left.clone()),
            ..Comparison::default()
        },
        (None, Some(right)) => Comparison {
            only_in_b: Some(right.clone()),
            ..Comparison::default()
        },
        (None, None) => Comparison::default(),
    };

    Ok(ScopeComparison {
        scope: scope.to_string(),
        name_a: a.name().to_string(),
        name_b: b.name().to_string(),
        result,
    })
}

/// Pairs elements of two collections that share a stable identity key.
///
/// For every key value present on both sides, the first matching element is
/// taken from each collection, all elements with that key are removed from
/// both inputs, and the (from-A, from-B) pair is returned. Elements without
/// the key attribute are left in place.
///
/// This is presentation logic for showing before/after values of updated
/// entries. The collection diff itself never calls it, so its notion of
/// "changed" differs from the engine's always-absent partition.
pub fn extract_changed_pairs(
    a: &mut Collection,
    b: &mut Collection,
    key: &str,
) -> Vec<(Value, Value)> {
    let a_elements = a.take_elements();
    let mut b_elements = b.take_elements();

    let mut pairs = Vec::new();
    let mut remaining_a = Vec::new();
    let mut paired_keys: Vec<Value> = Vec::new();

    for element in a_elements {
        let key_value = element
            .as_record()
            .and_then(|record| record.get(key))
            .cloned();

        let key_value = match key_value {
            Some(value) => value,
            None => {
                remaining_a.push(element);
                continue;
            }
        };

        if paired_keys.contains(&key_value) {
            continue;
        }

        let matched = b_elements.iter().position(|candidate| {
            candidate.as_record().and_then(|record| record.get(key)) == Some(&key_value)
        });

        match matched {
            Some(index) => {
                let from_b = b_elements.remove(index);
                b_elements.retain(|candidate| {
                    candidate.as_record().and_then(|record| record.get(key)) != Some(&key_value)
                });
                pairs.push((element, from_b));
                paired_keys.push(key_value);
            }
            None => remaining_a.push(element),
        }
    }

    a.set_elements(remaining_a);
    b.set_elements(b_elements);
    pairs
}
