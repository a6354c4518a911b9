// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data records and the per-datum values resolved from them.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use hashbrown::HashMap;

/// An opaque data record bound to a mark.
///
/// Records may be scalars (`3`), tuples (`[x, y]`) or objects (`{"x": 1}`); channels decide how
/// to read them.
pub type Datum = serde_json::Value;

/// A dataset bound to one or more marks.
///
/// Two marks share data when they hold the same allocation (see [`same_data`]).
pub type Data = Arc<[Datum]>;

/// Builds a dataset from records.
pub fn data(records: impl IntoIterator<Item = Datum>) -> Data {
    records.into_iter().collect()
}

/// Returns `true` if both datasets are the same allocation.
pub fn same_data(a: &Data, b: &Data) -> bool {
    Arc::ptr_eq(a, b)
}

/// A value read from a datum for one channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Missing, `null`, or not representable as a scalar.
    #[default]
    Undefined,
    /// A number (may be `NaN`, which counts as undefined).
    Number(f64),
    /// A string.
    Text(Arc<str>),
    /// A boolean.
    Bool(bool),
}

impl Value {
    /// Converts a JSON scalar into a value; `null`, arrays and objects become `Undefined`.
    pub fn from_json(json: &Datum) -> Self {
        match json {
            Datum::Number(n) => n.as_f64().map_or(Self::Undefined, Self::Number),
            Datum::String(s) => Self::Text(Arc::from(s.as_str())),
            Datum::Bool(b) => Self::Bool(*b),
            Datum::Null | Datum::Array(_) | Datum::Object(_) => Self::Undefined,
        }
    }

    /// Numeric view of this value (booleans as `0`/`1`); `NaN` for everything else.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Undefined | Self::Text(_) => f64::NAN,
        }
    }

    /// Returns the string if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for numbers and booleans.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Bool(_))
    }

    /// The grouping key for this value.
    pub fn key(&self) -> GroupKey {
        match self {
            Self::Undefined => GroupKey::Undefined,
            Self::Number(n) => GroupKey::Number(number_bits(*n)),
            Self::Text(s) => GroupKey::Text(s.clone()),
            Self::Bool(b) => GroupKey::Bool(*b),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(Arc::from(value))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => Ok(()),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A hashable identity for a [`Value`] with SameValueZero semantics.
///
/// `NaN` equals `NaN` and `-0` equals `0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Key for [`Value::Undefined`].
    Undefined,
    /// Normalized bit pattern of a number.
    Number(u64),
    /// Key for a string.
    Text(Arc<str>),
    /// Key for a boolean.
    Bool(bool),
}

fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0_f64.to_bits()
    } else {
        n.to_bits()
    }
}

/// Returns `true` unless the value is undefined or `NaN`.
pub fn defined(value: &Value) -> bool {
    match value {
        Value::Undefined => false,
        Value::Number(n) => !n.is_nan(),
        Value::Text(_) | Value::Bool(_) => true,
    }
}

/// Returns `true` for finite numbers greater than zero.
pub fn positive(value: &Value) -> bool {
    let n = match value {
        Value::Number(n) => *n,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Undefined | Value::Text(_) => return false,
    };
    n > 0.0 && n.is_finite()
}

/// Ascending order for sort keys.
///
/// Numbers (and booleans) come first in numeric order, then strings in lexicographic order;
/// undefined values sort last.
pub fn ascending(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Number(n) if n.is_nan() => 2,
            Value::Number(_) | Value::Bool(_) => 0,
            Value::Text(_) => 1,
            Value::Undefined => 2,
        }
    }
    match (rank(a), rank(b)) {
        (0, 0) => a.as_f64().total_cmp(&b.as_f64()),
        (1, 1) => a.as_str().cmp(&b.as_str()),
        (ra, rb) => ra.cmp(&rb),
    }
}

/// Reads `values[i]`, treating out-of-range positions as undefined.
pub fn value_at(values: &[Value], i: usize) -> &Value {
    static UNDEFINED: Value = Value::Undefined;
    values.get(i).unwrap_or(&UNDEFINED)
}

/// Partitions `index` by the value each position has in `values`.
///
/// Groups appear in the order their key is first seen; positions within a group keep their
/// relative order.
pub fn group_index(index: &[usize], values: &[Value]) -> Vec<(Value, Vec<usize>)> {
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();
    for &i in index {
        let value = value_at(values, i);
        let slot = *slots.entry(value.key()).or_insert_with(|| {
            groups.push((value.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(i);
    }
    groups
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use serde_json::json;

    use super::*;

    #[test]
    fn json_scalars_convert_and_containers_are_undefined() {
        assert_eq!(Value::from_json(&json!(2.5)), Value::Number(2.5));
        assert_eq!(Value::from_json(&json!("a")), Value::from("a"));
        assert_eq!(Value::from_json(&json!(true)), Value::Bool(true));
        assert_eq!(Value::from_json(&json!(null)), Value::Undefined);
        assert_eq!(Value::from_json(&json!([1, 2])), Value::Undefined);
    }

    #[test]
    fn nan_and_undefined_are_not_defined() {
        assert!(!defined(&Value::Undefined));
        assert!(!defined(&Value::Number(f64::NAN)));
        assert!(defined(&Value::Number(0.0)));
        assert!(defined(&Value::from("")));
    }

    #[test]
    fn positive_rejects_zero_and_infinity() {
        assert!(positive(&Value::Number(0.5)));
        assert!(!positive(&Value::Number(0.0)));
        assert!(!positive(&Value::Number(-1.0)));
        assert!(!positive(&Value::Number(f64::INFINITY)));
        assert!(!positive(&Value::from("3")));
    }

    #[test]
    fn ascending_puts_undefined_last() {
        let mut values = vec![
            Value::from("b"),
            Value::Undefined,
            Value::Number(2.0),
            Value::from("a"),
            Value::Number(-1.0),
        ];
        values.sort_by(ascending);
        assert_eq!(
            values,
            vec![
                Value::Number(-1.0),
                Value::Number(2.0),
                Value::from("a"),
                Value::from("b"),
                Value::Undefined,
            ]
        );
    }

    #[test]
    fn groups_follow_first_seen_order() {
        let values = vec![
            Value::from("b"),
            Value::from("a"),
            Value::from("b"),
            Value::Number(f64::NAN),
            Value::Number(f64::NAN),
        ];
        let groups = group_index(&[0, 1, 2, 3, 4], &values);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, Value::from("b"));
        assert_eq!(groups[0].1, vec![0, 2]);
        assert_eq!(groups[1].1, vec![1]);
        assert_eq!(groups[2].1, vec![3, 4], "NaN keys group together");
    }

    #[test]
    fn negative_zero_groups_with_zero() {
        let values = vec![Value::Number(0.0), Value::Number(-0.0)];
        assert_eq!(group_index(&[0, 1], &values).len(), 1);
    }
}
