//! Leaf predicate builders
//!
//! Each leaf holds one concrete comparison against a named property.
//! Binary comparisons (`=`, `>`, `<`) carry a single scalar, `IN` carries
//! a value set and `LIKE` an opaque pattern string.

use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::error::{FilterError, Result};
use crate::filter::operation::Operation;
use crate::filter::value::FilterValue;

pub(crate) const KEY_OPERATION: &str = "operation";
pub(crate) const KEY_CHILDREN: &str = "children";
pub(crate) const KEY_PROPERTY: &str = "property";
pub(crate) const KEY_VALUE: &str = "value";
pub(crate) const KEY_VALUES: &str = "values";

/// Inline capacity for IN value sets
pub type ValueSet = SmallVec<[FilterValue; 4]>;

pub(crate) fn shape_error(op: Operation, detail: impl AsRef<str>) -> FilterError {
    FilterError::InvalidFilterShape(format!("'{}' node {}", op, detail.as_ref()))
}

/// Fail if `map` carries any of `keys`
pub(crate) fn reject_keys(map: &Map<String, Value>, op: Operation, keys: &[&str]) -> Result<()> {
    match keys.iter().find(|key| map.contains_key(**key)) {
        Some(key) => Err(shape_error(op, format!("must not contain '{}'", key))),
        None => Ok(()),
    }
}

fn required_property(map: &Map<String, Value>, op: Operation) -> Result<String> {
    match map.get(KEY_PROPERTY) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(shape_error(op, "requires 'property' to be a string")),
        None => Err(shape_error(op, "is missing 'property'")),
    }
}

fn required_scalar(map: &Map<String, Value>, op: Operation) -> Result<FilterValue> {
    let raw = map
        .get(KEY_VALUE)
        .ok_or_else(|| shape_error(op, "is missing 'value'"))?;
    FilterValue::from_json(raw).ok_or_else(|| shape_error(op, "requires 'value' to be a scalar"))
}

fn leaf_map(op: Operation, property: &str) -> Map<String, Value> {
    let mut map = Map::with_capacity(3);
    map.insert(KEY_OPERATION.to_string(), Value::String(op.as_str().to_string()));
    map.insert(KEY_PROPERTY.to_string(), Value::String(property.to_string()));
    map
}

macro_rules! comparison_predicate {
    ($(#[$meta:meta])* $name:ident => $op:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            property: String,
            value: FilterValue,
        }

        impl $name {
            pub const OPERATION: Operation = $op;

            pub fn new(property: impl Into<String>, value: impl Into<FilterValue>) -> Self {
                Self {
                    property: property.into(),
                    value: value.into(),
                }
            }

            pub fn set_property(&mut self, property: impl Into<String>) -> &mut Self {
                self.property = property.into();
                self
            }

            pub fn set_value(&mut self, value: impl Into<FilterValue>) -> &mut Self {
                self.value = value.into();
                self
            }

            #[inline]
            pub fn property(&self) -> &str {
                &self.property
            }

            #[inline]
            pub fn value(&self) -> &FilterValue {
                &self.value
            }

            pub fn to_map(&self) -> Map<String, Value> {
                let mut map = leaf_map(Self::OPERATION, &self.property);
                map.insert(KEY_VALUE.to_string(), self.value.to_json());
                map
            }

            pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
                reject_keys(map, Self::OPERATION, &[KEY_CHILDREN, KEY_VALUES])?;
                Ok(Self {
                    property: required_property(map, Self::OPERATION)?,
                    value: required_scalar(map, Self::OPERATION)?,
                })
            }
        }
    };
}

comparison_predicate!(
    /// `property = value`
    PropertyEquals => Operation::Equals
);

comparison_predicate!(
    /// `property > value`
    PropertyGreaterThan => Operation::GreaterThan
);

comparison_predicate!(
    /// `property < value`
    PropertyLessThan => Operation::LessThan
);

/// `property IN (values...)`
///
/// An empty set is kept as-is and serializes to an empty `values` list.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValueIn {
    property: String,
    values: ValueSet,
}

impl PropertyValueIn {
    pub const OPERATION: Operation = Operation::ValueIn;

    pub fn new<I, V>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn set_property(&mut self, property: impl Into<String>) -> &mut Self {
        self.property = property.into();
        self
    }

    pub fn set_values<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_value(&mut self, value: impl Into<FilterValue>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    #[inline]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[inline]
    pub fn values(&self) -> &[FilterValue] {
        &self.values
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = leaf_map(Self::OPERATION, &self.property);
        let values = self.values.iter().map(FilterValue::to_json).collect();
        map.insert(KEY_VALUES.to_string(), Value::Array(values));
        map
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        reject_keys(map, Self::OPERATION, &[KEY_CHILDREN, KEY_VALUE])?;
        let property = required_property(map, Self::OPERATION)?;
        let raw = match map.get(KEY_VALUES) {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(shape_error(Self::OPERATION, "requires 'values' to be a list")),
            None => return Err(shape_error(Self::OPERATION, "is missing 'values'")),
        };
        let values = raw
            .iter()
            .map(|item| {
                FilterValue::from_json(item)
                    .ok_or_else(|| shape_error(Self::OPERATION, "requires every entry of 'values' to be a scalar"))
            })
            .collect::<Result<ValueSet>>()?;
        Ok(Self { property, values })
    }
}

/// `property LIKE pattern`
///
/// The pattern is passed through untouched; wildcard semantics belong to
/// whatever executes the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValueLike {
    property: String,
    value: String,
}

impl PropertyValueLike {
    pub const OPERATION: Operation = Operation::ValueLike;

    pub fn new(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: pattern.into(),
        }
    }

    pub fn set_property(&mut self, property: impl Into<String>) -> &mut Self {
        self.property = property.into();
        self
    }

    pub fn set_value(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.value = pattern.into();
        self
    }

    #[inline]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = leaf_map(Self::OPERATION, &self.property);
        map.insert(KEY_VALUE.to_string(), Value::String(self.value.clone()));
        map
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        reject_keys(map, Self::OPERATION, &[KEY_CHILDREN, KEY_VALUES])?;
        let property = required_property(map, Self::OPERATION)?;
        let value = match map.get(KEY_VALUE) {
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(shape_error(Self::OPERATION, "requires 'value' to be a string")),
            None => return Err(shape_error(Self::OPERATION, "is missing 'value'")),
        };
        Ok(Self { property, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected map"),
        }
    }

    #[test]
    fn test_comparison_setters_chain() {
        let mut leaf = PropertyGreaterThan::new("age", 18);
        leaf.set_property("height").set_value(1.8);
        assert_eq!(leaf.property(), "height");
        assert_eq!(leaf.value(), &FilterValue::Float(1.8));
    }

    #[test]
    fn test_equals_to_map() {
        let leaf = PropertyEquals::new("pid", 5);
        assert_eq!(
            Value::Object(leaf.to_map()),
            json!({"operation": "=", "property": "pid", "value": 5})
        );
    }

    #[test]
    fn test_less_than_from_map() {
        let leaf = PropertyLessThan::from_map(&as_map(json!({
            "operation": "<", "property": "price", "value": 9.99
        })))
        .unwrap();
        assert_eq!(leaf.property(), "price");
        assert_eq!(leaf.value(), &FilterValue::Float(9.99));
    }

    #[test]
    fn test_comparison_missing_value() {
        let err = PropertyEquals::from_map(&as_map(json!({"operation": "=", "property": "pid"}))).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterShape(_)));
    }

    #[test]
    fn test_comparison_rejects_container_value() {
        let err = PropertyEquals::from_map(&as_map(json!({
            "operation": "=", "property": "pid", "value": [1, 2]
        })))
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterShape(_)));
    }

    #[test]
    fn test_comparison_rejects_non_string_property() {
        let err = PropertyGreaterThan::from_map(&as_map(json!({
            "operation": ">", "property": 3, "value": 1
        })))
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterShape(_)));
    }

    #[test]
    fn test_leaf_rejects_children_key() {
        let err = PropertyEquals::from_map(&as_map(json!({
            "operation": "=", "property": "pid", "value": 1, "children": []
        })))
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterShape(_)));
    }

    #[test]
    fn test_value_in_round_trip() {
        let input = json!({"operation": "IN", "property": "tag", "values": [1, "two", 3.5]});
        let leaf = PropertyValueIn::from_map(&as_map(input.clone())).unwrap();
        assert_eq!(leaf.values().len(), 3);
        assert_eq!(Value::Object(leaf.to_map()), input);
    }

    #[test]
    fn test_value_in_empty_set() {
        let leaf = PropertyValueIn::new("tag", Vec::<i64>::new());
        assert_eq!(
            Value::Object(leaf.to_map()),
            json!({"operation": "IN", "property": "tag", "values": []})
        );
    }

    #[test]
    fn test_value_in_requires_list() {
        let err = PropertyValueIn::from_map(&as_map(json!({
            "operation": "IN", "property": "tag", "values": 4
        })))
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterShape(_)));

        let err = PropertyValueIn::from_map(&as_map(json!({"operation": "IN", "property": "tag"}))).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterShape(_)));
    }

    #[test]
    fn test_value_in_mutation() {
        let mut leaf = PropertyValueIn::new("id", [1, 2]);
        leaf.add_value(3).set_property("oid");
        assert_eq!(leaf.property(), "oid");
        assert_eq!(
            leaf.values(),
            &[FilterValue::Integer(1), FilterValue::Integer(2), FilterValue::Integer(3)]
        );
        leaf.set_values(["a"]);
        assert_eq!(leaf.values(), &[FilterValue::from("a")]);
    }

    #[test]
    fn test_like_keeps_pattern_opaque() {
        let leaf = PropertyValueLike::new("name", "%_\\%[x]");
        assert_eq!(leaf.value(), "%_\\%[x]");
        let parsed = PropertyValueLike::from_map(&leaf.to_map()).unwrap();
        assert_eq!(parsed, leaf);
    }

    #[test]
    fn test_like_requires_string_value() {
        let err = PropertyValueLike::from_map(&as_map(json!({
            "operation": "LIKE", "property": "name", "value": 7
        })))
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterShape(_)));
    }
}
