//! Scalar values carried by leaf predicates

use serde_json::{Number, Value};
use std::fmt;

/// Scalar comparison value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`
    UInt(u64),
    Float(f64),
    String(String),
}

impl FilterValue {
    /// Convert a JSON value; arrays and maps are not scalars and yield `None`
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(FilterValue::Null),
            Value::Bool(b) => Some(FilterValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(FilterValue::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Some(FilterValue::UInt(u))
                } else {
                    n.as_f64().map(FilterValue::Float)
                }
            }
            Value::String(s) => Some(FilterValue::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// JSON form of this scalar; non-finite floats serialize as null
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Null => Value::Null,
            FilterValue::Bool(b) => Value::Bool(*b),
            FilterValue::Integer(i) => Value::Number(Number::from(*i)),
            FilterValue::UInt(u) => Value::Number(Number::from(*u)),
            FilterValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            FilterValue::String(s) => Value::String(s.clone()),
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Null => f.write_str("null"),
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Integer(i) => write!(f, "{}", i),
            FilterValue::UInt(u) => write!(f, "{}", u),
            FilterValue::Float(v) => write!(f, "{}", v),
            FilterValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(value as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(FilterValue::UInt(value), FilterValue::Integer)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_convert() {
        assert_eq!(FilterValue::from_json(&json!(5)), Some(FilterValue::Integer(5)));
        assert_eq!(FilterValue::from_json(&json!(-2.5)), Some(FilterValue::Float(-2.5)));
        assert_eq!(FilterValue::from_json(&json!("A%")), Some(FilterValue::from("A%")));
        assert_eq!(FilterValue::from_json(&json!(true)), Some(FilterValue::Bool(true)));
        assert_eq!(FilterValue::from_json(&Value::Null), Some(FilterValue::Null));
    }

    #[test]
    fn test_containers_rejected() {
        assert_eq!(FilterValue::from_json(&json!([1, 2])), None);
        assert_eq!(FilterValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_json_output_matches_input() {
        for v in [json!(5), json!(-7), json!(1.25), json!("x"), json!(false), Value::Null] {
            let scalar = FilterValue::from_json(&v).unwrap();
            assert_eq!(scalar.to_json(), v);
        }
    }

    #[test]
    fn test_large_numbers_keep_exact_form() {
        let max = json!(u64::MAX);
        assert_eq!(FilterValue::from_json(&max), Some(FilterValue::UInt(u64::MAX)));
        assert_eq!(FilterValue::from_json(&max).unwrap().to_json(), max);

        let just_above = json!(i64::MAX as u64 + 1);
        assert_eq!(FilterValue::from_json(&just_above).unwrap().to_json(), just_above);

        for v in [json!(f64::MAX), json!(f64::MIN_POSITIVE), json!(1e300), json!(-1e-300)] {
            assert_eq!(FilterValue::from_json(&v).unwrap().to_json(), v);
        }
    }

    #[test]
    fn test_u64_conversion_prefers_integer() {
        assert_eq!(FilterValue::from(7u64), FilterValue::Integer(7));
        assert_eq!(FilterValue::from(u64::MAX), FilterValue::UInt(u64::MAX));
    }

    #[test]
    fn test_nan_serializes_as_null() {
        assert_eq!(FilterValue::Float(f64::NAN).to_json(), Value::Null);
    }
}
