//! Configuration module for persisted filter definitions
//!
//! This module loads the named filters of a data definition from JSON text
//! or from Python dicts/objects, and converts filter arrays across the
//! Python boundary.

mod definition;

pub use definition::*;

use crate::collection::{ElementRef, RowCollection};
use crate::error::{FilterError, Result};
use log::debug;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use serde_json::Value;

/// Helper to get attribute from either dict or object
fn get_attr<'py>(obj: &Bound<'py, PyAny>, name: &str) -> PyResult<Bound<'py, PyAny>> {
    if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name)?
            .ok_or_else(|| pyo3::exceptions::PyKeyError::new_err(name.to_string()))
    } else {
        obj.getattr(name)
    }
}

/// Helper to get optional attribute from either dict or object
fn get_attr_opt<'py>(obj: &Bound<'py, PyAny>, name: &str) -> Option<Bound<'py, PyAny>> {
    if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name).ok().flatten()
    } else {
        obj.getattr(name).ok()
    }
}

/// Convert a Python list/dict structure into a JSON value
pub fn py_to_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    let json = obj.py().import("json")?;
    let text: String = json.call_method1("dumps", (obj,))?.extract()?;
    serde_json::from_str(&text).map_err(|e| FilterError::from(e).into())
}

/// Convert a JSON value into Python lists/dicts/scalars
pub fn value_to_py(py: Python<'_>, value: &Value) -> PyResult<Py<PyAny>> {
    let text = serde_json::to_string(value).map_err(FilterError::from)?;
    let json = py.import("json")?;
    Ok(json.call_method1("loads", (text,))?.unbind())
}

/// Parse a JSON list of filter definitions, validating each one
///
/// Expected format: `[{"name": ..., "root": bool, "filter": [Node, ...]}, ...]`
pub fn load_definitions(json: &str) -> Result<RowCollection<FilterDefinition>> {
    let definitions: Vec<FilterDefinition> = serde_json::from_str(json)?;
    collect_definitions(definitions)
}

fn collect_definitions(
    definitions: Vec<FilterDefinition>,
) -> Result<RowCollection<FilterDefinition>> {
    let mut rows = RowCollection::new();
    for definition in definitions {
        definition.build()?;
        if rows.contains(ElementRef::Name(&definition.name))? {
            return Err(FilterError::InvalidArgument(format!(
                "duplicate filter definition '{}'",
                definition.name
            )));
        }
        rows.add(definition, None);
    }
    debug!("Loaded {} filter definitions", rows.count());
    Ok(rows)
}

/// Deserialize filter definitions from a Python list of dicts or objects
pub fn deserialize_definitions(
    list: &Bound<'_, PyList>,
) -> PyResult<RowCollection<FilterDefinition>> {
    let mut definitions = Vec::with_capacity(list.len());
    for item in list.iter() {
        definitions.push(extract_definition(&item)?);
    }
    Ok(collect_definitions(definitions)?)
}

fn extract_definition(obj: &Bound<'_, PyAny>) -> PyResult<FilterDefinition> {
    let name: String = get_attr(obj, "name")?.extract()?;
    // Support "root", "is_root" and "isRoot" field names
    let root: bool = get_attr_opt(obj, "root")
        .or_else(|| get_attr_opt(obj, "is_root"))
        .or_else(|| get_attr_opt(obj, "isRoot"))
        .and_then(|v| v.extract().ok())
        .unwrap_or(false);

    let filter = match get_attr_opt(obj, "filter") {
        Some(filter_obj) if !filter_obj.is_none() => py_to_value(&filter_obj)?,
        _ => Value::Array(Vec::new()),
    };

    Ok(FilterDefinition { name, root, filter })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Composite, FilterBuilder, FilterNode};
    use serde_json::json;

    #[test]
    fn test_load_definitions() {
        let text = json!([
            {"name": "adults", "root": true, "filter": [
                {"operation": ">", "property": "age", "value": 17}
            ]},
            {"name": "by_parent", "isRoot": false, "filter": [
                {"operation": "=", "property": "pid", "value": 5}
            ]},
            {"name": "everything"}
        ])
        .to_string();

        let rows = load_definitions(&text).unwrap();
        assert_eq!(rows.names(), vec!["adults", "by_parent", "everything"]);

        let adults = rows.get(ElementRef::Name("adults")).unwrap().build().unwrap();
        assert!(adults.is_root_filter());
        assert_eq!(adults.filter().child_count(), 1);

        let everything = rows.get(ElementRef::Index(2)).unwrap().build().unwrap();
        assert!(!everything.is_root_filter());
        assert!(everything.filter().is_empty());
    }

    #[test]
    fn test_invalid_definition_rejected() {
        let text = json!([
            {"name": "broken", "filter": [{"operation": "XOR", "children": []}]}
        ])
        .to_string();
        let err = load_definitions(&text).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterOperation(_)));

        let err = load_definitions(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, FilterError::DeserializationError(_)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let text = json!([{"name": "a"}, {"name": "a"}]).to_string();
        let err = load_definitions(&text).unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(_)));
    }

    #[test]
    fn test_definition_from_builder() {
        let mut builder = FilterBuilder::empty(true);
        builder.add_condition(FilterNode::like("name", "A%"));
        let definition = FilterDefinition::from_builder("starts_with_a", &builder);
        assert!(definition.root);
        assert_eq!(
            definition.filter,
            json!([{"operation": "LIKE", "property": "name", "value": "A%"}])
        );
        assert_eq!(definition.build().unwrap(), builder);
    }
}
