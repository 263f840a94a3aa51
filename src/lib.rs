//! Filter Expression Core - composable boolean filter-expression builder
//!
//! This crate builds, validates and (de)serializes AND/OR filter trees over
//! property predicates, in the nested-array form consumed by downstream
//! query executors. Python bindings are provided via PyO3.

use pyo3::prelude::*;

pub mod collection;
pub mod config;
pub mod error;
pub mod filter;

use crate::filter::{cache, PyFilterBuilder, VALID_OPERATIONS};
use pyo3::types::PyList;

// ============================================================================
// Python Functions
// ============================================================================

/// Check whether `operation` is one of the valid operation tokens
#[pyfunction]
fn is_valid_operation(operation: &str) -> bool {
    filter::is_valid_operation(operation)
}

/// List the valid operation tokens
#[pyfunction]
fn valid_operations() -> Vec<&'static str> {
    VALID_OPERATIONS.to_vec()
}

/// Parse a filter from JSON text, reusing the parsed tree for repeated texts
///
/// # Arguments
/// * `json` - JSON text of a filter array
/// * `is_root` - Whether the filter is a top-level query filter
///
/// # Raises
/// ValueError on malformed JSON or filter content
#[pyfunction]
#[pyo3(signature = (json, is_root=false))]
fn parse_cached(json: &str, is_root: bool) -> PyResult<PyFilterBuilder> {
    Ok(PyFilterBuilder::from_builder(cache::get_or_parse(json, is_root)?))
}

/// Load named filter definitions
///
/// # Arguments
/// * `source` - JSON text or a list of dicts/objects with `name`, `root`
///   and `filter` fields
///
/// # Returns
/// A list of `(name, FilterBuilder)` pairs in definition order
///
/// # Example (Python)
/// ```python
/// for name, builder in load_definitions([{"name": "adults", "filter": [...]}]):
///     print(name, builder.get_all_as_array())
/// ```
#[pyfunction]
fn load_definitions(source: &Bound<'_, PyAny>) -> PyResult<Vec<(String, PyFilterBuilder)>> {
    let rows = if let Ok(text) = source.extract::<String>() {
        config::load_definitions(&text)?
    } else {
        let list = source.downcast::<PyList>()?;
        config::deserialize_definitions(list)?
    };

    let mut out = Vec::with_capacity(rows.count());
    for definition in &rows {
        let builder = definition.build()?;
        out.push((definition.name.clone(), PyFilterBuilder::from_builder(builder)));
    }
    Ok(out)
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn filter_expr_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(is_valid_operation, m)?)?;
    m.add_function(wrap_pyfunction!(valid_operations, m)?)?;
    m.add_function(wrap_pyfunction!(parse_cached, m)?)?;
    m.add_function(wrap_pyfunction!(load_definitions, m)?)?;
    m.add_class::<PyFilterBuilder>()?;
    Ok(())
}
