//! FilterBuilder exposed across the Python-Rust boundary
//!
//! The tree stays in Rust memory; Python sees lists and dicts only when it
//! asks for the array form.

use pyo3::prelude::*;
use pyo3::types::PyInt;

use crate::config::{py_to_value, value_to_py};
use crate::error::{FilterError, Result};
use crate::filter::builder::FilterBuilder;
use crate::filter::composite::{AndNode, Composite};
use crate::filter::node::FilterNode;

// ============================================================================
// PyFilterBuilder PyClass
// ============================================================================

/// Python handle on a [`FilterBuilder`]
#[pyclass(name = "FilterBuilder")]
pub struct PyFilterBuilder {
    inner: FilterBuilder,
}

impl PyFilterBuilder {
    pub fn from_builder(inner: FilterBuilder) -> Self {
        Self { inner }
    }

    pub fn builder(&self) -> &FilterBuilder {
        &self.inner
    }
}

#[pymethods]
impl PyFilterBuilder {
    /// Create a builder from a list of condition dicts (or nothing)
    #[new]
    #[pyo3(signature = (filter=None, is_root=false))]
    fn py_new(filter: Option<&Bound<'_, PyAny>>, is_root: bool) -> PyResult<Self> {
        let inner = match filter {
            Some(obj) if !obj.is_none() => FilterBuilder::new(&py_to_value(obj)?, is_root)?,
            _ => FilterBuilder::empty(is_root),
        };
        Ok(Self { inner })
    }

    #[staticmethod]
    fn from_array(filter: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(Self::from_builder(FilterBuilder::from_array(&py_to_value(filter)?)?))
    }

    #[staticmethod]
    fn from_array_for_root(filter: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(Self::from_builder(FilterBuilder::from_array_for_root(
            &py_to_value(filter)?,
        )?))
    }

    #[staticmethod]
    #[pyo3(signature = (text, is_root=false))]
    fn from_json(text: &str, is_root: bool) -> PyResult<Self> {
        Ok(Self::from_builder(FilterBuilder::from_json(text, is_root)?))
    }

    fn is_root_filter(&self) -> bool {
        self.inner.is_root_filter()
    }

    /// Raises RuntimeError on a root filter, returns self otherwise
    fn check_not_root(slf: PyRef<'_, Self>) -> PyResult<PyRef<'_, Self>> {
        slf.inner.check_not_root()?;
        Ok(slf)
    }

    /// Raises ValueError on an unknown operation token, returns self otherwise
    fn check_valid_operation<'py>(slf: PyRef<'py, Self>, operation: &str) -> PyResult<PyRef<'py, Self>> {
        slf.inner.check_valid_operation(operation)?;
        Ok(slf)
    }

    /// Top-level conditions as a list of dicts
    fn get_all_as_array(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        value_to_py(py, &self.inner.to_value())
    }

    /// Insert a condition dict into the root; a missing or out-of-range index appends
    #[pyo3(signature = (node, index=None))]
    fn add_condition(&mut self, node: &Bound<'_, PyAny>, index: Option<isize>) -> PyResult<()> {
        let node = FilterNode::from_value(&py_to_value(node)?)?;
        let root = self.inner.filter_mut();
        match index {
            Some(index) => root.insert_child(index, node),
            None => root.add_child(node),
        };
        Ok(())
    }

    /// Remove a top-level condition by index or by property name
    fn remove_condition(&mut self, target: &Bound<'_, PyAny>) -> PyResult<()> {
        let root = self.inner.filter_mut();
        if target.is_instance_of::<PyInt>() {
            // Ints wider than isize cannot address a condition either
            let index = target.extract::<isize>().unwrap_or(isize::MAX);
            remove_at(root, index)?;
        } else {
            let name: String = target.extract()?;
            root.remove_child(name.as_str())?;
        }
        Ok(())
    }

    fn referenced_properties(&self) -> Vec<String> {
        self.inner
            .referenced_properties()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn to_json(&self) -> PyResult<String> {
        Ok(self.inner.to_json()?)
    }

    fn __len__(&self) -> usize {
        self.inner.filter().child_count()
    }

    fn __repr__(&self) -> String {
        format!(
            "FilterBuilder({}, is_root={})",
            FilterNode::And(self.inner.filter().clone()),
            if self.inner.is_root_filter() { "True" } else { "False" }
        )
    }
}

/// Remove by a signed Python index; negative positions are not found
fn remove_at(root: &mut AndNode, index: isize) -> Result<()> {
    let position = usize::try_from(index)
        .map_err(|_| FilterError::ElementNotFound(format!("no condition at index {}", index)))?;
    root.remove_child(position)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::leaf::PropertyEquals;

    fn two_conditions() -> AndNode {
        let mut root = AndNode::new();
        root.add_child(PropertyEquals::new("a", 1))
            .add_child(PropertyEquals::new("b", 2));
        root
    }

    #[test]
    fn test_remove_at_index() {
        let mut root = two_conditions();
        remove_at(&mut root, 0).unwrap();
        assert_eq!(root.child_count(), 1);
        assert_eq!(root.children()[0].property(), Some("b"));
    }

    #[test]
    fn test_remove_at_bad_index_not_found() {
        for index in [-1, isize::MIN, 2, isize::MAX] {
            let mut root = two_conditions();
            let err = remove_at(&mut root, index).unwrap_err();
            assert!(matches!(err, FilterError::ElementNotFound(_)), "index: {}", index);
            assert_eq!(root.child_count(), 2);
        }
    }
}
