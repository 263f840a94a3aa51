//! FilterBuilder - root facade over a mandatory AND node

use log::debug;
use serde_json::{Map, Value};

use crate::error::{FilterError, Result};
use crate::filter::composite::{AndNode, Composite};
use crate::filter::leaf::{KEY_CHILDREN, KEY_OPERATION};
use crate::filter::node::FilterNode;
use crate::filter::operation::{self, Operation};

/// Builds, validates and serializes a filter expression tree
///
/// The root is always an AND node. Whether the builder describes a
/// top-level query filter or a nested one is fixed at construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterBuilder {
    filter: AndNode,
    is_root: bool,
}

impl FilterBuilder {
    /// Parse a filter array and wrap it in the root AND node
    ///
    /// A list is taken as the root's children. A map already shaped as
    /// `{operation: AND, children}` becomes the root itself, an empty map is
    /// the empty filter and any other map is a single condition.
    pub fn new(filter: &Value, is_root: bool) -> Result<Self> {
        let children = match filter {
            Value::Array(items) => items.clone(),
            Value::Object(map) if map.is_empty() => Vec::new(),
            Value::Object(map) if is_and_root(map) => {
                return Self::from_root_map(map, is_root);
            }
            Value::Object(_) => vec![filter.clone()],
            other => {
                return Err(FilterError::InvalidFilterInput(format!(
                    "expected a filter list, got {}",
                    other
                )))
            }
        };

        let mut root = Map::with_capacity(2);
        root.insert(KEY_OPERATION.to_string(), Value::String(Operation::And.as_str().to_string()));
        root.insert(KEY_CHILDREN.to_string(), Value::Array(children));
        Self::from_root_map(&root, is_root)
    }

    fn from_root_map(map: &Map<String, Value>, is_root: bool) -> Result<Self> {
        let filter = AndNode::from_map(map)?;
        debug!(
            "Built filter with {} top-level conditions (root: {})",
            filter.child_count(),
            is_root
        );
        Ok(Self { filter, is_root })
    }

    /// Builder for a nested filter context
    pub fn from_array(filter: &Value) -> Result<Self> {
        Self::new(filter, false)
    }

    /// Builder for a top-level query filter
    pub fn from_array_for_root(filter: &Value) -> Result<Self> {
        Self::new(filter, true)
    }

    /// Parse JSON text holding a filter array
    pub fn from_json(text: &str, is_root: bool) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::new(&value, is_root)
    }

    pub fn empty(is_root: bool) -> Self {
        Self {
            filter: AndNode::new(),
            is_root,
        }
    }

    /// Wrap an already-built root
    pub fn from_filter(filter: AndNode, is_root: bool) -> Self {
        Self { filter, is_root }
    }

    #[inline]
    pub fn filter(&self) -> &AndNode {
        &self.filter
    }

    #[inline]
    pub fn filter_mut(&mut self) -> &mut AndNode {
        &mut self.filter
    }

    pub fn into_filter(self) -> AndNode {
        self.filter
    }

    #[inline]
    pub fn is_root_filter(&self) -> bool {
        self.is_root
    }

    /// Fails when this builder *is* a root filter
    ///
    /// The polarity is the established behavior and is kept as-is.
    pub fn check_not_root(&self) -> Result<&Self> {
        if self.is_root {
            return Err(FilterError::InvalidBuilderContext(
                "operation is not allowed on a root filter".to_string(),
            ));
        }
        Ok(self)
    }

    /// Append a condition to the root AND node
    pub fn add_condition(&mut self, node: impl Into<FilterNode>) -> &mut Self {
        self.filter.add_child(node);
        self
    }

    /// Top-level conditions in serialized form, without the root wrapper
    pub fn get_all_as_array(&self) -> Vec<Value> {
        self.filter.children().iter().map(FilterNode::to_value).collect()
    }

    #[inline]
    pub fn to_value(&self) -> Value {
        Value::Array(self.get_all_as_array())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_value())?)
    }

    /// Property names referenced anywhere in the filter
    pub fn referenced_properties(&self) -> Vec<&str> {
        self.filter
            .children()
            .iter()
            .flat_map(FilterNode::referenced_properties)
            .collect()
    }

    #[inline]
    pub fn is_valid_operation(token: &str) -> bool {
        operation::is_valid_operation(token)
    }

    /// Guard clause: fails with `InvalidFilterOperation` on an unknown token
    pub fn check_valid_operation(&self, token: &str) -> Result<&Self> {
        if !Self::is_valid_operation(token) {
            return Err(FilterError::InvalidFilterOperation(format!(
                "unknown operation '{}'",
                token
            )));
        }
        Ok(self)
    }
}

fn is_and_root(map: &Map<String, Value>) -> bool {
    matches!(map.get(KEY_OPERATION), Some(Value::String(op)) if op == Operation::And.as_str())
        && map.contains_key(KEY_CHILDREN)
}
