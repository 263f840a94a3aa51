//! Filter node sum type and its nested-array form

use log::trace;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{FilterError, Result};
use crate::filter::composite::{AndNode, Composite, OrNode};
use crate::filter::leaf::{
    PropertyEquals, PropertyGreaterThan, PropertyLessThan, PropertyValueIn, PropertyValueLike, KEY_OPERATION,
};
use crate::filter::operation::Operation;
use crate::filter::value::FilterValue;

/// A node of the filter expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    And(AndNode),
    Or(OrNode),
    Equals(PropertyEquals),
    GreaterThan(PropertyGreaterThan),
    LessThan(PropertyLessThan),
    ValueIn(PropertyValueIn),
    ValueLike(PropertyValueLike),
}

impl FilterNode {
    pub fn equals(property: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        FilterNode::Equals(PropertyEquals::new(property, value))
    }

    pub fn greater_than(property: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        FilterNode::GreaterThan(PropertyGreaterThan::new(property, value))
    }

    pub fn less_than(property: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        FilterNode::LessThan(PropertyLessThan::new(property, value))
    }

    pub fn value_in<I, V>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        FilterNode::ValueIn(PropertyValueIn::new(property, values))
    }

    pub fn like(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        FilterNode::ValueLike(PropertyValueLike::new(property, pattern))
    }

    pub fn and<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<FilterNode>,
    {
        FilterNode::And(AndNode::with_children(children))
    }

    pub fn or<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<FilterNode>,
    {
        FilterNode::Or(OrNode::with_children(children))
    }

    /// Operation token of this node
    #[inline]
    pub fn operation(&self) -> Operation {
        match self {
            FilterNode::And(_) => Operation::And,
            FilterNode::Or(_) => Operation::Or,
            FilterNode::Equals(_) => Operation::Equals,
            FilterNode::GreaterThan(_) => Operation::GreaterThan,
            FilterNode::LessThan(_) => Operation::LessThan,
            FilterNode::ValueIn(_) => Operation::ValueIn,
            FilterNode::ValueLike(_) => Operation::ValueLike,
        }
    }

    #[inline]
    pub fn is_composite(&self) -> bool {
        self.operation().is_composite()
    }

    /// Property name for leaves, `None` for composites
    pub fn property(&self) -> Option<&str> {
        match self {
            FilterNode::And(_) | FilterNode::Or(_) => None,
            FilterNode::Equals(leaf) => Some(leaf.property()),
            FilterNode::GreaterThan(leaf) => Some(leaf.property()),
            FilterNode::LessThan(leaf) => Some(leaf.property()),
            FilterNode::ValueIn(leaf) => Some(leaf.property()),
            FilterNode::ValueLike(leaf) => Some(leaf.property()),
        }
    }

    /// Children for composites, `None` for leaves
    pub fn children(&self) -> Option<&[FilterNode]> {
        match self {
            FilterNode::And(node) => Some(node.children()),
            FilterNode::Or(node) => Some(node.children()),
            _ => None,
        }
    }

    /// Canonical map form, recursing into children
    pub fn to_map(&self) -> Map<String, Value> {
        match self {
            FilterNode::And(node) => node.to_map(),
            FilterNode::Or(node) => node.to_map(),
            FilterNode::Equals(leaf) => leaf.to_map(),
            FilterNode::GreaterThan(leaf) => leaf.to_map(),
            FilterNode::LessThan(leaf) => leaf.to_map(),
            FilterNode::ValueIn(leaf) => leaf.to_map(),
            FilterNode::ValueLike(leaf) => leaf.to_map(),
        }
    }

    #[inline]
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Build a node from its map form, dispatching on `operation`
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let op = match map.get(KEY_OPERATION) {
            Some(Value::String(token)) => token.parse::<Operation>()?,
            Some(other) => {
                return Err(FilterError::InvalidFilterOperation(format!(
                    "operation must be a string, got {}",
                    other
                )))
            }
            None => return Err(FilterError::InvalidFilterOperation("missing operation".to_string())),
        };
        trace!("Parsing '{}' node", op);

        Ok(match op {
            Operation::And => FilterNode::And(AndNode::from_map(map)?),
            Operation::Or => FilterNode::Or(OrNode::from_map(map)?),
            Operation::Equals => FilterNode::Equals(PropertyEquals::from_map(map)?),
            Operation::GreaterThan => FilterNode::GreaterThan(PropertyGreaterThan::from_map(map)?),
            Operation::LessThan => FilterNode::LessThan(PropertyLessThan::from_map(map)?),
            Operation::ValueIn => FilterNode::ValueIn(PropertyValueIn::from_map(map)?),
            Operation::ValueLike => FilterNode::ValueLike(PropertyValueLike::from_map(map)?),
        })
    }

    /// Build a node from any JSON value; only maps are nodes
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(FilterError::InvalidFilterShape(format!(
                "filter node must be a map, got {}",
                other
            ))),
        }
    }

    /// Property names of every leaf, depth-first in child order
    pub fn referenced_properties(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_properties(&mut out);
        out
    }

    fn collect_properties<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self.children() {
            Some(children) => children.iter().for_each(|c| c.collect_properties(out)),
            None => out.extend(self.property()),
        }
    }

    /// Number of leaf predicates in this subtree
    pub fn leaf_count(&self) -> usize {
        match self.children() {
            Some(children) => children.iter().map(FilterNode::leaf_count).sum(),
            None => 1,
        }
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::And(node) => write_group(f, node.children(), Operation::And),
            FilterNode::Or(node) => write_group(f, node.children(), Operation::Or),
            FilterNode::Equals(leaf) => write!(f, "{} = {}", leaf.property(), leaf.value()),
            FilterNode::GreaterThan(leaf) => write!(f, "{} > {}", leaf.property(), leaf.value()),
            FilterNode::LessThan(leaf) => write!(f, "{} < {}", leaf.property(), leaf.value()),
            FilterNode::ValueIn(leaf) => {
                write!(f, "{} IN [", leaf.property())?;
                for (i, value) in leaf.values().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
            FilterNode::ValueLike(leaf) => write!(f, "{} LIKE {:?}", leaf.property(), leaf.value()),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, children: &[FilterNode], op: Operation) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        write!(f, "{}", child)?;
    }
    f.write_str(")")
}

impl From<AndNode> for FilterNode {
    fn from(node: AndNode) -> Self {
        FilterNode::And(node)
    }
}

impl From<OrNode> for FilterNode {
    fn from(node: OrNode) -> Self {
        FilterNode::Or(node)
    }
}

impl From<PropertyEquals> for FilterNode {
    fn from(leaf: PropertyEquals) -> Self {
        FilterNode::Equals(leaf)
    }
}

impl From<PropertyGreaterThan> for FilterNode {
    fn from(leaf: PropertyGreaterThan) -> Self {
        FilterNode::GreaterThan(leaf)
    }
}

impl From<PropertyLessThan> for FilterNode {
    fn from(leaf: PropertyLessThan) -> Self {
        FilterNode::LessThan(leaf)
    }
}

impl From<PropertyValueIn> for FilterNode {
    fn from(leaf: PropertyValueIn) -> Self {
        FilterNode::ValueIn(leaf)
    }
}

impl From<PropertyValueLike> for FilterNode {
    fn from(leaf: PropertyValueLike) -> Self {
        FilterNode::ValueLike(leaf)
    }
}

impl Serialize for FilterNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FilterNode::from_value(&value).map_err(D::Error::custom)
    }
}
