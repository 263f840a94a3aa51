//! Composite builders (AND / OR)

use log::trace;
use serde_json::{Map, Value};

use crate::error::{FilterError, Result};
use crate::filter::leaf::{reject_keys, shape_error, KEY_CHILDREN, KEY_OPERATION, KEY_PROPERTY, KEY_VALUE, KEY_VALUES};
use crate::filter::node::FilterNode;
use crate::filter::operation::Operation;

/// Selects a direct child for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildSelector<'a> {
    /// Position in the child list
    Index(usize),
    /// First leaf whose property has this name
    Property(&'a str),
}

impl From<usize> for ChildSelector<'_> {
    fn from(index: usize) -> Self {
        ChildSelector::Index(index)
    }
}

impl<'a> From<&'a str> for ChildSelector<'a> {
    fn from(name: &'a str) -> Self {
        ChildSelector::Property(name)
    }
}

/// Shared contract of AND / OR nodes: an ordered, owned list of children
pub trait Composite {
    const OPERATION: Operation;

    fn children(&self) -> &[FilterNode];

    fn children_mut(&mut self) -> &mut Vec<FilterNode>;

    /// Append a child
    fn add_child(&mut self, node: impl Into<FilterNode>) -> &mut Self
    where
        Self: Sized,
    {
        self.children_mut().push(node.into());
        self
    }

    /// Insert a child at `index`; a negative or out-of-range index appends
    fn insert_child(&mut self, index: isize, node: impl Into<FilterNode>) -> &mut Self
    where
        Self: Sized,
    {
        let children = self.children_mut();
        match usize::try_from(index) {
            Ok(pos) if pos < children.len() => children.insert(pos, node.into()),
            _ => children.push(node.into()),
        }
        self
    }

    /// Remove a child by position or by leaf property name
    fn remove_child<'a>(&mut self, selector: impl Into<ChildSelector<'a>>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        match selector.into() {
            ChildSelector::Index(index) => {
                let children = self.children_mut();
                if index >= children.len() {
                    return Err(FilterError::ElementNotFound(format!(
                        "no child at index {} ('{}' node has {})",
                        index,
                        Self::OPERATION,
                        children.len()
                    )));
                }
                children.remove(index);
                Ok(self)
            }
            ChildSelector::Property(name) => self
                .remove_child_where(|child| child.property() == Some(name))
                .map_err(|_| FilterError::ElementNotFound(format!("no child with property '{}'", name))),
        }
    }

    /// Remove the first child matching `predicate`
    fn remove_child_where<F>(&mut self, predicate: F) -> Result<&mut Self>
    where
        Self: Sized,
        F: FnMut(&FilterNode) -> bool,
    {
        let children = self.children_mut();
        match children.iter().position(predicate) {
            Some(pos) => {
                children.remove(pos);
                Ok(self)
            }
            None => Err(FilterError::ElementNotFound(format!(
                "no child of '{}' node matches",
                Self::OPERATION
            ))),
        }
    }

    fn clear_children(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.children_mut().clear();
        self
    }

    #[inline]
    fn get_child(&self, index: usize) -> Option<&FilterNode> {
        self.children().get(index)
    }

    #[inline]
    fn get_child_mut(&mut self, index: usize) -> Option<&mut FilterNode> {
        self.children_mut().get_mut(index)
    }

    #[inline]
    fn child_count(&self) -> usize {
        self.children().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.children().is_empty()
    }
}

/// Serialize a composite into its `{operation, children}` map
pub(crate) fn composite_to_map(op: Operation, children: &[FilterNode]) -> Map<String, Value> {
    let mut map = Map::with_capacity(2);
    map.insert(KEY_OPERATION.to_string(), Value::String(op.as_str().to_string()));
    map.insert(
        KEY_CHILDREN.to_string(),
        Value::Array(children.iter().map(FilterNode::to_value).collect()),
    );
    map
}

/// Parse the `children` list of a composite map
pub(crate) fn parse_children(map: &Map<String, Value>, op: Operation) -> Result<Vec<FilterNode>> {
    reject_keys(map, op, &[KEY_PROPERTY, KEY_VALUE, KEY_VALUES])?;
    let items = match map.get(KEY_CHILDREN) {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(shape_error(op, "requires 'children' to be a list")),
        None => return Err(shape_error(op, "is missing 'children'")),
    };
    trace!("Parsing {} children of '{}' node", items.len(), op);
    items.iter().map(FilterNode::from_value).collect()
}

macro_rules! composite_node {
    ($(#[$meta:meta])* $name:ident => $op:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            children: Vec<FilterNode>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn with_children<I, N>(children: I) -> Self
            where
                I: IntoIterator<Item = N>,
                N: Into<FilterNode>,
            {
                Self {
                    children: children.into_iter().map(Into::into).collect(),
                }
            }

            pub fn into_children(self) -> Vec<FilterNode> {
                self.children
            }

            pub fn to_map(&self) -> Map<String, Value> {
                composite_to_map(Self::OPERATION, &self.children)
            }

            pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
                Ok(Self {
                    children: parse_children(map, Self::OPERATION)?,
                })
            }
        }

        impl Composite for $name {
            const OPERATION: Operation = $op;

            #[inline]
            fn children(&self) -> &[FilterNode] {
                &self.children
            }

            #[inline]
            fn children_mut(&mut self) -> &mut Vec<FilterNode> {
                &mut self.children
            }
        }
    };
}

composite_node!(
    /// AND combinator: every child must hold
    AndNode => Operation::And
);

composite_node!(
    /// OR combinator: at least one child must hold
    OrNode => Operation::Or
);
