//! Filter expression tree and builders
//!
//! A filter is a tree of AND/OR combinators over leaf predicates, built
//! from and serialized to a plain nested-array form such as
//! `[{"operation": "=", "property": "pid", "value": 5}, ...]`.

mod builder;
pub mod cache;
mod composite;
mod leaf;
mod node;
mod operation;
mod py_builder;
mod value;


pub use builder::*;
pub use composite::*;
pub use leaf::{PropertyEquals, PropertyGreaterThan, PropertyLessThan, PropertyValueIn, PropertyValueLike, ValueSet};
pub use node::*;
pub use operation::*;
pub use py_builder::*;
pub use value::*;
