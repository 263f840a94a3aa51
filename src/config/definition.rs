//! Persisted filter definition structures

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::NamedElement;
use crate::error::Result;
use crate::filter::FilterBuilder;

fn empty_filter() -> Value {
    Value::Array(Vec::new())
}

/// A named filter stored with a data definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub name: String,
    /// Whole-query filter rather than a nested one
    #[serde(default, alias = "isRoot", alias = "is_root")]
    pub root: bool,
    /// Filter array as persisted
    #[serde(default = "empty_filter")]
    pub filter: Value,
}

impl FilterDefinition {
    /// Capture the current state of a builder under `name`
    pub fn from_builder(name: impl Into<String>, builder: &FilterBuilder) -> Self {
        Self {
            name: name.into(),
            root: builder.is_root_filter(),
            filter: builder.to_value(),
        }
    }

    pub fn build(&self) -> Result<FilterBuilder> {
        FilterBuilder::new(&self.filter, self.root)
    }
}

impl NamedElement for FilterDefinition {
    fn name(&self) -> &str {
        &self.name
    }
}
