//! Operation tokens

use std::fmt;
use std::str::FromStr;

use crate::error::{FilterError, Result};

/// The seven operation tokens accepted in a filter array, in canonical order
pub const VALID_OPERATIONS: [&str; 7] = ["AND", "OR", "=", ">", "<", "IN", "LIKE"];

/// Node kind identified by the `operation` key of a filter map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// AND combinator
    And,
    /// OR combinator
    Or,
    /// Property equality (=)
    Equals,
    /// Property greater than (>)
    GreaterThan,
    /// Property less than (<)
    LessThan,
    /// Set membership (IN)
    ValueIn,
    /// Pattern match (LIKE)
    ValueLike,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::And,
        Operation::Or,
        Operation::Equals,
        Operation::GreaterThan,
        Operation::LessThan,
        Operation::ValueIn,
        Operation::ValueLike,
    ];

    /// Wire token for this operation
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::And => "AND",
            Operation::Or => "OR",
            Operation::Equals => "=",
            Operation::GreaterThan => ">",
            Operation::LessThan => "<",
            Operation::ValueIn => "IN",
            Operation::ValueLike => "LIKE",
        }
    }

    /// Look up a token; matching is exact and case-sensitive
    #[inline]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "AND" => Some(Operation::And),
            "OR" => Some(Operation::Or),
            "=" => Some(Operation::Equals),
            ">" => Some(Operation::GreaterThan),
            "<" => Some(Operation::LessThan),
            "IN" => Some(Operation::ValueIn),
            "LIKE" => Some(Operation::ValueLike),
            _ => None,
        }
    }

    /// Whether nodes of this kind own children
    #[inline]
    pub fn is_composite(self) -> bool {
        matches!(self, Operation::And | Operation::Or)
    }
}

impl FromStr for Operation {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Operation::from_token(s)
            .ok_or_else(|| FilterError::InvalidFilterOperation(format!("unknown operation '{}'", s)))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership test against the seven valid operation tokens
#[inline]
pub fn is_valid_operation(token: &str) -> bool {
    Operation::from_token(token).is_some()
}
