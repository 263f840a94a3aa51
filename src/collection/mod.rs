//! Ordered, name-addressable row collection
//!
//! Holds the panel rows of a data definition (for example the named filter
//! definitions loaded by [`crate::config`]) in row order.

use std::slice;

use crate::error::{FilterError, Result};

/// An element addressable by name inside a [`RowCollection`]
pub trait NamedElement {
    fn name(&self) -> &str;
}

/// Reference to a row by position, name or instance
pub enum ElementRef<'a, T> {
    Index(usize),
    Name(&'a str),
    Instance(&'a T),
}

/// Ordered collection of named rows
#[derive(Debug, Clone, PartialEq)]
pub struct RowCollection<T> {
    rows: Vec<T>,
}

impl<T> Default for RowCollection<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: NamedElement + PartialEq> RowCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all rows in row order
    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(NamedElement::name).collect()
    }

    /// Insert at `position`; `None`, negative or out-of-range positions append
    pub fn add(&mut self, element: T, position: Option<isize>) -> &mut Self {
        match position.and_then(|p| usize::try_from(p).ok()) {
            Some(pos) if pos < self.rows.len() => self.rows.insert(pos, element),
            _ => self.rows.push(element),
        }
        self
    }

    /// Remove a row and hand it back
    pub fn remove(&mut self, target: ElementRef<'_, T>) -> Result<T> {
        match self.position(&target) {
            Some(pos) => Ok(self.rows.remove(pos)),
            None => Err(FilterError::ElementNotFound(describe(&target))),
        }
    }

    /// Whether the row exists; a blank name is a malformed query
    pub fn contains(&self, target: ElementRef<'_, T>) -> Result<bool> {
        if let ElementRef::Name(name) = target {
            if name.trim().is_empty() {
                return Err(FilterError::InvalidArgument(
                    "element name must not be blank".to_string(),
                ));
            }
        }
        Ok(self.position(&target).is_some())
    }

    pub fn get(&self, target: ElementRef<'_, T>) -> Option<&T> {
        self.position(&target).map(|pos| &self.rows[pos])
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Traverse rows in order; every call starts again at the first row
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.rows.iter()
    }

    fn position(&self, target: &ElementRef<'_, T>) -> Option<usize> {
        match target {
            ElementRef::Index(index) => (*index < self.rows.len()).then_some(*index),
            ElementRef::Name(name) => self.rows.iter().position(|row| row.name() == *name),
            ElementRef::Instance(element) => self.rows.iter().position(|row| row == *element),
        }
    }
}

fn describe<T: NamedElement>(target: &ElementRef<'_, T>) -> String {
    match target {
        ElementRef::Index(index) => format!("no element at index {}", index),
        ElementRef::Name(name) => format!("no element named '{}'", name),
        ElementRef::Instance(element) => format!("element '{}' is not in the collection", element.name()),
    }
}

impl<'a, T> IntoIterator for &'a RowCollection<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<T> FromIterator<T> for RowCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
