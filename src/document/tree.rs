//! Element Tree
//!
//! Arena-backed representation of a parsed markup document. Elements are
//! addressed by `ElementId`, a key assigned once when the element is added
//! and never reused for the lifetime of the document.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Stable handle for one element of a `Document`
///
/// Two ids are equal only when they name the same element instance. Two
/// elements with identical names and attributes still have distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(usize);

impl ElementId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attributes of an element, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: Vec<(String, String)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, keeping its original position if already present
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for (name, value) in iter {
            set.set(name, value);
        }
        set
    }
}

/// One element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    /// Tag name, lowercased
    pub name: String,
    pub attributes: AttributeSet,
    /// Source line, best effort
    pub line: usize,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
}

/// A document owns its elements; everything else refers to them by id
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level element
    pub fn add_root(&mut self, name: &str, line: usize) -> Result<ElementId> {
        let id = self.push_element(name, line, None)?;
        self.roots.push(id);
        Ok(id)
    }

    /// Append an element as the last child of `parent`
    pub fn append_child(
        &mut self,
        parent: ElementId,
        name: &str,
        line: usize,
    ) -> Result<ElementId> {
        if self.get(parent).is_none() {
            return Err(Error::UnknownElement(parent));
        }
        let id = self.push_element(name, line, Some(parent))?;
        self.elements[parent.index()].children.push(id);
        Ok(id)
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> Result<()> {
        let element = self
            .elements
            .get_mut(id.index())
            .ok_or(Error::UnknownElement(id))?;
        element.attributes.set(name, value);
        Ok(())
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Every element reachable from the roots, in document (pre-)order
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            document: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    fn push_element(
        &mut self,
        name: &str,
        line: usize,
        parent: Option<ElementId>,
    ) -> Result<ElementId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyTagName { line });
        }
        let id = ElementId::new(self.elements.len());
        self.elements.push(Element {
            id,
            name: name.to_lowercase(),
            attributes: AttributeSet::new(),
            line,
            parent,
            children: Vec::new(),
        });
        Ok(id)
    }
}

/// Depth-first pre-order walk with an explicit stack
pub struct PreOrder<'a> {
    document: &'a Document,
    stack: Vec<ElementId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let element = self.document.get(id)?;
        self.stack.extend(element.children.iter().rev().copied());
        Some(element)
    }
}
