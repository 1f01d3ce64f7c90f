//! Per-run validation state shared with the rule engine

use serde::Serialize;

use crate::document::{Document, Element, ElementId};

/// Which kind of rule is being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Checks that concern one element, run while visiting it
    Local,
    /// Cross-element checks, run once after the walk
    Global,
}

/// Mutable state of one validation run
///
/// Only the scanner writes to it. Rule engines read it during their callbacks.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    current_element: Option<ElementId>,
    current_tag: Option<String>,
    current_line: usize,
    parent_tag: Option<String>,
    phase: Phase,
    tags_processed: usize,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationContext {
    pub fn new() -> Self {
        Self {
            current_element: None,
            current_tag: None,
            current_line: 0,
            parent_tag: None,
            phase: Phase::Global,
            tags_processed: 0,
        }
    }

    pub fn current_element(&self) -> Option<ElementId> {
        self.current_element
    }

    /// Tag name of the element being visited
    pub fn current_tag(&self) -> Option<&str> {
        self.current_tag.as_deref()
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    pub fn parent_tag(&self) -> Option<&str> {
        self.parent_tag.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tags_processed(&self) -> usize {
        self.tags_processed
    }

    /// Enter the local phase for `element`
    pub(crate) fn attach_element(&mut self, document: &Document, element: &Element) {
        self.tags_processed += 1;
        self.current_element = Some(element.id);
        self.current_tag = Some(element.name.clone());
        self.current_line = element.line;
        self.parent_tag = element
            .parent
            .and_then(|id| document.get(id))
            .map(|parent| parent.name.clone());
        self.phase = Phase::Local;
    }

    pub(crate) fn set_tags_processed(&mut self, count: usize) {
        self.tags_processed = count;
    }

    pub(crate) fn enter_global_phase(&mut self) {
        self.phase = Phase::Global;
    }
}
