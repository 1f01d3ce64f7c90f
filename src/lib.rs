//! AMP Validator
//!
//! Validates a parsed markup document against a tag specification and
//! renders the violations as a grouped text report.
//!
//! This library provides:
//! - The element tree model and a single-pass document scanner
//! - The violation data model and its error categorization
//! - Template-based rendering of validation results
//! - A TOML-driven rule engine

pub mod config;
pub mod document;
pub mod error;
pub mod render;
pub mod rules;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use document::{AttributeSet, Document, ElementId};
pub use error::{Error, Result};
pub use render::{ResultRenderer, TemplateTable};
pub use rules::{RuleSet, TableRuleEngine};
pub use validation::{
    annotate, categorize, DocumentScanner, ErrorCategory, ErrorCode, RuleEngine, Severity,
    ValidationContext, ValidationError, ValidationResult, ValidationStatus,
};

/// Scan `document` with `engine` and categorize the violations found
///
/// Creates a fresh context and result for the run. The returned result is
/// annotated and still open for further errors until it is rendered.
pub fn validate_document<E: RuleEngine + ?Sized>(
    document: &Document,
    engine: &mut E,
) -> Result<ValidationResult> {
    let mut ctx = ValidationContext::new();
    let mut result = ValidationResult::new();

    DocumentScanner::new().scan(document, &mut ctx, engine, &mut result)?;
    annotate(&mut result);

    log::info!(
        "validated {} elements: {} ({} errors)",
        ctx.tags_processed(),
        result.status,
        result.errors().len()
    );
    Ok(result)
}
