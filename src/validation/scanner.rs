//! Document Scanner
//!
//! Single pre-order pass over every element of a document. Each element is
//! attached to the context and handed to the rule engine; once the walk is
//! done the engine gets one call to emit its cross-element violations.

use crate::document::{AttributeSet, Document};
use crate::error::Result;

use super::context::ValidationContext;
use super::result::ValidationResult;

/// Evaluates elements against the rule tables
///
/// Implementations append violations to `result` and return `Err` only for
/// failures of the engine itself.
pub trait RuleEngine {
    /// Check one element while the context is in the local phase
    fn validate_tag(
        &mut self,
        ctx: &ValidationContext,
        tag_name: &str,
        attributes: &AttributeSet,
        result: &mut ValidationResult,
    ) -> Result<()>;

    /// Cross-element checks, called once after the walk in the global phase
    fn emit_global_errors(
        &mut self,
        ctx: &ValidationContext,
        result: &mut ValidationResult,
        originator: &DocumentScanner,
    ) -> Result<()>;
}

/// The standard scan pass
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentScanner;

impl DocumentScanner {
    pub fn new() -> Self {
        Self
    }

    /// Name used when engines attribute violations to the pass that found them
    pub fn name(&self) -> &'static str {
        "standard-scan"
    }

    pub fn scan<E: RuleEngine + ?Sized>(
        &self,
        document: &Document,
        ctx: &mut ValidationContext,
        engine: &mut E,
        result: &mut ValidationResult,
    ) -> Result<()> {
        let mut count = 0;

        for element in document.iter() {
            count += 1;
            ctx.attach_element(document, element);
            log::trace!("visiting <{}> on line {}", element.name, element.line);
            engine.validate_tag(ctx, &element.name, &element.attributes, result)?;
        }

        ctx.set_tags_processed(count);
        result.tags_processed = count;
        ctx.enter_global_phase();
        log::debug!("{} elements scanned, running global checks", count);
        engine.emit_global_errors(ctx, result, self)
    }
}
