//! Validation Pipeline
//!
//! Scanning, the violation data model and categorization. Rendering lives in
//! `crate::render`; rule tables in `crate::rules`.

pub mod category;
pub mod context;
pub mod result;
pub mod scanner;

pub use category::{annotate, categorize, ErrorCategory, RESERVED_PREFIX};
pub use context::{Phase, ValidationContext};
pub use result::{
    ActionTaken, ErrorCode, Severity, ValidationError, ValidationResult, ValidationStatus,
    GLOBAL_WARNING,
};
pub use scanner::{DocumentScanner, RuleEngine};
