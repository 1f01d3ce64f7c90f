//! Violation records and their ordered accumulator

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::category::ErrorCategory;
use super::context::{Phase, ValidationContext};
use crate::document::ElementId;
use crate::error::{Error, Result};

/// Context string used for document-level violations
pub const GLOBAL_WARNING: &str = "GLOBAL WARNING";

/// Kind of violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnknownCode,
    MandatoryTagMissing,
    TagRequiredByMissing,
    DisallowedTag,
    DisallowedTagAncestor,
    MandatoryTagAncestor,
    MandatoryTagAncestorWithHint,
    WrongParentTag,
    DuplicateUniqueTag,
    DisallowedAttr,
    InvalidAttrValue,
    MandatoryAttrMissing,
    MandatoryOneofAttrMissing,
    MutuallyExclusiveAttrs,
    DeprecatedAttr,
    DeprecatedTag,
    MissingUrl,
    InvalidUrl,
    InvalidUrlProtocol,
    DisallowedPropertyInAttrValue,
    InvalidPropertyValueInAttrValue,
    MandatoryPropertyMissingFromAttrValue,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 22] = [
        ErrorCode::UnknownCode,
        ErrorCode::MandatoryTagMissing,
        ErrorCode::TagRequiredByMissing,
        ErrorCode::DisallowedTag,
        ErrorCode::DisallowedTagAncestor,
        ErrorCode::MandatoryTagAncestor,
        ErrorCode::MandatoryTagAncestorWithHint,
        ErrorCode::WrongParentTag,
        ErrorCode::DuplicateUniqueTag,
        ErrorCode::DisallowedAttr,
        ErrorCode::InvalidAttrValue,
        ErrorCode::MandatoryAttrMissing,
        ErrorCode::MandatoryOneofAttrMissing,
        ErrorCode::MutuallyExclusiveAttrs,
        ErrorCode::DeprecatedAttr,
        ErrorCode::DeprecatedTag,
        ErrorCode::MissingUrl,
        ErrorCode::InvalidUrl,
        ErrorCode::InvalidUrlProtocol,
        ErrorCode::DisallowedPropertyInAttrValue,
        ErrorCode::InvalidPropertyValueInAttrValue,
        ErrorCode::MandatoryPropertyMissingFromAttrValue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnknownCode => "UNKNOWN_CODE",
            ErrorCode::MandatoryTagMissing => "MANDATORY_TAG_MISSING",
            ErrorCode::TagRequiredByMissing => "TAG_REQUIRED_BY_MISSING",
            ErrorCode::DisallowedTag => "DISALLOWED_TAG",
            ErrorCode::DisallowedTagAncestor => "DISALLOWED_TAG_ANCESTOR",
            ErrorCode::MandatoryTagAncestor => "MANDATORY_TAG_ANCESTOR",
            ErrorCode::MandatoryTagAncestorWithHint => "MANDATORY_TAG_ANCESTOR_WITH_HINT",
            ErrorCode::WrongParentTag => "WRONG_PARENT_TAG",
            ErrorCode::DuplicateUniqueTag => "DUPLICATE_UNIQUE_TAG",
            ErrorCode::DisallowedAttr => "DISALLOWED_ATTR",
            ErrorCode::InvalidAttrValue => "INVALID_ATTR_VALUE",
            ErrorCode::MandatoryAttrMissing => "MANDATORY_ATTR_MISSING",
            ErrorCode::MandatoryOneofAttrMissing => "MANDATORY_ONEOF_ATTR_MISSING",
            ErrorCode::MutuallyExclusiveAttrs => "MUTUALLY_EXCLUSIVE_ATTRS",
            ErrorCode::DeprecatedAttr => "DEPRECATED_ATTR",
            ErrorCode::DeprecatedTag => "DEPRECATED_TAG",
            ErrorCode::MissingUrl => "MISSING_URL",
            ErrorCode::InvalidUrl => "INVALID_URL",
            ErrorCode::InvalidUrlProtocol => "INVALID_URL_PROTOCOL",
            ErrorCode::DisallowedPropertyInAttrValue => "DISALLOWED_PROPERTY_IN_ATTR_VALUE",
            ErrorCode::InvalidPropertyValueInAttrValue => "INVALID_PROPERTY_VALUE_IN_ATTR_VALUE",
            ErrorCode::MandatoryPropertyMissingFromAttrValue => {
                "MANDATORY_PROPERTY_MISSING_FROM_ATTR_VALUE"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| Error::UnknownCode(s.to_string()))
    }
}

/// Severity of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
}

/// Description of an automatic fix applied by some earlier stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionTaken {
    pub human_description: String,
}

/// One detected deviation from the rule tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub code: ErrorCode,
    /// Substituted into message templates; `%1` is `params[0]`
    pub params: Vec<String>,
    pub detail: Option<String>,
    pub line: usize,
    /// Element the violation concerns, by identity
    pub element: Option<ElementId>,
    /// Heading under which the renderer groups consecutive errors
    pub context_string: String,
    pub phase: Phase,
    pub severity: Severity,
    pub(crate) category: Option<ErrorCategory>,
    pub spec_url: Option<String>,
    pub action_taken: Option<ActionTaken>,
}

impl ValidationError {
    /// A document-level error with no location
    pub fn new<S: Into<String>>(code: ErrorCode, params: impl IntoIterator<Item = S>) -> Self {
        Self {
            code,
            params: params.into_iter().map(Into::into).collect(),
            detail: None,
            line: 0,
            element: None,
            context_string: GLOBAL_WARNING.to_string(),
            phase: Phase::Global,
            severity: Severity::Error,
            category: None,
            spec_url: None,
            action_taken: None,
        }
    }

    /// An error stamped with the element and phase the context is currently in
    pub fn at<S: Into<String>>(
        ctx: &ValidationContext,
        code: ErrorCode,
        params: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut error = Self::new(code, params);
        error.phase = ctx.phase();
        if ctx.phase() == Phase::Local {
            error.element = ctx.current_element();
            error.line = ctx.current_line();
            if let Some(tag) = ctx.current_tag() {
                error.context_string = tag.to_string();
            }
        }
        error
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn with_element(mut self, element: ElementId) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_context_string(mut self, context_string: impl Into<String>) -> Self {
        self.context_string = context_string.into();
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_spec_url(mut self, spec_url: impl Into<String>) -> Self {
        self.spec_url = Some(spec_url.into());
        self
    }

    pub fn with_action_taken(mut self, human_description: impl Into<String>) -> Self {
        self.action_taken = Some(ActionTaken {
            human_description: human_description.into(),
        });
        self
    }

    /// Category assigned by `annotate`, if it has run
    pub fn category(&self) -> Option<ErrorCategory> {
        self.category
    }

    /// Positional parameter, `None` when out of range
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Pass,
    Fail,
    /// Internal or parse-level failure; never overwritten once set
    Unknown,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationStatus::Pass => "PASS",
            ValidationStatus::Fail => "FAIL",
            ValidationStatus::Unknown => "UNKNOWN",
        })
    }
}

/// Ordered, append-only list of violations
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    errors: Vec<ValidationError>,
    pub tags_processed: usize,
    #[serde(skip)]
    sealed: bool,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            status: ValidationStatus::Pass,
            errors: Vec::new(),
            tags_processed: 0,
            sealed: false,
        }
    }

    /// Append a violation; fails once the result has been sealed for rendering
    pub fn add_error(&mut self, error: ValidationError) -> Result<()> {
        if self.sealed {
            return Err(Error::ResultSealed);
        }
        if error.severity == Severity::Error && self.status == ValidationStatus::Pass {
            self.status = ValidationStatus::Fail;
        }
        self.errors.push(error);
        Ok(())
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub(crate) fn errors_mut(&mut self) -> &mut [ValidationError] {
        &mut self.errors
    }

    pub fn mark_unknown(&mut self) {
        self.status = ValidationStatus::Unknown;
    }

    /// Result for a document that could not be loaded at all
    pub fn from_parse_failure(detail: impl Into<String>) -> Self {
        let error = ValidationError::new(ErrorCode::UnknownCode, Vec::<String>::new())
            .with_detail(detail);
        let mut result = Self::new();
        result.mark_unknown();
        result.errors.push(error);
        result
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Pass
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}
