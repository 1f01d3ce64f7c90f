//! Error categorization
//!
//! Maps every violation onto a coarse triage bucket. The checks in
//! `categorize` form an ordered decision list: several of them overlap and
//! the first match wins, so their order is part of the output format.

use std::fmt;

use serde::Serialize;

use super::result::{ErrorCode, ValidationError, ValidationResult};

/// Tag-name prefix of framework-defined custom elements
pub const RESERVED_PREFIX: &str = "amp-";

/// Literal first parameter marking the missing `⚡`/`amp` attribute on `<html>`
const LIGHTNING_SENTINEL: &str = r"\u26a";

const TAGS_WITH_EQUIVALENT: [&str; 5] = ["img", "video", "audio", "iframe", "font"];

const LAYOUT_ATTRS: [&str; 3] = ["width", "height", "layout"];

/// Triage bucket for a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Unknown,
    DisallowedHtmlWithEquivalent,
    DisallowedHtml,
    MandatoryTagMissingOrIncorrect,
    LayoutProblem,
    CustomScriptDisallowed,
    NamespaceTagProblem,
    Deprecation,
    Generic,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Unknown => "UNKNOWN",
            ErrorCategory::DisallowedHtmlWithEquivalent => "DISALLOWED_HTML_WITH_EQUIVALENT",
            ErrorCategory::DisallowedHtml => "DISALLOWED_HTML",
            ErrorCategory::MandatoryTagMissingOrIncorrect => "MANDATORY_TAG_MISSING_OR_INCORRECT",
            ErrorCategory::LayoutProblem => "LAYOUT_PROBLEM",
            ErrorCategory::CustomScriptDisallowed => "CUSTOM_SCRIPT_DISALLOWED",
            ErrorCategory::NamespaceTagProblem => "NAMESPACE_TAG_PROBLEM",
            ErrorCategory::Deprecation => "DEPRECATION",
            ErrorCategory::Generic => "GENERIC",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn param_is(error: &ValidationError, index: usize, value: &str) -> bool {
    error.param(index) == Some(value)
}

fn param_in(error: &ValidationError, index: usize, values: &[&str]) -> bool {
    error.param(index).is_some_and(|p| values.contains(&p))
}

fn param_starts_with(error: &ValidationError, index: usize, prefix: &str) -> bool {
    error.param(index).is_some_and(|p| p.starts_with(prefix))
}

fn param_ends_with(error: &ValidationError, index: usize, suffix: &str) -> bool {
    error.param(index).is_some_and(|p| p.ends_with(suffix))
}

fn is_reserved(error: &ValidationError, index: usize) -> bool {
    param_starts_with(error, index, RESERVED_PREFIX)
}

/// Classify one violation; depends only on its code and params
pub fn categorize(error: &ValidationError) -> ErrorCategory {
    use ErrorCategory as C;
    use ErrorCode::*;

    let code = error.code;

    if error.params.is_empty() || code == UnknownCode {
        return C::Unknown;
    }

    if code == DisallowedTag {
        if param_in(error, 0, &TAGS_WITH_EQUIVALENT) {
            return C::DisallowedHtmlWithEquivalent;
        }
        return C::DisallowedHtml;
    }

    if code == MandatoryTagAncestorWithHint {
        return C::DisallowedHtmlWithEquivalent;
    }

    if code == MandatoryTagMissing
        || (code == MandatoryAttrMissing && param_is(error, 0, LIGHTNING_SENTINEL))
    {
        return C::MandatoryTagMissingOrIncorrect;
    }

    if matches!(
        code,
        DisallowedPropertyInAttrValue
            | InvalidPropertyValueInAttrValue
            | MandatoryPropertyMissingFromAttrValue
    ) && param_is(error, 2, "meta name=viewport")
    {
        return C::MandatoryTagMissingOrIncorrect;
    }

    if matches!(code, InvalidAttrValue | MandatoryAttrMissing)
        && param_in(error, 0, &LAYOUT_ATTRS)
    {
        return C::LayoutProblem;
    }

    if code == InvalidAttrValue
        && param_is(error, 0, "src")
        && param_ends_with(error, 1, "script")
    {
        return C::CustomScriptDisallowed;
    }

    if code == InvalidAttrValue
        && param_is(error, 0, "type")
        && param_starts_with(error, 1, "script")
    {
        return C::CustomScriptDisallowed;
    }

    if matches!(code, InvalidAttrValue | DisallowedAttr | MandatoryAttrMissing) {
        if is_reserved(error, 1) {
            return C::NamespaceTagProblem;
        }
        return C::DisallowedHtml;
    }

    if code == MandatoryOneofAttrMissing {
        return C::NamespaceTagProblem;
    }

    if matches!(code, DeprecatedAttr | DeprecatedTag) {
        return C::Deprecation;
    }

    if code == WrongParentTag {
        if (0..3).any(|i| is_reserved(error, i)) {
            return C::NamespaceTagProblem;
        }
        return C::DisallowedHtml;
    }

    if code == TagRequiredByMissing && is_reserved(error, 1) {
        return C::NamespaceTagProblem;
    }

    if code == MutuallyExclusiveAttrs && is_reserved(error, 0) {
        return C::NamespaceTagProblem;
    }

    if code == DuplicateUniqueTag {
        return C::MandatoryTagMissingOrIncorrect;
    }

    if matches!(code, MissingUrl | InvalidUrl | InvalidUrlProtocol) {
        if is_reserved(error, 1) {
            return C::NamespaceTagProblem;
        }
        return C::DisallowedHtml;
    }

    C::Generic
}

/// Assign a category to every error of `result`, in place
pub fn annotate(result: &mut ValidationResult) {
    for error in result.errors_mut() {
        let category = categorize(error);
        debug_assert!(error.category.is_none_or(|c| c == category));
        error.category = Some(category);
    }
}
