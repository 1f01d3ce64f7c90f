//! Hard failures
//!
//! Content problems found in a document are never reported through this type:
//! they are `ValidationError` values appended to a `ValidationResult`. The
//! variants below describe broken collaborators, malformed tables and misuse
//! of the pipeline itself.

use thiserror::Error;

use crate::document::ElementId;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Failure that stops a validation run
#[derive(Error, Debug)]
pub enum Error {
    /// The rule engine could not evaluate a tag or the global rules
    #[error("rule engine failed on <{tag}>: {message}")]
    RuleEngine { tag: String, message: String },

    /// A violation was appended after rendering started
    #[error("validation result is sealed; rendering has already started")]
    ResultSealed,

    /// A table referenced a violation code this crate does not know
    #[error("unknown validation error code '{0}'")]
    UnknownCode(String),

    /// A template or rule table could not be parsed
    #[error("failed to parse {what}: {source}")]
    Toml {
        what: &'static str,
        #[source]
        source: toml::de::Error,
    },

    /// A pre-parsed document could not be read
    #[error("failed to parse document tree: {0}")]
    Json(#[from] serde_json::Error),

    /// An attribute value pattern in a rule table does not compile
    #[error("invalid value pattern for {tag}[{attr}]: {source}")]
    Pattern {
        tag: String,
        attr: String,
        #[source]
        source: regex::Error,
    },

    /// An element id does not belong to the document it was used with
    #[error("element {0} does not exist in this document")]
    UnknownElement(ElementId),

    /// Elements need a non-empty tag name
    #[error("element on line {line} has an empty tag name")]
    EmptyTagName { line: usize },

    /// A loaded element lists the same attribute more than once
    #[error("attribute '{name}' repeated on the element at line {line}")]
    DuplicateAttribute { name: String, line: usize },
}
