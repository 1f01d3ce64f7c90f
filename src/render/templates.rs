//! Message Templates
//!
//! Immutable map from violation code to a message with positional
//! placeholders (`%1`, `%2`, ...). Tables are written in TOML:
//!
//! ```toml
//! DISALLOWED_TAG = "The tag '%1' is disallowed."
//! ```

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::validation::ErrorCode;

/// Templates shipped with the crate
const EMBEDDED_TEMPLATES: &str = include_str!("../../resources/templates.toml");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateTable {
    by_code: HashMap<ErrorCode, String>,
}

impl TemplateTable {
    pub fn new(by_code: HashMap<ErrorCode, String>) -> Self {
        Self { by_code }
    }

    /// The default English templates
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_TEMPLATES)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: HashMap<String, String> = toml::from_str(content).map_err(|source| Error::Toml {
            what: "message templates",
            source,
        })?;

        let mut by_code = HashMap::with_capacity(raw.len());
        for (code, template) in raw {
            by_code.insert(code.parse::<ErrorCode>()?, template);
        }

        log::debug!("loaded {} message templates", by_code.len());
        Ok(Self { by_code })
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading templates from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("loading templates from {}", path.display()))
    }

    pub fn get(&self, code: ErrorCode) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Replace `%k` with `params[k - 1]`
///
/// Digits after `%` are read greedily, so `%12` is placeholder twelve. A
/// placeholder without a matching param stays as written, and substituted
/// text is never scanned again.
pub fn apply_format(template: &str, params: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let placeholder = &rest[pos..pos + 1 + digits];

        let param = after[..digits]
            .parse::<usize>()
            .ok()
            .and_then(|k| k.checked_sub(1))
            .and_then(|i| params.get(i));

        match param {
            Some(value) => out.push_str(value),
            None => out.push_str(placeholder),
        }
        rest = &after[digits..];
    }
    out.push_str(rest);
    out
}
