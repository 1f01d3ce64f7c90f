//! Table-driven rule engine
//!
//! Evaluates elements against a `RuleSet`. One engine value belongs to one
//! validation run: it remembers which tags it has seen so the global checks
//! can report missing and duplicated tags.

use std::collections::HashMap;

use crate::document::AttributeSet;
use crate::error::{Error, Result};
use crate::validation::{
    DocumentScanner, ErrorCode, Phase, RuleEngine, Severity, ValidationContext, ValidationError,
    ValidationResult,
};

use super::schema::{RuleSet, TagRule};

/// Placeholder for the parent of a top-level element
const NO_PARENT: &str = "#root";

#[derive(Debug)]
pub struct TableRuleEngine<'a> {
    rules: &'a RuleSet,
    seen: HashMap<String, usize>,
    seen_order: Vec<String>,
}

impl<'a> TableRuleEngine<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            seen: HashMap::new(),
            seen_order: Vec::new(),
        }
    }

    /// How often a tag has been visited so far
    pub fn seen_count(&self, tag: &str) -> usize {
        self.seen.get(tag).copied().unwrap_or(0)
    }

    fn record_seen(&mut self, tag: &str) -> usize {
        let count = self.seen.entry(tag.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.seen_order.push(tag.to_string());
        }
        *count
    }
}

fn list_param(names: &[String]) -> String {
    let quoted: Vec<_> = names.iter().map(|n| format!("'{}'", n)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Whether the element carries `name`, directly or through one of its alternatives
fn has_attr(rule: &TagRule, attributes: &AttributeSet, name: &str) -> bool {
    attributes
        .names()
        .any(|n| n == name || rule.find_attr(n).is_some_and(|a| a.def.name == name))
}

fn stamp(error: ValidationError, rule: &TagRule) -> ValidationError {
    match &rule.def.spec_url {
        Some(url) => error.with_spec_url(url.clone()),
        None => error,
    }
}

impl RuleEngine for TableRuleEngine<'_> {
    fn validate_tag(
        &mut self,
        ctx: &ValidationContext,
        tag_name: &str,
        attributes: &AttributeSet,
        result: &mut ValidationResult,
    ) -> Result<()> {
        if ctx.phase() != Phase::Local {
            return Err(Error::RuleEngine {
                tag: tag_name.to_string(),
                message: "tag validation requested outside the local phase".to_string(),
            });
        }

        let occurrences = self.record_seen(tag_name);

        let Some(rule) = self.rules.get_tag(tag_name) else {
            return result.add_error(ValidationError::at(ctx, ErrorCode::DisallowedTag, [tag_name]));
        };

        if let Some(replacement) = &rule.def.deprecation {
            result.add_error(stamp(
                ValidationError::at(ctx, ErrorCode::DeprecatedTag, [tag_name, replacement.as_str()])
                    .with_severity(Severity::Warning),
                rule,
            ))?;
        }

        if rule.def.unique && occurrences > 1 {
            result.add_error(stamp(
                ValidationError::at(ctx, ErrorCode::DuplicateUniqueTag, [tag_name]),
                rule,
            ))?;
        }

        if let Some(expected) = &rule.def.mandatory_parent {
            let parent = ctx.parent_tag().unwrap_or(NO_PARENT);
            if parent != expected {
                result.add_error(stamp(
                    ValidationError::at(
                        ctx,
                        ErrorCode::WrongParentTag,
                        [tag_name, parent, expected.as_str()],
                    ),
                    rule,
                ))?;
            }
        }

        for (name, value) in attributes.iter() {
            let Some(attr) = rule.find_attr(name) else {
                if !self.rules.is_global_attr(name) && !name.starts_with("data-") {
                    result.add_error(stamp(
                        ValidationError::at(ctx, ErrorCode::DisallowedAttr, [name, tag_name]),
                        rule,
                    ))?;
                }
                continue;
            };

            if let Some(pattern) = &attr.value_pattern {
                if !pattern.is_match(value) {
                    result.add_error(stamp(
                        ValidationError::at(
                            ctx,
                            ErrorCode::InvalidAttrValue,
                            [name, tag_name, value],
                        ),
                        rule,
                    ))?;
                }
            }

            if let Some(replacement) = &attr.def.deprecation {
                result.add_error(stamp(
                    ValidationError::at(
                        ctx,
                        ErrorCode::DeprecatedAttr,
                        [name, tag_name, replacement.as_str()],
                    )
                    .with_severity(Severity::Warning),
                    rule,
                ))?;
            }
        }

        for attr in rule.attrs.iter().filter(|a| a.def.mandatory) {
            let present = attributes.names().any(|name| attr.def.matches_name(name));
            if !present {
                result.add_error(stamp(
                    ValidationError::at(
                        ctx,
                        ErrorCode::MandatoryAttrMissing,
                        [attr.def.name.as_str(), tag_name],
                    ),
                    rule,
                ))?;
            }
        }

        let oneof = &rule.def.mandatory_oneof;
        if !oneof.is_empty() && !oneof.iter().any(|name| has_attr(rule, attributes, name)) {
            result.add_error(stamp(
                ValidationError::at(
                    ctx,
                    ErrorCode::MandatoryOneofAttrMissing,
                    [tag_name.to_string(), list_param(oneof)],
                ),
                rule,
            ))?;
        }

        let exclusive = &rule.def.mutually_exclusive;
        let present = exclusive
            .iter()
            .filter(|name| has_attr(rule, attributes, name))
            .count();
        if present > 1 {
            result.add_error(stamp(
                ValidationError::at(
                    ctx,
                    ErrorCode::MutuallyExclusiveAttrs,
                    [tag_name.to_string(), list_param(exclusive)],
                ),
                rule,
            ))?;
        }

        Ok(())
    }

    fn emit_global_errors(
        &mut self,
        ctx: &ValidationContext,
        result: &mut ValidationResult,
        originator: &DocumentScanner,
    ) -> Result<()> {
        log::debug!(
            "global checks for '{}' requested by {}",
            self.rules.name,
            originator.name()
        );

        for rule in self.rules.tags().iter().filter(|r| r.def.mandatory) {
            if self.seen_count(&rule.def.name) == 0 {
                result.add_error(stamp(
                    ValidationError::at(
                        ctx,
                        ErrorCode::MandatoryTagMissing,
                        [rule.def.name.as_str()],
                    ),
                    rule,
                ))?;
            }
        }

        for tag in &self.seen_order {
            let Some(rule) = self.rules.get_tag(tag) else {
                continue;
            };
            for required in &rule.def.requires {
                if self.seen_count(required) == 0 {
                    result.add_error(stamp(
                        ValidationError::at(
                            ctx,
                            ErrorCode::TagRequiredByMissing,
                            [required.as_str(), tag.as_str()],
                        ),
                        rule,
                    ))?;
                }
            }
        }

        Ok(())
    }
}
