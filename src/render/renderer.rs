//! Result Renderer
//!
//! Turns an annotated `ValidationResult` into the plain-text report:
//!
//! ```text
//! FAIL
//!
//! amp-img on line 5
//! - The mandatory attribute 'src' is missing in tag 'amp-img'.
//!    [code: MANDATORY_ATTR_MISSING category: NAMESPACE_TAG_PROBLEM see: https://...]
//! ```

use crate::document::ElementId;
use crate::validation::{annotate, Phase, ValidationError, ValidationResult, GLOBAL_WARNING};

use super::templates::{apply_format, TemplateTable};

#[derive(Debug, Clone)]
pub struct ResultRenderer {
    templates: TemplateTable,
}

impl ResultRenderer {
    pub fn new(templates: TemplateTable) -> Self {
        Self { templates }
    }

    /// The message for one error, without metadata
    pub fn render_error_message(&self, error: &ValidationError) -> String {
        match self.templates.get(error.code) {
            Some(template) if !error.params.is_empty() => apply_format(template, &error.params),
            _ => {
                let mut rendered = error.code.to_string();
                if let Some(detail) = &error.detail {
                    rendered.push_str(detail);
                }
                rendered
            }
        }
    }

    /// Message, metadata bracket and optional fix description
    pub fn error_line(&self, error: &ValidationError) -> String {
        let mut line = format!("- {}\n   [code: {}", self.render_error_message(error), error.code);
        if let Some(category) = error.category() {
            line.push_str(&format!(" category: {}", category));
        }
        if let Some(url) = &error.spec_url {
            line.push_str(&format!(" see: {}", url));
        }
        line.push(']');
        if let Some(action) = &error.action_taken {
            line.push_str(&format!("\n   {}", action.human_description));
        }
        line
    }

    /// Categorize, seal and render the whole result
    ///
    /// After this call the result no longer accepts new errors.
    pub fn render(&self, result: &mut ValidationResult) -> String {
        annotate(result);
        result.seal();

        let mut rendered = if result.errors().is_empty() {
            "PASS\n".to_string()
        } else {
            format!("{}\n", result.status)
        };

        let mut last_context: Option<&str> = None;
        let mut last_local_element: Option<Option<ElementId>> = None;

        for error in result.errors() {
            let element_changed = error.phase == Phase::Local
                && last_local_element.is_some_and(|last| last != error.element);
            let context_changed = last_context != Some(error.context_string.as_str());

            if context_changed || element_changed {
                if error.context_string == GLOBAL_WARNING {
                    rendered.push_str("\nGLOBAL WARNING\n");
                } else {
                    let header = format!("\n{} on line {}\n", error.context_string, error.line);
                    rendered.push_str(&header);
                }
                last_context = Some(error.context_string.as_str());
            }
            if error.phase == Phase::Local {
                last_local_element = Some(error.element);
            }

            rendered.push_str(&self.error_line(error));
            rendered.push('\n');
        }

        log::debug!("rendered {} errors", result.errors().len());
        rendered
    }
}
