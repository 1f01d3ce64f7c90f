//! End-to-end tests: scan, categorize and render
use std::collections::HashMap;

use amp_validator::validation::{Phase, GLOBAL_WARNING};
use amp_validator::{
    validate_document, AttributeSet, Document, DocumentScanner, Error, ErrorCategory, ErrorCode,
    ResultRenderer, RuleEngine, RuleSet, Severity, TableRuleEngine, TemplateTable,
    ValidationContext, ValidationError, ValidationResult, ValidationStatus,
};

/// Appends one scripted error per element name and nothing globally
struct Scripted {
    per_tag: HashMap<&'static str, ErrorCode>,
    seen: Vec<String>,
}

impl RuleEngine for Scripted {
    fn validate_tag(
        &mut self,
        ctx: &ValidationContext,
        tag_name: &str,
        _attributes: &AttributeSet,
        result: &mut ValidationResult,
    ) -> amp_validator::Result<()> {
        self.seen.push(tag_name.to_string());
        if let Some(code) = self.per_tag.get(tag_name) {
            result.add_error(ValidationError::at(ctx, *code, [tag_name]))?;
        }
        Ok(())
    }

    fn emit_global_errors(
        &mut self,
        _ctx: &ValidationContext,
        _result: &mut ValidationResult,
        _originator: &DocumentScanner,
    ) -> amp_validator::Result<()> {
        Ok(())
    }
}

fn deep_document(width: usize, depth: usize) -> Document {
    let mut doc = Document::new();
    let root = doc.add_root("html", 1).unwrap();
    let mut line = 1;
    let mut frontier = vec![root];
    for _ in 0..depth {
        let mut next = Vec::new();
        for parent in frontier {
            for _ in 0..width {
                line += 1;
                next.push(doc.append_child(parent, "div", line).unwrap());
            }
        }
        frontier = next;
    }
    doc
}

fn renderer_with(templates: &[(ErrorCode, &str)]) -> ResultRenderer {
    let by_code = templates
        .iter()
        .map(|(code, t)| (*code, t.to_string()))
        .collect();
    ResultRenderer::new(TemplateTable::new(by_code))
}

#[test]
fn test_traversal_completeness() {
    let doc = deep_document(3, 4);
    let mut engine = Scripted {
        per_tag: HashMap::from([("div", ErrorCode::DisallowedTag)]),
        seen: Vec::new(),
    };
    let mut ctx = ValidationContext::new();
    let mut result = ValidationResult::new();

    DocumentScanner::new()
        .scan(&doc, &mut ctx, &mut engine, &mut result)
        .unwrap();

    assert_eq!(engine.seen.len(), doc.len());
    assert_eq!(ctx.tags_processed(), doc.len());
    assert_eq!(result.tags_processed, doc.len());
    assert_eq!(engine.seen[0], "html");

    // Errors arrive in visit order, one per div
    let visited: Vec<_> = doc.iter().skip(1).map(|e| Some(e.id)).collect();
    let reported: Vec<_> = result.errors().iter().map(|e| e.element).collect();
    assert_eq!(reported, visited);
}

#[test]
fn test_grouping_headers() {
    let mut doc = Document::new();
    let body = doc.add_root("body", 4).unwrap();
    let img = doc.append_child(body, "amp-img", 5).unwrap();

    let mut result = ValidationResult::new();
    let first = ValidationError::new(ErrorCode::MandatoryAttrMissing, ["src", "amp-img"])
        .with_phase(Phase::Local)
        .with_element(img)
        .with_line(5)
        .with_context_string("amp-img on line 5");
    let second = ValidationError::new(ErrorCode::DisallowedAttr, ["onclick", "amp-img"])
        .with_phase(Phase::Local)
        .with_element(img)
        .with_line(5)
        .with_context_string("amp-img on line 5");
    let third = ValidationError::new(ErrorCode::DisallowedTag, ["blink"])
        .with_phase(Phase::Local)
        .with_element(body)
        .with_line(4)
        .with_context_string("body");
    result.add_error(first).unwrap();
    result.add_error(second).unwrap();
    result.add_error(third).unwrap();

    let rendered = renderer_with(&[]).render(&mut result);
    let lines: Vec<_> = rendered.lines().collect();
    let headers: Vec<_> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| *i > 0 && lines[i - 1].is_empty())
        .map(|(_, l)| *l)
        .collect();

    assert_eq!(headers, vec!["amp-img on line 5 on line 5", "body on line 4"]);
    let second_header = lines.iter().position(|l| *l == "body on line 4").unwrap();
    let third_error = lines.iter().position(|l| *l == "- DISALLOWED_TAG").unwrap();
    let second_error = lines.iter().position(|l| *l == "- DISALLOWED_ATTR").unwrap();
    assert!(second_error < second_header);
    assert_eq!(third_error, second_header + 1);
}

#[test]
fn test_new_group_when_element_changes() {
    let mut doc = Document::new();
    let body = doc.add_root("body", 1).unwrap();
    let a = doc.append_child(body, "p", 2).unwrap();
    let b = doc.append_child(body, "p", 3).unwrap();

    let mut result = ValidationResult::new();
    for (id, line) in [(a, 2), (b, 3)] {
        result
            .add_error(
                ValidationError::new(ErrorCode::DisallowedAttr, ["style", "p"])
                    .with_phase(Phase::Local)
                    .with_element(id)
                    .with_line(line)
                    .with_context_string("p"),
            )
            .unwrap();
    }
    // Global errors never split a group by element
    for _ in 0..2 {
        result
            .add_error(ValidationError::new(ErrorCode::MandatoryTagMissing, ["head"]))
            .unwrap();
    }

    let rendered = renderer_with(&[]).render(&mut result);
    assert_eq!(rendered.matches("p on line").count(), 2);
    assert_eq!(rendered.matches("GLOBAL WARNING").count(), 1);
    assert!(rendered.contains("\np on line 2\n"));
    assert!(rendered.contains("\np on line 3\n"));
}

#[test]
fn test_pass_renders_single_line() {
    let mut result = ValidationResult::new();
    assert_eq!(renderer_with(&[]).render(&mut result), "PASS\n");
}

#[test]
fn test_render_seals_result() {
    let mut result = ValidationResult::new();
    renderer_with(&[]).render(&mut result);
    let err = result
        .add_error(ValidationError::new(ErrorCode::DisallowedTag, ["font"]))
        .unwrap_err();
    assert!(matches!(err, Error::ResultSealed));
}

#[test]
fn test_full_report_with_builtin_tables() {
    let doc = Document::from_json_str(
        r#"{"name": "html", "line": 1, "children": [
            {"name": "head", "line": 2},
            {"name": "body", "line": 4, "children": [
                {"name": "img", "line": 5, "attributes": [["src", "a.png"]]},
                {"name": "amp-img", "line": 6, "attributes": [["layout", "huge"], ["src", "b.png"]]}
            ]}
        ]}"#,
    )
    .unwrap();

    let rules = RuleSet::builtin().unwrap();
    let mut engine = TableRuleEngine::new(&rules);
    let mut result = validate_document(&doc, &mut engine).unwrap();

    assert_eq!(result.status, ValidationStatus::Fail);
    let summary: Vec<_> = result
        .errors()
        .iter()
        .map(|e| (e.code, e.category()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                ErrorCode::MandatoryAttrMissing,
                Some(ErrorCategory::MandatoryTagMissingOrIncorrect)
            ),
            (
                ErrorCode::DisallowedTag,
                Some(ErrorCategory::DisallowedHtmlWithEquivalent)
            ),
            (ErrorCode::InvalidAttrValue, Some(ErrorCategory::LayoutProblem)),
            (
                ErrorCode::TagRequiredByMissing,
                Some(ErrorCategory::NamespaceTagProblem)
            ),
        ]
    );

    let renderer = ResultRenderer::new(TemplateTable::builtin().unwrap());
    let rendered = renderer.render(&mut result);
    let expected_start = concat!(
        "FAIL\n\nhtml on line 1\n",
        "- The mandatory attribute '\\u26a' is missing in tag 'html'.\n"
    );
    assert!(rendered.starts_with(expected_start), "{}", rendered);
    assert!(rendered.contains("\nimg on line 5\n- The tag 'img' is disallowed.\n"));
    assert!(rendered.contains(concat!(
        "- The attribute 'layout' in tag 'amp-img' is set to the invalid value 'huge'.\n",
        "   [code: INVALID_ATTR_VALUE category: LAYOUT_PROBLEM",
        " see: https://amp.dev/documentation/components/amp-img]\n"
    )));
    assert!(rendered.ends_with(&format!(
        concat!(
            "\n{}\n",
            "- The 'script' tag is missing or incorrect, but required by 'amp-img'.\n",
            "   [code: TAG_REQUIRED_BY_MISSING category: NAMESPACE_TAG_PROBLEM",
            " see: https://amp.dev/documentation/components/amp-img]\n"
        ),
        GLOBAL_WARNING
    )));
}

#[test]
fn test_warnings_only_still_pass() {
    let doc = Document::from_json_str(
        r#"{"name": "html", "line": 1, "attributes": [["amp", ""]], "children": [
            {"name": "head", "line": 2},
            {"name": "body", "line": 3, "children": [{"name": "acronym", "line": 4}]}
        ]}"#,
    )
    .unwrap();

    let rules = RuleSet::builtin().unwrap();
    let mut engine = TableRuleEngine::new(&rules);
    let mut result = validate_document(&doc, &mut engine).unwrap();

    assert_eq!(result.errors().len(), 1);
    assert!(result.is_valid());
    let rendered = ResultRenderer::new(TemplateTable::builtin().unwrap()).render(&mut result);
    assert!(rendered.starts_with("PASS\n\nacronym on line 4\n"));
    assert!(rendered.contains("category: DEPRECATION"));
}

#[test]
fn test_deprecated_attribute_is_a_warning() {
    let doc = Document::from_json_str(
        r#"{"name": "html", "line": 1, "attributes": [["amp", ""]], "children": [
            {"name": "head", "line": 2, "children": [
                {"name": "script", "line": 3, "attributes": [
                    ["async", ""], ["src", "https://cdn.ampproject.org/v0.js"]
                ]}
            ]},
            {"name": "body", "line": 5, "children": [
                {"name": "amp-iframe", "line": 6, "attributes": [
                    ["src", "https://example.org/embed"], ["frameborder", "0"]
                ]}
            ]}
        ]}"#,
    )
    .unwrap();

    let rules = RuleSet::builtin().unwrap();
    let mut engine = TableRuleEngine::new(&rules);
    let mut result = validate_document(&doc, &mut engine).unwrap();

    assert_eq!(result.errors().len(), 1, "{:?}", result.errors());
    let error = &result.errors()[0];
    assert_eq!(error.code, ErrorCode::DeprecatedAttr);
    assert_eq!(error.params, vec!["frameborder", "amp-iframe", "style"]);
    assert_eq!(error.severity, Severity::Warning);
    assert_eq!(error.category(), Some(ErrorCategory::Deprecation));
    assert_eq!(result.status, ValidationStatus::Pass);

    let rendered = ResultRenderer::new(TemplateTable::builtin().unwrap()).render(&mut result);
    assert!(rendered.starts_with(concat!(
        "PASS\n\namp-iframe on line 6\n",
        "- The attribute 'frameborder' in tag 'amp-iframe' is deprecated - use 'style' instead.\n"
    )));
}

#[test]
fn test_unreadable_document_renders_unknown() {
    let err = Document::from_json_str(
        r#"{"name": "p", "attributes": [["class", "a"], ["class", "b"]]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateAttribute { .. }));

    let mut result = ValidationResult::from_parse_failure(err.to_string());
    assert!(!result.is_valid());

    let rendered = ResultRenderer::new(TemplateTable::builtin().unwrap()).render(&mut result);
    assert!(rendered.starts_with("UNKNOWN\n\nGLOBAL WARNING\n- UNKNOWN_CODE"), "{}", rendered);
    assert!(rendered.contains("[code: UNKNOWN_CODE category: UNKNOWN]"));
}
