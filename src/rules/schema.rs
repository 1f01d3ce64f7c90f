//! Rule Table Schema
//!
//! Serde types for rule tables written in TOML, and the compiled `RuleSet`
//! the engine evaluates against.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Rules shipped with the crate
const EMBEDDED_RULES: &str = include_str!("../../resources/rules.toml");

/// Root rule file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleFile {
    pub rules: RulesMeta,
    #[serde(default)]
    pub tags: Vec<TagDef>,
}

/// Rule table metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RulesMeta {
    pub name: String,
    pub version: Option<String>,
    /// Attributes allowed on every tag, with any value
    #[serde(default)]
    pub global_attrs: Vec<String>,
}

/// Definition of one permitted tag
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TagDef {
    pub name: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub unique: bool,
    pub mandatory_parent: Option<String>,
    /// Replacement tag, when this one is deprecated
    pub deprecation: Option<String>,
    /// Tags that must appear somewhere once this one is used
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub mandatory_oneof: Vec<String>,
    #[serde(default)]
    pub mutually_exclusive: Vec<String>,
    pub spec_url: Option<String>,
    #[serde(default)]
    pub attrs: Vec<AttrDef>,
}

/// Definition of one attribute of a tag
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AttrDef {
    pub name: String,
    #[serde(default)]
    pub alternative_names: Vec<String>,
    #[serde(default)]
    pub mandatory: bool,
    /// Pattern the whole value must match
    pub value_regex: Option<String>,
    /// Replacement attribute, when this one is deprecated
    pub deprecation: Option<String>,
}

impl AttrDef {
    /// Check if attribute matches name (including alternatives)
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.alternative_names.iter().any(|alt| alt == name)
    }
}

/// Attribute rule with its value pattern compiled
#[derive(Debug, Clone)]
pub struct AttrRule {
    pub def: AttrDef,
    pub value_pattern: Option<Regex>,
}

/// Tag rule with compiled attribute rules
#[derive(Debug, Clone)]
pub struct TagRule {
    pub def: TagDef,
    pub attrs: Vec<AttrRule>,
}

impl TagRule {
    pub fn find_attr(&self, name: &str) -> Option<&AttrRule> {
        self.attrs.iter().find(|attr| attr.def.matches_name(name))
    }
}

/// Runtime rule set (optimized for lookups)
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub name: String,
    pub version: Option<String>,
    global_attrs: Vec<String>,
    tags: Vec<TagRule>,
    by_name: HashMap<String, usize>,
}

impl RuleSet {
    /// The default rule table
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_RULES)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(content).map_err(|source| Error::Toml {
            what: "rule table",
            source,
        })?;
        Self::compile(file)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading rules from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("loading rules from {}", path.display()))
    }

    pub fn compile(file: RuleFile) -> Result<Self> {
        let mut tags = Vec::with_capacity(file.tags.len());
        let mut by_name = HashMap::new();

        for mut def in file.tags {
            def.name = def.name.to_lowercase();
            let attrs = def
                .attrs
                .iter()
                .map(|attr| compile_attr(&def.name, attr))
                .collect::<Result<Vec<_>>>()?;
            if by_name.insert(def.name.clone(), tags.len()).is_some() {
                log::warn!("tag '{}' defined twice; the last definition wins", def.name);
            }
            tags.push(TagRule { def, attrs });
        }

        log::debug!("compiled rule set '{}' with {} tags", file.rules.name, tags.len());
        Ok(Self {
            name: file.rules.name,
            version: file.rules.version,
            global_attrs: file.rules.global_attrs,
            tags,
            by_name,
        })
    }

    pub fn get_tag(&self, name: &str) -> Option<&TagRule> {
        self.by_name.get(name).map(|&i| &self.tags[i])
    }

    /// All tag rules in table order
    pub fn tags(&self) -> &[TagRule] {
        &self.tags
    }

    pub fn is_global_attr(&self, name: &str) -> bool {
        self.global_attrs.iter().any(|attr| attr == name)
    }
}

fn compile_attr(tag: &str, def: &AttrDef) -> Result<AttrRule> {
    let value_pattern = def
        .value_regex
        .as_deref()
        .map(|pattern| Regex::new(&format!("^(?:{})$", pattern)))
        .transpose()
        .map_err(|source| Error::Pattern {
            tag: tag.to_string(),
            attr: def.name.clone(),
            source,
        })?;

    Ok(AttrRule {
        def: def.clone(),
        value_pattern,
    })
}
