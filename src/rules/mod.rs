//! Rule Tables
//!
//! TOML-defined tag and attribute rules, and the engine that checks elements
//! against them.

pub mod engine;
pub mod schema;

pub use engine::TableRuleEngine;
pub use schema::{AttrDef, RuleFile, RuleSet, TagDef};
