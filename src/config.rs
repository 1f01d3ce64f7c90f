//! Configuration management for the validator binary.
//!
//! Handles:
//! - Command-line argument parsing
//! - Locating rule and template tables

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::render::TemplateTable;
use crate::rules::RuleSet;

const RULES_FILE: &str = "rules.toml";
const TEMPLATES_FILE: &str = "templates.toml";

/// Command-line arguments for the validator
#[derive(Debug, Parser)]
#[command(name = "amp-validate")]
#[command(about = "Validate a parsed AMP document and report violations")]
#[command(version)]
pub struct Args {
    /// Element tree in JSON form, or '-' for stdin
    #[arg(help = "Parsed document (JSON element tree), '-' reads stdin")]
    pub input: PathBuf,

    /// Rule table to validate against
    #[arg(long, help = "TOML rule table (defaults to the built-in AMP core rules)")]
    pub rules: Option<PathBuf>,

    /// Message templates for the report
    #[arg(long, help = "TOML message templates, keyed by error code")]
    pub templates: Option<PathBuf>,

    /// Emit the annotated result as JSON
    #[arg(long, help = "Print the result as JSON instead of a text report")]
    pub json: bool,

    /// Log level
    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    /// Rule table file; `None` means the built-in table
    pub rules_path: Option<PathBuf>,
    /// Template file; `None` means the built-in templates
    pub templates_path: Option<PathBuf>,
    pub json: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let user_dir = dirs::config_dir().map(|dir| dir.join("amp-validator"));
        Ok(Self::resolve(args, user_dir.as_deref()))
    }

    /// Explicit paths win; otherwise tables found in `user_dir` are used
    pub fn resolve(args: Args, user_dir: Option<&Path>) -> Self {
        let lookup = |explicit: Option<PathBuf>, file: &str| {
            explicit.or_else(|| {
                let candidate = user_dir?.join(file);
                candidate.is_file().then_some(candidate)
            })
        };

        Config {
            input: args.input,
            rules_path: lookup(args.rules, RULES_FILE),
            templates_path: lookup(args.templates, TEMPLATES_FILE),
            json: args.json,
            log_level: args.log_level,
        }
    }

    pub fn load_rules(&self) -> Result<RuleSet> {
        match &self.rules_path {
            Some(path) => RuleSet::from_file(path),
            None => Ok(RuleSet::builtin()?),
        }
    }

    pub fn load_templates(&self) -> Result<TemplateTable> {
        match &self.templates_path {
            Some(path) => TemplateTable::from_file(path),
            None => Ok(TemplateTable::builtin()?),
        }
    }

    /// Whether the document comes from stdin
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}
