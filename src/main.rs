use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result};

use amp_validator::config::Config;
use amp_validator::{
    validate_document, Document, ResultRenderer, TableRuleEngine, ValidationResult,
};

fn read_input(config: &Config) -> Result<String> {
    if config.reads_stdin() {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("reading document from stdin")?;
        Ok(content)
    } else {
        std::fs::read_to_string(&config.input)
            .with_context(|| format!("reading document from {}", config.input.display()))
    }
}

fn run(config: &Config) -> Result<bool> {
    let rules = config.load_rules()?;
    let renderer = ResultRenderer::new(config.load_templates()?);
    let content = read_input(config)?;

    let mut result = match Document::from_json_str(&content) {
        Ok(document) => {
            let mut engine = TableRuleEngine::new(&rules);
            validate_document(&document, &mut engine)?
        }
        Err(e) => {
            log::warn!("could not load {}: {}", config.input.display(), e);
            ValidationResult::from_parse_failure(e.to_string())
        }
    };

    if config.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", renderer.render(&mut result));
    }
    Ok(result.is_valid())
}

fn main() -> ExitCode {
    let config = match Config::from_args_and_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            log::error!("validation aborted: {:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
