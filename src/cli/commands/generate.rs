//! Generate Command
//!
//! Runs the full description-to-grid pipeline with settings resolved from
//! CLI flags over the loaded configuration.
//!
//! Usage:
//!   gridsmith generate "a small tavern with a hidden cellar"
//!   gridsmith generate "a prison block" --width 24 --height 12 -f json

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use secrecy::SecretString;

use crate::cli::ui::{Output, render};
use crate::config::{Config, ConfigLoader};
use crate::pipeline::{GenerateOptions, generate};
use crate::types::{Archetype, GenerationResult, GridsmithError, Result};

/// Flag values collected by the argument parser
#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub description: String,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub archetype: Option<String>,
    pub format: String,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub max_attempts: Option<usize>,
}

/// Run generation and print the result in the requested format
pub async fn run(args: GenerateArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let credential = resolve_credential(args.api_key.as_deref(), &config)?;

    // Reject unknown hints before spending a network attempt on them
    if let Some(hint) = args.archetype.as_deref() {
        Archetype::from_str(hint).map_err(GridsmithError::Config)?;
    }

    let output = Output::new();

    let mut options = GenerateOptions::new(credential);
    options.width = args.width.unwrap_or(config.generation.width);
    options.height = args.height.unwrap_or(config.generation.height);
    options.archetype_hint = args.archetype;
    options.max_attempts = Some(args.max_attempts.unwrap_or(config.generation.max_attempts));
    options.timeout = Some(Duration::from_secs(config.provider.timeout_secs));
    options.model = Some(args.model.unwrap_or_else(|| config.provider.model.clone()));
    options.api_base = Some(
        args.api_base
            .unwrap_or_else(|| config.provider.api_base.clone()),
    );
    options.temperature = Some(config.provider.temperature);
    options.max_tokens = Some(config.provider.max_tokens);
    options.on_progress = Some(Arc::new(move |status: &str| {
        Output::new().status(status);
    }));

    let result = generate(&args.description, options).await?;

    match args.format.as_str() {
        "json" => print_json(&result)?,
        _ => print_text(&output, &result),
    }

    Ok(())
}

/// Credential precedence: flag, env, config file
fn resolve_credential(flag: Option<&str>, config: &Config) -> Result<SecretString> {
    if let Some(key) = flag
        && !key.trim().is_empty()
    {
        return Ok(SecretString::from(key));
    }

    for var in ["GRIDSMITH_API_KEY", "OPENAI_API_KEY"] {
        if let Ok(key) = std::env::var(var)
            && !key.trim().is_empty()
        {
            return Ok(SecretString::from(key));
        }
    }

    if let Some(key) = config.provider.api_key.as_deref()
        && !key.trim().is_empty()
    {
        return Ok(SecretString::from(key));
    }

    Err(GridsmithError::Auth(
        "no API credential found; pass --api-key, set GRIDSMITH_API_KEY or OPENAI_API_KEY, \
         or add provider.api_key to the config"
            .to_string(),
    ))
}

fn print_text(output: &Output, result: &GenerationResult) {
    println!("{}", render::render_grid(&result.grid));
    println!();
    println!("{}", style(&result.metadata.interpretation).bold());
    if let Some(archetype) = &result.metadata.archetype {
        println!("  archetype: {}", archetype);
    }
    if !result.metadata.features.is_empty() {
        println!("  features:  {}", result.metadata.features.join(", "));
    }
    println!();
    output.status(&render::legend());
}

fn print_json(result: &GenerationResult) -> Result<()> {
    let doc = serde_json::json!({
        "width": result.grid.width(),
        "height": result.grid.height(),
        "grid": result.grid.to_codes(),
        "metadata": result.metadata,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
