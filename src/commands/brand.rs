//! Brand inspection commands

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::brand::BrandConfig;
use crate::brand::registry::BrandRegistry;
use crate::cli::OutputFormat;

#[derive(Serialize)]
struct BrandSummary<'a> {
    key: &'a str,
    name: &'a str,
    current: bool,
}

pub fn list(registry: &BrandRegistry, format: OutputFormat) -> Result<()> {
    let current = registry.get_current_brand_key();
    let summaries: Vec<BrandSummary> = registry
        .brand_keys()
        .filter_map(|key| {
            registry.get_brand_config(Some(key)).map(|config| BrandSummary {
                key,
                name: &config.name,
                current: key == current,
            })
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Text => println!("{}", registry.list_brands()),
    }

    Ok(())
}

pub fn show(registry: &BrandRegistry, key: Option<&str>, format: OutputFormat) -> Result<()> {
    let config = registry.get_brand_config(key);
    let key = key.filter(|k| !k.is_empty()).unwrap_or(registry.get_current_brand_key());

    match format {
        OutputFormat::Json => match config {
            Some(config) => println!("{}", serde_json::to_string_pretty(config)?),
            None => println!("{{}}"),
        },
        OutputFormat::Yaml => match config {
            Some(config) => print!("{}", serde_yaml::to_string(config)?),
            None => println!("{{}}"),
        },
        OutputFormat::Text => match config {
            Some(config) => print_config(key, config),
            None => eyre::bail!("Brand '{}' not found in {}", key, registry.config_path().display()),
        },
    }

    Ok(())
}

fn print_config(key: &str, config: &BrandConfig) {
    println!("{} {} ({})", "Brand:".bold(), config.name.green().bold(), key.dimmed());
    println!();
    println!("{} {}", "Tone:".bold(), config.tone);
    println!("{} {}", "Style:".bold(), config.style);

    if !config.key_phrases.is_empty() {
        println!();
        println!("{}", "Key Phrases:".bold());
        for phrase in &config.key_phrases {
            println!("  {} {}", "•".cyan(), phrase.italic());
        }
    }

    if !config.values.is_empty() {
        println!();
        println!("{}", "Values:".bold());
        for value in &config.values {
            println!("  {} {}", "•".cyan(), value);
        }
    }
}

pub fn personality(registry: &BrandRegistry) -> Result<()> {
    print!("{}", registry.get_brand_personality());
    Ok(())
}

pub fn name(registry: &BrandRegistry) -> Result<()> {
    println!("{}", registry.get_brand_name());
    Ok(())
}

pub fn set(mut registry: BrandRegistry, key: &str, quiet: bool) -> Result<()> {
    if !quiet {
        eprintln!(
            "{} Switching brand: {} -> {}",
            "→".blue(),
            registry.get_current_brand_key().dimmed(),
            key.cyan()
        );
    }

    println!("{}", registry.set_brand(key));
    Ok(())
}
