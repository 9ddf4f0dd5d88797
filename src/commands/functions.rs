//! List kernel functions

use colored::*;
use eyre::Result;

use crate::brand::registry::BrandRegistry;
use crate::cli::OutputFormat;
use crate::plugin::{BrandPlugin, KernelPlugin};

pub fn run(registry: BrandRegistry, format: OutputFormat) -> Result<()> {
    let plugin = BrandPlugin::new(registry);
    let functions = plugin.functions();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(functions)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(functions)?),
        OutputFormat::Text => {
            println!("{} {}", "Functions of plugin".bold(), plugin.name().green().bold());
            println!();
            for function in functions {
                let params: Vec<&str> = function.parameters.iter().map(|p| p.name).collect();
                println!("  {} {}({})", "●".green(), function.name.bold(), params.join(", "));
                println!("    {}", function.description.dimmed());
            }
        }
    }

    Ok(())
}
