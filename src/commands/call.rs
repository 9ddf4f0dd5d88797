//! One-shot function invocation

use eyre::Result;

use crate::brand::registry::BrandRegistry;
use crate::plugin::{BrandPlugin, KernelPlugin};

pub fn run(registry: BrandRegistry, function: &str, args: &[String]) -> Result<()> {
    let mut plugin = BrandPlugin::new(registry);
    let arguments = plugin.bind_positional(function, args)?;

    let output = plugin.invoke(function, &arguments)?;
    log::debug!(
        "{} returned; current brand is '{}'",
        function,
        plugin.registry().get_current_brand_key()
    );
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }

    Ok(())
}
