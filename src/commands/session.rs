//! Serve function calls over stdin/stdout

use eyre::Result;
use std::io;

use crate::brand::registry::BrandRegistry;
use crate::plugin::{BrandPlugin, session};

pub fn run(registry: BrandRegistry) -> Result<()> {
    let mut plugin = BrandPlugin::new(registry);
    let stdin = io::stdin();
    let stdout = io::stdout();

    session::run(&mut plugin, stdin.lock(), stdout.lock())?;
    Ok(())
}
