//! Write retention counts on a filesystem

use super::Invocation;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use policy::Runner;

pub fn run(invocation: &Invocation<'_>) -> Result<()> {
    let runner = Runner::new(invocation.store, invocation.config);
    let written = runner
        .init(invocation.filesystem, invocation.count)
        .with_context(|| format!("Failed to initialize {}", invocation.filesystem))?;

    for property in &written {
        println!(
            "{} {}={} {}",
            "✓".green(),
            property,
            invocation.count,
            format!("on {}", invocation.filesystem).dimmed()
        );
    }

    Ok(())
}
