//! Site command handlers

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use zennav_core::SiteField;

use super::{authorize, save, storage_error, Coordinator};
use crate::output::Output;

/// Show the committed configuration
pub fn show(coordinator: &Coordinator, output: &Output) -> Result<()> {
    output.print_site(coordinator.committed());
    Ok(())
}

/// Set the site title, description or password
pub async fn set(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    field: String,
    value: String,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    let field: SiteField = field.parse()?;

    let mut session = coordinator.begin_edit();
    session.set_site_field(field, value);
    save(coordinator, session, output).await
}

/// Write the committed configuration as JSON to a file or stdout
pub fn export(
    coordinator: &Coordinator,
    password: Option<&str>,
    path: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    let json = serde_json::to_string_pretty(coordinator.committed())
        .context("Failed to encode configuration")?;

    match path {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {:?}", path))?;
            output.success(&format!("Exported configuration to {}", path.display()));
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Drop the stored configuration and return to the default document
pub fn reset(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    yes: bool,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;

    if !yes && !confirm("Reset to the default configuration? Local changes will be lost.")? {
        output.message("Cancelled.");
        return Ok(());
    }

    coordinator.reset().map_err(storage_error)?;
    output.success("Configuration reset to defaults. The cloud snapshot is unchanged.");
    Ok(())
}

/// Ask for confirmation on stdin
///
/// Without a terminal there is nobody to answer, so the command is refused.
fn confirm(prompt: &str) -> Result<bool> {
    require_terminal(io::stdin().is_terminal())?;

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

fn require_terminal(is_terminal: bool) -> Result<()> {
    if !is_terminal {
        bail!("Refusing to reset without confirmation. Pass --yes to reset non-interactively.");
    }
    Ok(())
}
