//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use zennav_core::{Config, LookupFailurePolicy};

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "gist_api_url": config.gist_api_url,
                    "admin_password": config.admin_password.is_some(),
                    "lookup_failure": config.lookup_failure.as_str(),
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:       {}", config.data_dir.display());
            println!("  gist_api_url:   {}", config.gist_api_url);
            println!(
                "  admin_password: {}",
                if config.admin_password.is_some() {
                    "(set)"
                } else {
                    "(default)"
                }
            );
            println!("  lookup_failure: {}", config.lookup_failure.as_str());
            println!(
                "  log_file:       {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "gist_api_url" => {
            if value.is_empty() {
                bail!("gist_api_url cannot be empty");
            }
            config.gist_api_url = value.clone();
        }
        "admin_password" => {
            config.admin_password = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone())
            };
        }
        "lookup_failure" => {
            config.lookup_failure = LookupFailurePolicy::parse(&value).with_context(|| {
                format!(
                    "Invalid value for lookup_failure: '{}'. Use 'fail' or 'assume-absent'.",
                    value
                )
            })?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone().into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, gist_api_url, admin_password, lookup_failure, log_file",
                key
            );
        }
    }

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    let shown = if key == "admin_password" { "(hidden)" } else { value.as_str() };
    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}
