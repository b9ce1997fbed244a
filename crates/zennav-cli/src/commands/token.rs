//! Sync token command handlers

use anyhow::{bail, Result};

use super::{authorize, storage_error, Coordinator};
use crate::output::{Output, OutputFormat};

pub fn set(
    coordinator: &Coordinator,
    password: Option<&str>,
    token: String,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    if token.trim().is_empty() {
        bail!("Token is empty. Use `zennav token clear` to remove it.");
    }

    coordinator
        .local()
        .save_credential(&token)
        .map_err(storage_error)?;
    output.success("Sync token saved. Saves will now be mirrored to your gist.");
    Ok(())
}

/// Show whether a token is stored, masked
pub fn show(coordinator: &Coordinator, output: &Output) -> Result<()> {
    let token = coordinator.local().credential();
    let masked = mask(&token);

    match output.format {
        OutputFormat::Json => output.print_json(&serde_json::json!({
            "configured": !token.is_empty(),
            "token": masked,
        })),
        OutputFormat::Quiet => {
            if let Some(masked) = masked {
                println!("{}", masked);
            }
        }
        OutputFormat::Human => match masked {
            Some(masked) => println!("Sync token: {}", masked),
            None => println!("Sync token: (not set)"),
        },
    }
    Ok(())
}

pub fn clear(coordinator: &Coordinator, password: Option<&str>, output: &Output) -> Result<()> {
    authorize(coordinator, password)?;
    coordinator
        .local()
        .clear_credential()
        .map_err(storage_error)?;
    output.success("Sync token removed. Cloud sync is off.");
    Ok(())
}

/// Check the stored token against the API
pub async fn verify(coordinator: &Coordinator, output: &Output) -> Result<()> {
    let token = coordinator.local().credential();
    if token.is_empty() {
        bail!("No sync token configured. Set one with `zennav token set <token>`.");
    }

    if coordinator.remote().verify_credential(&token).await {
        output.success("Token accepted.");
        Ok(())
    } else {
        bail!("Token was rejected or the API is unreachable.")
    }
}

/// First and last four characters of the token
fn mask(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return Some("*".repeat(chars.len()));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    Some(format!("{}…{}", head, tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), None);
        assert_eq!(mask("tok1").as_deref(), Some("****"));
        assert_eq!(mask("ghp_abcdefgh1234").as_deref(), Some("ghp_…1234"));
    }
}
