//! Theme command handler

use anyhow::{bail, Result};

use zennav_core::ThemeMode;

use super::{storage_error, Coordinator};
use crate::output::{Output, OutputFormat};

/// Show the theme, or set it to `light`, `dark` or `toggle`
pub fn theme(coordinator: &Coordinator, mode: Option<String>, output: &Output) -> Result<()> {
    let local = coordinator.local();
    let current = local.theme(system_theme());

    let next = match mode.as_deref() {
        None => {
            match output.format {
                OutputFormat::Json => output.print_json(&serde_json::json!({"theme": current})),
                _ => println!("{}", current),
            }
            return Ok(());
        }
        Some("toggle") => current.toggled(),
        Some(other) => match ThemeMode::parse(other) {
            Some(theme) => theme,
            None => bail!("Unknown theme '{}'. Use light, dark or toggle.", other),
        },
    };

    local.save_theme(next).map_err(storage_error)?;
    output.success(&format!("Theme set to {}", next));
    Ok(())
}

/// Terminal color scheme, from `COLORFGBG` ("fg;bg")
fn system_theme() -> ThemeMode {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| theme_from_colorfgbg(&value))
        .unwrap_or(ThemeMode::Light)
}

fn theme_from_colorfgbg(value: &str) -> Option<ThemeMode> {
    let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    // ANSI 0-6 and 8 are dark backgrounds
    if background <= 6 || background == 8 {
        Some(ThemeMode::Dark)
    } else {
        Some(ThemeMode::Light)
    }
}
