//! Runtime config CLI commands: show, set, set-key, validate.

use std::collections::BTreeSet;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Password;

use parley_core::config::repository::ConfigRepository;
use parley_types::config::{ConfigKey, is_credential_key};

use crate::cli::spinner;
use crate::state::AppState;

/// Show the effective configuration and where each value comes from.
pub async fn show_config(state: &AppState, json: bool) -> Result<()> {
    let config = state.config_service.display_config().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let overridden: BTreeSet<String> = state
        .config_service
        .repo()
        .list()
        .await?
        .into_iter()
        .filter(|entry| !entry.value.trim().is_empty())
        .map(|entry| entry.key)
        .collect();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Key").fg(Color::White),
        Cell::new("Value").fg(Color::White),
        Cell::new("Source").fg(Color::White),
    ]);

    for (key, value) in &config {
        let shown = if value.is_empty() && is_credential_key(key) {
            Cell::new("(not set)").fg(Color::Yellow)
        } else {
            Cell::new(value)
        };
        let source = if overridden.contains(key) {
            Cell::new("override").fg(Color::Cyan)
        } else {
            Cell::new("default").fg(Color::DarkGrey)
        };
        table.add_row(vec![Cell::new(key).fg(Color::Cyan), shown, source]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

/// Override one setting. The API key is checked against the provider first.
pub async fn set_config(state: &AppState, key: ConfigKey, value: &str, json: bool) -> Result<()> {
    let probing = key.is_credential() && !value.trim().is_empty();
    let spinner = spinner("Checking API key...".to_string(), json || !probing)?;
    let result = state.config_service.set(key, value).await;
    spinner.finish_and_clear();
    result?;

    let cleared = value.trim().is_empty();
    if json {
        println!(
            "{}",
            serde_json::json!({"set": !cleared, "cleared": cleared, "key": key.as_str()})
        );
    } else if cleared {
        println!(
            "  {} '{}' reverted to default",
            style("✓").green().bold(),
            style(key).bold()
        );
    } else {
        println!(
            "  {} '{}' updated",
            style("✓").green().bold(),
            style(key).bold()
        );
    }

    Ok(())
}

/// Store a new API key, prompting with hidden input when no value is given.
///
/// # Examples
///
/// ```bash
/// # Secure prompt (recommended)
/// parley config set-key
///
/// # Script/automation mode
/// parley config set-key --value 0123abcd.xyz
/// ```
pub async fn set_key(state: &AppState, value: Option<&str>, json: bool) -> Result<()> {
    let api_key = match value {
        Some(v) => v.to_string(),
        None => Password::new()
            .with_prompt(format!("Enter value for {}", style("api_key").bold()))
            .interact()?,
    };

    let spinner = spinner("Checking API key...".to_string(), json)?;
    let result = state.config_service.set_credential(&api_key).await;
    spinner.finish_and_clear();
    result?;

    if json {
        println!("{}", serde_json::json!({"set": true, "key": "api_key"}));
    } else {
        println!(
            "  {} API key accepted and saved",
            style("✓").green().bold()
        );
    }

    Ok(())
}

/// Probe the configured API key.
pub async fn validate(state: &AppState, json: bool) -> Result<()> {
    let spinner = spinner("Checking API key...".to_string(), json)?;
    let result = state.config_service.validate_credential().await;
    spinner.finish_and_clear();
    let check = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&check)?);
        return Ok(());
    }

    if check.valid {
        println!("  {} API key is valid", style("✓").green().bold());
    } else {
        println!(
            "  {} API key is not usable: {}",
            style("✗").red().bold(),
            check.error.as_deref().unwrap_or("unknown error")
        );
        println!(
            "  {}",
            style("Set a new one with: parley config set-key").dim()
        );
    }

    Ok(())
}
