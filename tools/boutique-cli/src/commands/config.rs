//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use boutique_commerce::Currency;
use tracing_subscriber::EnvFilter;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, LogFormat};
use crate::context::{config_file_in, Context};

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.config.storage.dir);
    ctx.output.kv("cart_key", &ctx.config.storage.cart_key);
    ctx.output.kv("resolved", &ctx.data_dir().display().to_string());

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("currency", &ctx.config.store.currency);

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output.kv("format", ctx.config.logging.format.as_str());

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(config_path) = ctx
        .config_path
        .clone()
        .or_else(|| config_file_in(&ctx.cwd))
    else {
        bail!("No config file found. Run `boutique config init` to create one.");
    };
    let config_path = config_path.to_string_lossy().to_string();

    let mut config = CliConfig::load(&config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("boutique.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Returns `(errors, warnings)`.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if config.storage.dir.trim().is_empty() {
        errors.push("storage.dir must not be empty".to_string());
    }

    if config.storage.cart_key.trim().is_empty() {
        errors.push("storage.cart_key must not be empty".to_string());
    } else if !config.storage.cart_key.contains(':') {
        warnings.push(format!(
            "storage.cart_key '{}' has no namespace (e.g. boutique:cart)",
            config.storage.cart_key
        ));
    }

    if Currency::from_code(&config.store.currency).is_none() {
        errors.push(format!(
            "store.currency '{}' is not a supported currency",
            config.store.currency
        ));
    }

    if EnvFilter::try_new(&config.logging.level).is_err() {
        errors.push(format!(
            "logging.level '{}' is not a valid filter directive",
            config.logging.level
        ));
    }

    (errors, warnings)
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "dir"] => Ok(config.storage.dir.clone()),
        ["storage", "cart_key"] => Ok(config.storage.cart_key.clone()),
        ["store", "currency"] => Ok(config.store.currency.clone()),
        ["logging", "level"] => Ok(config.logging.level.clone()),
        ["logging", "format"] => Ok(config.logging.format.as_str().to_string()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "dir"] => config.storage.dir = value.to_string(),
        ["storage", "cart_key"] => config.storage.cart_key = value.to_string(),
        ["store", "currency"] => {
            let currency = Currency::from_code(value)
                .with_context(|| format!("Unknown currency code: {}", value))?;
            config.store.currency = currency.code().to_string();
        }
        ["logging", "level"] => config.logging.level = value.to_string(),
        ["logging", "format"] => config.logging.format = value.parse::<LogFormat>()?,
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        let (errors, warnings) = check_config(&CliConfig::default());
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_check_config_reports_problems() {
        let mut config = CliConfig::default();
        config.store.currency = "BTC".to_string();
        config.storage.cart_key = "cart".to_string();

        let (errors, warnings) = check_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("BTC"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_set_then_get() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "store.currency", "eur").unwrap();
        set_config_value(&mut config, "logging.format", "json").unwrap();

        assert_eq!(get_config_value(&config, "store.currency").unwrap(), "EUR");
        assert_eq!(get_config_value(&config, "logging.format").unwrap(), "json");
        assert!(set_config_value(&mut config, "store.currency", "doubloons").is_err());
        assert!(get_config_value(&config, "store.name").is_err());
    }
}
