//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use stickies_core::Config;

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
                    "storage": config.storage.to_string(),
                    "viewport_width": config.viewport_width,
                    "viewport_height": config.viewport_height,
                    "cell_width": config.cell_width,
                    "cell_height": config.cell_height,
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
            println!("  data_dir:        {}", config.data_dir.display());
            println!("  storage:         {}", config.storage);
            println!("  viewport_width:  {}", config.viewport_width);
            println!("  viewport_height: {}", config.viewport_height);
            println!("  cell_width:      {}", config.cell_width);
            println!("  cell_height:     {}", config.cell_height);
            println!(
                "  log_file:        {}",
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

    apply_setting(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "storage" => {
            config.storage = value.parse()?;
        }
        "viewport_width" => {
            config.viewport_width = parse_dimension(key, value)?;
        }
        "viewport_height" => {
            config.viewport_height = parse_dimension(key, value)?;
        }
        "cell_width" => {
            config.cell_width = parse_dimension(key, value)?;
        }
        "cell_height" => {
            config.cell_height = parse_dimension(key, value)?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, storage, viewport_width, viewport_height, \
                 cell_width, cell_height, log_file",
                key
            );
        }
    }
    Ok(())
}

fn parse_dimension(key: &str, value: &str) -> Result<i32> {
    let parsed: i32 = value
        .parse()
        .with_context(|| format!("Invalid value for {}. Use a whole number of pixels.", key))?;
    if parsed <= 0 {
        bail!("{} must be positive, got {}", key, parsed);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickies_core::StorageBackend;

    #[test]
    fn test_apply_setting_known_keys() {
        let mut config = Config::default();

        apply_setting(&mut config, "storage", "sqlite").unwrap();
        apply_setting(&mut config, "viewport_width", "1920").unwrap();
        apply_setting(&mut config, "cell_height", "18").unwrap();
        apply_setting(&mut config, "log_file", "/tmp/stickies.log").unwrap();

        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.viewport_width, 1920);
        assert_eq!(config.cell_height, 18);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/stickies.log")));

        apply_setting(&mut config, "log_file", "none").unwrap();
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_apply_setting_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply_setting(&mut config, "viewport_width", "wide").is_err());
        assert!(apply_setting(&mut config, "cell_width", "0").is_err());
        assert!(apply_setting(&mut config, "storage", "cloud").is_err());
        assert!(apply_setting(&mut config, "sync_url", "ws://x").is_err());
    }

    #[test]
    fn test_set_writes_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!("data_dir = {:?}\n", temp_dir.path().join("data")),
        )
        .unwrap();
        let output = Output::new(OutputFormat::Quiet);

        set(
            "viewport_height".to_string(),
            "900".to_string(),
            Some(&config_path),
            &output,
        )
        .unwrap();

        let saved = std::fs::read_to_string(&config_path).unwrap();
        assert!(saved.contains("viewport_height = 900"));
    }
}
