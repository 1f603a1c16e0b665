use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use dialoguer::Input;
use reel_config::{Config, PathManager};
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::SetKey { key } => set_key(key, output),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if !config_file.exists() {
        output.warn(format!(
            "Configuration file not found at: {}",
            config_file.display()
        ));
        output.info("Run 'reelkeeper config set-key' to create it.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file).map_err(|e| {
        color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e)
    })?;

    let key_display = if config.is_configured() {
        if full {
            config.search.api_key.clone()
        } else {
            mask_string(&config.search.api_key)
        }
    } else {
        "not set".to_string()
    };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
            ]);
            table.add_row(vec![
                Cell::new("Config file"),
                Cell::new(config_file.display().to_string()),
            ]);
            table.add_row(vec![
                Cell::new("Data directory"),
                Cell::new(path_manager.data_dir().display().to_string()),
            ]);
            table.add_row(vec![Cell::new("OMDb API key"), Cell::new(key_display)]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "type": "config",
                "config_file": config_file.display().to_string(),
                "data_dir": path_manager.data_dir().display().to_string(),
                "api_key": key_display,
                "configured": config.is_configured(),
            }));
        }
    }

    Ok(())
}

fn set_key(key: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let config_file = path_manager.config_file();

    let key = match key {
        Some(key) => key,
        None => Input::<String>::new()
            .with_prompt("OMDb API key (free at https://www.omdbapi.com/apikey.aspx)")
            .interact_text()?,
    };

    let key = key.trim().to_string();
    if key.is_empty() {
        output.error("API key cannot be empty");
        return Ok(());
    }

    // A malformed existing file starts over rather than blocking the update
    let mut config = if config_file.exists() {
        Config::load_from_file(&config_file).unwrap_or_default()
    } else {
        Config::default()
    };
    config.search.api_key = key;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config: {}", e))?;

    output.success(format!("API key saved to {}", config_file.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.len() <= 4 {
        "****".to_string()
    } else {
        format!("{}{}", &s[..4], "*".repeat(s.len() - 4))
    }
}
