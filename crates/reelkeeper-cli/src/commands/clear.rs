use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use dialoguer::Confirm;
use reel_config::PathManager;
use reel_models::ListName;
use std::fs;

pub fn run_clear(all: bool, data: bool, config: bool, output: &Output) -> Result<()> {
    if !(all || data || config) {
        output.warn("No clear option specified. Use --data, --config, or --all");
        output.info("\nExample: reelkeeper clear --data");
        return Ok(());
    }

    let clear_data = all || data;
    let clear_config = all || config;

    // Only prompt when a human is watching
    if output.format() == OutputFormat::Human && !output.is_quiet() {
        let what = match (clear_data, clear_config) {
            (true, true) => "your lists and configuration",
            (true, false) => "your lists",
            _ => "your configuration",
        };

        let confirmed = Confirm::new()
            .with_prompt(format!("Permanently delete {}?", what))
            .default(false)
            .interact()?;
        if !confirmed {
            output.info("Nothing deleted");
            return Ok(());
        }
    }

    let path_manager = PathManager::default();

    if clear_data {
        clear_lists(&path_manager, output)?;
    }

    if clear_config {
        clear_config_file(&path_manager, output)?;
    }

    Ok(())
}

fn clear_lists(path_manager: &PathManager, output: &Output) -> Result<()> {
    let mut removed_any = false;

    for list in [ListName::ToWatch, ListName::Watched] {
        let blob = path_manager
            .data_dir()
            .join(format!("{}.json", list.as_key()));
        if blob.exists() {
            fs::remove_file(&blob).map_err(|e| {
                color_eyre::eyre::eyre!("Failed to remove {}: {}", blob.display(), e)
            })?;
            output.success(format!("Cleared the {} list", list));
            removed_any = true;
        }
    }

    if !removed_any {
        output.info("No stored lists found to clear");
    }

    Ok(())
}

fn clear_config_file(path_manager: &PathManager, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();

    if config_file.exists() {
        fs::remove_file(&config_file).map_err(|e| {
            color_eyre::eyre::eyre!("Failed to remove {}: {}", config_file.display(), e)
        })?;
        output.success(format!("Cleared configuration: {}", config_file.display()));
    } else {
        output.info("No configuration file found to clear");
    }

    Ok(())
}
