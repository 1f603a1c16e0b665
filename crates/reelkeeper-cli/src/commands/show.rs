use crate::commands::open_store;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use reel_config::PathManager;
use reel_models::MovieRecord;
use serde_json::json;

pub fn run_list(to_watch_only: bool, watched_only: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let store = open_store(&path_manager);

    let show_to_watch = !watched_only;
    let show_watched = !to_watch_only;

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if show_to_watch {
                render_list("To watch", store.to_watch(), false, output);
            }
            if show_watched {
                render_list("Watched", store.watched(), true, output);
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let mut payload = json!({ "type": "lists" });
            if show_to_watch {
                payload["to_watch"] = serde_json::to_value(store.to_watch())?;
            }
            if show_watched {
                payload["watched"] = serde_json::to_value(store.watched())?;
            }
            output.json(&payload);
        }
    }

    Ok(())
}

fn render_list(heading: &str, records: &[MovieRecord], with_rating: bool, output: &Output) {
    if records.is_empty() {
        output.info(format!(
            "{}: nothing here yet. Search for titles and add them.",
            heading
        ));
        return;
    }

    let mut table = Table::new();
    let mut header = vec!["ID", "Title", "Year", "Type", "Added"];
    if with_rating {
        header.push("Rating");
    }
    table.set_header(header);

    for record in records {
        let mut row = vec![
            Cell::new(&record.imdb_id),
            Cell::new(&record.title),
            Cell::new(&record.year),
            Cell::new(record.media_type.to_string()),
            Cell::new(record.added_at.format("%Y-%m-%d").to_string()),
        ];
        if with_rating {
            row.push(Cell::new(stars(record.rating)));
        }
        table.add_row(row);
    }

    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", heading);
    println!("{}", table);
}

fn stars(rating: u8) -> String {
    if rating == 0 {
        return "unrated".to_string();
    }

    let rating = rating.min(5) as usize;
    format!("{}{}", "★".repeat(rating), "☆".repeat(5 - rating))
}
