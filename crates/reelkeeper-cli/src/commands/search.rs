use crate::commands::{open_store, search_client};
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use indicatif::ProgressBar;
use reel_config::PathManager;
use reel_models::{Membership, MovieRecord};
use reel_search::SearchError;
use reel_store::ListStore;
use serde_json::json;
use std::time::Duration;

pub async fn run_search(query: &str, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();

    let client = match search_client(&path_manager) {
        Ok(client) => client,
        Err(e) => {
            output.error(format!("{:#}", e));
            return Ok(());
        }
    };

    let spinner = if output.format() == OutputFormat::Human && !output.is_quiet() {
        let pb = ProgressBar::new_spinner();
        pb.set_message(format!("Searching for \"{}\"...", query));
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    } else {
        None
    };

    let result = client.search(query).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let records = match result {
        Ok(records) => records,
        // A stale response belongs to a search the user has already replaced
        Err(SearchError::Superseded) => return Ok(()),
        Err(e) => {
            output.error(e.to_string());
            return Ok(());
        }
    };

    let store = open_store(&path_manager);

    match output.format() {
        OutputFormat::Human => render_results(query, &records, &store, output),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let results: Vec<serde_json::Value> = records
                .iter()
                .map(|r| {
                    json!({
                        "imdb_id": r.imdb_id,
                        "title": r.title,
                        "year": r.year,
                        "media_type": r.media_type.to_string(),
                        "poster": r.poster,
                        "membership": membership_label(store.membership_of(&r.imdb_id)),
                    })
                })
                .collect();

            output.json(&json!({
                "type": "search_results",
                "query": query,
                "results": results,
            }));
        }
    }

    Ok(())
}

fn membership_label(membership: Membership) -> &'static str {
    match membership {
        Membership::NotTracked => "",
        Membership::InToWatch => "to-watch",
        Membership::InWatched => "watched",
    }
}

fn render_results(query: &str, records: &[MovieRecord], store: &ListStore, output: &Output) {
    if output.is_quiet() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Year", "Type", "Tracked"]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.imdb_id),
            Cell::new(&record.title),
            Cell::new(&record.year),
            Cell::new(record.media_type.to_string()),
            Cell::new(membership_label(store.membership_of(&record.imdb_id))),
        ]);
    }

    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);

    output.info(format!(
        "{} result(s) for \"{}\". Add one with 'reelkeeper add <ID>'.",
        records.len(),
        query
    ));
}
