use crate::commands::{open_store, search_client};
use crate::output::Output;
use color_eyre::Result;
use reel_config::PathManager;
use reel_models::{ListName, Membership, MovieRecord};
use reel_store::{ListStore, StoreError};

pub async fn run_add(imdb_id: &str, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let Some(record) = fetch_record(&path_manager, imdb_id, output).await else {
        return Ok(());
    };

    let mut store = open_store(&path_manager);
    let title = record.title.clone();

    match store.add_to_watch(record) {
        Ok(()) => output.success(format!("\"{}\" added to your to-watch list", title)),
        Err(e @ StoreError::Persistence { .. }) => {
            output.warn(format!("\"{}\" was added for this session, but {}", title, e));
        }
        Err(e) => output.error(e.to_string()),
    }

    Ok(())
}

pub async fn run_watched(imdb_id: &str, rating: Option<u8>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let Some(record) = fetch_record(&path_manager, imdb_id, output).await else {
        return Ok(());
    };

    let mut store = open_store(&path_manager);
    let title = record.title.clone();
    let id = record.imdb_id.clone();
    let transferred = store.membership_of(&id) == Membership::InToWatch;

    match store.add_to_watched(record) {
        Ok(()) if transferred => {
            output.success(format!("\"{}\" moved from to-watch to watched", title));
        }
        Ok(()) => output.success(format!("\"{}\" added to your watched list", title)),
        Err(e @ StoreError::Persistence { .. }) => {
            output.warn(format!(
                "\"{}\" was marked watched for this session, but {}",
                title, e
            ));
        }
        Err(e) => {
            output.error(e.to_string());
            return Ok(());
        }
    }

    if let Some(stars) = rating {
        rate_in_store(&mut store, &id, &title, stars, output);
    }

    Ok(())
}

pub fn run_rate(imdb_id: &str, stars: u8, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let mut store = open_store(&path_manager);

    let Some(title) = store
        .watched()
        .iter()
        .find(|r| r.imdb_id == imdb_id)
        .map(|r| r.title.clone())
    else {
        output.warn(format!(
            "{} is not in your watched list; only watched titles can be rated",
            imdb_id
        ));
        return Ok(());
    };

    rate_in_store(&mut store, imdb_id, &title, stars, output);
    Ok(())
}

pub fn run_remove(imdb_id: &str, watched: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let mut store = open_store(&path_manager);

    let list = if watched {
        ListName::Watched
    } else {
        ListName::ToWatch
    };
    let entries = match list {
        ListName::ToWatch => store.to_watch(),
        ListName::Watched => store.watched(),
    };

    let Some(title) = entries
        .iter()
        .find(|r| r.imdb_id == imdb_id)
        .map(|r| r.title.clone())
    else {
        output.info(format!("{} is not in your {} list", imdb_id, list));
        return Ok(());
    };

    match store.remove(imdb_id, list) {
        Ok(()) => output.success(format!("Removed \"{}\" from your {} list", title, list)),
        Err(e) => output.warn(format!(
            "\"{}\" was removed for this session, but {}",
            title, e
        )),
    }

    Ok(())
}

fn rate_in_store(store: &mut ListStore, imdb_id: &str, title: &str, stars: u8, output: &Output) {
    match store.rate(imdb_id, stars) {
        Ok(()) if stars == 0 => output.success(format!("Cleared the rating on \"{}\"", title)),
        Ok(()) => output.success(format!("Rated \"{}\" {}/5", title, stars)),
        Err(e @ StoreError::Persistence { .. }) => {
            output.warn(format!("Rating kept for this session, but {}", e));
        }
        Err(e) => output.error(e.to_string()),
    }
}

async fn fetch_record(
    path_manager: &PathManager,
    imdb_id: &str,
    output: &Output,
) -> Option<MovieRecord> {
    let client = match search_client(path_manager) {
        Ok(client) => client,
        Err(e) => {
            output.error(format!("{:#}", e));
            return None;
        }
    };

    match client.lookup(imdb_id).await {
        Ok(record) => Some(record),
        Err(e) => {
            output.error(format!("Could not look up {}: {}", imdb_id, e));
            None
        }
    }
}
