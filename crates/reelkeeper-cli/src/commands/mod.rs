pub mod clear;
pub mod config;
pub mod search;
pub mod show;
pub mod track;

use reel_config::{Config, PathManager};
use reel_search::SearchClient;
use reel_store::{FileStorage, ListStore};
use tracing::debug;

/// Open the list store over the on-disk blobs, with a trace listener so
/// every list change shows up in the logs.
pub(crate) fn open_store(path_manager: &PathManager) -> ListStore {
    let storage = FileStorage::new(path_manager.data_dir().to_path_buf());
    let mut store = ListStore::open(Box::new(storage));
    store.subscribe(Box::new(|event| debug!(?event, "list changed")));
    store
}

pub(crate) fn search_client(path_manager: &PathManager) -> anyhow::Result<SearchClient> {
    let config_file = path_manager.config_file();
    if !config_file.exists() {
        anyhow::bail!(
            "No configuration found at {}. Run 'reelkeeper config set-key' first.",
            config_file.display()
        );
    }

    let config = Config::load_from_file(&config_file)?;
    config.validate()?;
    Ok(SearchClient::new(config.search.api_key))
}
