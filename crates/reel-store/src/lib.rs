pub mod error;
pub mod list_store;
pub mod storage;

pub use error::StoreError;
pub use list_store::{ListStore, Listener, StoreEvent};
pub use storage::{FileStorage, ListStorage, MemoryStorage};
