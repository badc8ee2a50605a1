pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{MenuState, Note, NoteChanges, SortKey};
pub use storage::{MemoryStorage, SqliteStorage, Storage};
pub use store::{NoteStore, SystemClock};
pub use utils::Profile;
