//! Note-taking state management library
//!
//! This library keeps notes and folders in memory, persists each collection as
//! a JSON blob in a key-value store, and derives filtered, sorted and tagged
//! views of the notes.

mod cli;
mod config;
mod errors;
mod folder;
mod folder_store;
mod helper;
mod note;
mod note_store;
mod query;
mod services;
mod storage;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use folder::*;
pub use folder_store::*;
pub use helper::*;
pub use note::*;
pub use note_store::*;
pub use query::*;
pub use services::*;
pub use storage::*;
pub use types::*;
