//! Command-line front end over the note and folder stores.
mod app;
mod args;

pub use app::*;
pub use args::*;
