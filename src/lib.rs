//! Developer tools for manually testing a USB mass storage music player:
//! a static file server for a music directory and a generator for synthetic
//! directory trees of placeholder tracks.

pub mod config;
pub mod file;
pub mod generator;
pub mod handler;
pub mod http_date;
pub mod listing;
pub mod logging;
pub mod path;
pub mod range;
pub mod scenario;
pub mod server;
pub mod shutdown;
pub mod traits;
