pub mod backup;
pub mod collect;
pub mod config;
pub mod date;
pub mod files;
pub mod job;
pub mod mover;
pub mod rename;
pub mod times;

mod error;
mod exiftool;
mod log;
mod progress;

pub use error::Error;
pub use job::{Job, Stages};
pub use log::tracing_init;
