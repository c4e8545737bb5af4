pub mod date;

pub use config::{Config, MAX_BINS, MAX_BIN_SIZE};
pub use location::Location;

mod config;
mod location;
