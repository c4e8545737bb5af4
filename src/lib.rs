pub mod args;
pub mod classify;
pub mod config;
pub mod detect;
pub mod extract;
pub mod report;

pub use analyze::analyze;
pub use error::Error;

mod analyze;
mod error;
