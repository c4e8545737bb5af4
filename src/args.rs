use log::LevelFilter::{self, *};

pub const CRATE: &str = env!("CARGO_PKG_NAME");

// Log filter for the number of -v flags given.
pub fn verbosity(count: u64) -> (Option<&'static str>, LevelFilter) {
    match count {
        0 => (Some(CRATE), Info),
        1 => (Some(CRATE), Debug),
        2 => (Some(CRATE), Trace),
        _ => (None,        Trace),
    }
}
