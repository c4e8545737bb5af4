pub use detect::{bins, detect, AnomalyFlag};

mod detect;
