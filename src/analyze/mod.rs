pub use analyze::analyze;

mod analyze;
