pub use chart::Chart;
pub use report::{Distribution, Output, Report};
pub use stats::Stats;
pub use text::grouped;

mod chart;
mod report;
mod stats;
mod text;

#[cfg(test)]
mod test;
