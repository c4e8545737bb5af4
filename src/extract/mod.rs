pub use parse::parse;
pub use record::FlowRecord;
pub use toolkit::{count_args, filter_args, Tool, Toolkit};

mod parse;
mod record;
mod toolkit;
