pub use features::Features;
pub use label::{ClassifiedRecord, Label};
pub use nearest::{Exemplar, Nearest};
pub use strategy::{classify_all, Classifier, Strategy};
pub use tree::{Tree, TreeState};

mod features;
mod label;
mod nearest;
mod strategy;
mod tree;

#[cfg(test)]
mod test;
