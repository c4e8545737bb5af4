use log::trace;
use crate::extract::FlowRecord;
use super::features::scale;
use super::{Classifier, Features, Label};

pub const GRACE: u64 = 16;
pub const DEPTH: u32 = 2;
pub const DELTA: f64 = 1e-4;

// Band indices are u32 paths.
pub const MAX_DEPTH: u32 = 16;

// Streaming decision tree over the scaled packet rate. Each record is
// labelled by the leaf it reaches before that leaf learns from it.
#[derive(Clone, Debug)]
pub struct Tree {
    grace: u64,
    depth: u32,
    delta: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeState {
    nodes: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Leaf(Stats),
    Split { threshold: f64, left: usize, right: usize },
}

#[derive(Clone, Debug, PartialEq)]
struct Stats {
    count: u64,
    sum:   f64,
    min:   f64,
    max:   f64,
}

struct Position {
    index: usize,
    depth: u32,
    path:  u32,
}

impl Tree {
    pub fn new(grace: u64, depth: u32, delta: f64) -> Self {
        Self {
            grace: grace,
            depth: depth.min(MAX_DEPTH),
            delta: delta,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn bands(&self) -> u32 {
        1 << self.depth
    }

    fn label(&self, leaf: &Position) -> Label {
        let band = match self.depth.checked_sub(leaf.depth) {
            Some(n) => leaf.path << n,
            None    => leaf.path >> (leaf.depth - self.depth),
        };
        Label::new(format!("Q{}", band + 1))
    }

    // Hoeffding bound for a leaf's value range after n observations.
    fn bound(&self, range: f64, n: u64) -> f64 {
        range * ((1.0 / self.delta).ln() / (2.0 * n as f64)).sqrt()
    }

    fn learn(&self, state: &mut TreeState, leaf: Position, value: f64) {
        let stats = match &mut state.nodes[leaf.index] {
            Node::Leaf(stats) => stats,
            Node::Split { .. } => return,
        };

        stats.update(value);

        if stats.count < self.grace || leaf.depth >= self.depth {
            return;
        }

        let range = stats.max - stats.min;
        if range <= 0.0 || self.bound(range, stats.count) >= range / 2.0 {
            return;
        }

        let count     = stats.count;
        let threshold = stats.sum / count as f64;
        let left      = state.nodes.len();
        let right     = left + 1;

        trace!("splitting leaf {} at {:.3} after {} records", leaf.index, threshold, count);

        state.nodes[leaf.index] = Node::Split { threshold, left, right };
        state.nodes.push(Node::Leaf(Stats::default()));
        state.nodes.push(Node::Leaf(Stats::default()));
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(GRACE, DEPTH, DELTA)
    }
}

impl Classifier for Tree {
    type State = TreeState;

    fn classify(&self, record: &FlowRecord, mut state: TreeState) -> (Label, TreeState) {
        let value = match Features::extract(record) {
            Some(features) => scale(features.rate),
            None           => return (Label::unknown(), state),
        };

        let leaf  = state.descend(value);
        let label = self.label(&leaf);
        self.learn(&mut state, leaf, value);

        (label, state)
    }
}

impl TreeState {
    pub fn leaves(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf(_))).count()
    }

    fn descend(&mut self, value: f64) -> Position {
        if self.nodes.is_empty() {
            self.nodes.push(Node::Leaf(Stats::default()));
        }

        let mut leaf = Position { index: 0, depth: 0, path: 0 };
        while let Node::Split { threshold, left, right } = self.nodes[leaf.index] {
            leaf.path <<= 1;
            leaf.depth += 1;
            leaf.index = if value > threshold {
                leaf.path |= 1;
                right
            } else {
                left
            };
        }
        leaf
    }
}

impl Stats {
    fn update(&mut self, value: f64) {
        self.count += 1;
        self.sum   += value;
        self.min    = self.min.min(value);
        self.max    = self.max.max(value);
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            count: 0,
            sum:   0.0,
            min:   f64::INFINITY,
            max:   f64::NEG_INFINITY,
        }
    }
}
