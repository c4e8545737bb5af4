use std::fmt;
use std::str::FromStr;
use log::debug;
use crate::error::Error;
use crate::extract::FlowRecord;
use super::{ClassifiedRecord, Label, Nearest, Tree, TreeState};

pub trait Classifier {
    type State;

    fn classify(&self, record: &FlowRecord, state: Self::State) -> (Label, Self::State);
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Strategy {
    IncrementalTree,
    OnDemand,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::IncrementalTree, Strategy::OnDemand];
}

pub fn classify_all(records: Vec<FlowRecord>, strategy: Strategy) -> Vec<ClassifiedRecord> {
    debug!("classifying {} records with {}", records.len(), strategy);
    match strategy {
        Strategy::IncrementalTree => stream(&Tree::default(), TreeState::default(), records),
        Strategy::OnDemand        => stream(&Nearest::default(), (), records),
    }
}

fn stream<C: Classifier>(classifier: &C, mut state: C::State, records: Vec<FlowRecord>) -> Vec<ClassifiedRecord> {
    let mut classified = Vec::with_capacity(records.len());
    for record in records {
        let (label, next) = classifier.classify(&record, state);
        state = next;
        classified.push(ClassifiedRecord { record, label });
    }
    classified
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incremental-tree" => Ok(Strategy::IncrementalTree),
            "on-demand"        => Ok(Strategy::OnDemand),
            _                  => Err(Error::Classification(format!("unknown strategy '{}'", s))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Strategy::IncrementalTree => "incremental-tree",
            Strategy::OnDemand        => "on-demand",
        })
    }
}
