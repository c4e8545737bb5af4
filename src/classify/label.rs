use std::fmt;
use crate::extract::FlowRecord;

pub const UNKNOWN: &str = "unknown";

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Label(String);

#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedRecord {
    pub record: FlowRecord,
    pub label:  Label,
}

impl Label {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Label(name.into())
    }

    pub fn unknown() -> Self {
        Label::new(UNKNOWN)
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
