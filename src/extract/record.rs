use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq)]
pub struct FlowRecord {
    pub start:    DateTime<Utc>,
    pub duration: u64,
    pub flows:    f64,
    pub bytes:    Option<f64>,
    pub packets:  Option<f64>,
}

impl FlowRecord {
    pub fn new(start: DateTime<Utc>, duration: u64, packets: f64) -> Self {
        Self {
            start:    start,
            duration: duration,
            flows:    0.0,
            bytes:    None,
            packets:  Some(packets),
        }
    }

    pub fn bytes(self, bytes: f64) -> Self {
        Self { bytes: Some(bytes), ..self }
    }

    // packets per second over the record's interval
    pub fn rate(&self) -> Option<f64> {
        match (self.packets, self.duration) {
            (Some(_), 0)       => None,
            (Some(packets), d) => Some(packets / d as f64),
            (None, _)          => None,
        }
    }
}
