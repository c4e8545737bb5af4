use crate::extract::FlowRecord;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Features {
    pub rate: f64,
    pub size: Option<f64>,
}

impl Features {
    // None when the record lacks a usable packet rate.
    pub fn extract(record: &FlowRecord) -> Option<Self> {
        let rate = record.rate().filter(|r| r.is_finite() && *r >= 0.0)?;

        let size = match (record.bytes, record.packets) {
            (Some(bytes), Some(packets)) if packets > 0.0 => Some(bytes / packets),
            _                                             => None,
        };

        Some(Self {
            rate: rate,
            size: size.filter(|s| s.is_finite()),
        })
    }
}

pub fn scale(v: f64) -> f64 {
    (1.0 + v).log10()
}
