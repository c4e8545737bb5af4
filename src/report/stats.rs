use crate::classify::ClassifiedRecord;

// Packet figures are per record, over records that carry a packet count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    pub records: usize,
    pub flows:   f64,
    pub packets: f64,
    pub bytes:   f64,
    pub mean:    f64,
    pub min:     f64,
    pub max:     f64,
    pub std_dev: f64,
}

impl Stats {
    pub fn new(records: &[ClassifiedRecord]) -> Self {
        let packets = records.iter().filter_map(|c| c.record.packets).collect::<Vec<_>>();

        let mut stats = Stats {
            records: records.len(),
            flows:   records.iter().map(|c| c.record.flows).sum(),
            packets: packets.iter().sum(),
            bytes:   records.iter().filter_map(|c| c.record.bytes).sum(),
            ..Default::default()
        };

        if packets.is_empty() {
            return stats;
        }

        let n = packets.len() as f64;
        stats.mean = stats.packets / n;
        stats.min  = packets.iter().cloned().fold(f64::INFINITY, f64::min);
        stats.max  = packets.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        if packets.len() > 1 {
            let mean = stats.mean;
            let sum  = packets.iter().map(|p| (p - mean).powi(2)).sum::<f64>();
            stats.std_dev = (sum / (n - 1.0)).sqrt();
        }

        stats
    }
}
