use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use chrono::{DateTime, Utc};
use crate::classify::Label;
use crate::detect::AnomalyFlag;
use super::Report;

pub const TOP: usize = 5;

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cfg   = &self.config;
        let stats = &self.stats;

        writeln!(f, "=== TCP Traffic Analysis Results ===")?;
        writeln!(f)?;

        writeln!(f, "Configuration:")?;
        writeln!(f, "anomaly_threshold: {} packets/s", grouped(cfg.anomaly_threshold))?;
        writeln!(f, "start_date: {}", time(&cfg.start_date))?;
        writeln!(f, "end_date: {}", time(&cfg.end_date))?;
        writeln!(f, "bin_size: {} s", cfg.bin_size)?;
        writeln!(f, "classifier: {}", cfg.classifier)?;
        writeln!(f, "sensor: {}", cfg.sensor)?;
        writeln!(f, "flow_type: {}", cfg.flow_type)?;
        writeln!(f)?;

        writeln!(f, "Overall Statistics:")?;
        writeln!(f, "records_processed: {}", stats.records)?;
        writeln!(f, "total_flows: {}", grouped(stats.flows))?;
        writeln!(f, "total_packets: {}", grouped(stats.packets))?;
        writeln!(f, "total_bytes: {}", grouped(stats.bytes))?;
        writeln!(f, "avg_packets_per_record: {}", grouped(stats.mean))?;
        writeln!(f, "max_packets_per_record: {}", grouped(stats.max))?;
        writeln!(f, "min_packets_per_record: {}", grouped(stats.min))?;
        writeln!(f, "std_dev_packets: {}", grouped(stats.std_dev))?;
        writeln!(f)?;

        writeln!(f, "Traffic Classification Summary:")?;
        summary(f, &self.labels)?;
        writeln!(f)?;

        for other in &self.others {
            writeln!(f, "Classification Summary ({}):", other.strategy)?;
            summary(f, &other.labels)?;
            writeln!(f)?;
        }

        writeln!(f, "Bins Analyzed: {}", self.flags.len())?;

        let mut anomalies = self.anomalies().collect::<Vec<_>>();
        if anomalies.is_empty() {
            return writeln!(f, "Anomalies Detected: none detected");
        }

        writeln!(f, "Anomalies Detected: {}", anomalies.len())?;
        for flag in &anomalies {
            bin(f, flag)?;
        }
        writeln!(f)?;

        anomalies.sort_by(|a, b| {
            b.rate.partial_cmp(&a.rate).unwrap_or(Ordering::Equal).then(a.bin.cmp(&b.bin))
        });

        writeln!(f, "Top {} Anomalous Periods:", TOP.min(anomalies.len()))?;
        for flag in anomalies.iter().take(TOP) {
            bin(f, flag)?;
        }

        Ok(())
    }
}

fn summary(f: &mut fmt::Formatter, labels: &BTreeMap<Label, usize>) -> fmt::Result {
    if labels.is_empty() {
        return writeln!(f, "no records classified");
    }

    let width = labels.keys().map(|l| l.as_str().len()).max().unwrap_or(0);
    for (label, count) in labels {
        writeln!(f, "{:<width$}  {}", label.as_str(), count, width = width)?;
    }

    Ok(())
}

fn bin(f: &mut fmt::Formatter, flag: &AnomalyFlag) -> fmt::Result {
    writeln!(f, "bin {}  {}  packets {}  rate {} packets/s",
             flag.bin,
             time(&flag.start),
             grouped(flag.packets),
             grouped(flag.rate),
    )
}

fn time(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

// Two decimals with thousands separators, e.g. 1,234,567.89
pub fn grouped(v: f64) -> String {
    let s = format!("{:.2}", v.abs());
    let (int, frac) = s.split_at(s.len() - 3);

    let mut out = String::with_capacity(s.len() + int.len() / 3);
    if v < 0.0 && s.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }

    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out.push_str(frac);
    out
}
