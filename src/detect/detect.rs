use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use crate::classify::ClassifiedRecord;
use crate::config::Config;

#[derive(Clone, Debug, PartialEq)]
pub struct AnomalyFlag {
    pub bin:     usize,
    pub start:   DateTime<Utc>,
    pub packets: f64,
    pub rate:    f64,
    pub exceeds: bool,
}

// Number of bins covering [start_date, end_date), final partial bin included.
pub fn bins(cfg: &Config) -> u128 {
    let span  = (cfg.end_date - cfg.start_date).num_milliseconds().max(0) as u128;
    let width = width(cfg).max(1);
    (span + width - 1) / width
}

pub fn detect(records: &[ClassifiedRecord], cfg: &Config) -> Vec<AnomalyFlag> {
    let mut packets = vec![0.0; bins(cfg) as usize];

    for c in records {
        match index(cfg, &c.record.start).and_then(|i| packets.get_mut(i)) {
            Some(sum) => *sum += c.record.packets.unwrap_or(0.0),
            None      => debug!("record at {} outside analysis range", c.record.start),
        }
    }

    let width = cfg.bin_size as f64;
    let flags = packets.into_iter().enumerate().map(|(bin, packets)| {
        let rate = packets / width;
        AnomalyFlag {
            bin:     bin,
            start:   cfg.start_date + Duration::seconds((bin as u64 * cfg.bin_size) as i64),
            packets: packets,
            rate:    rate,
            exceeds: rate > cfg.anomaly_threshold,
        }
    }).collect::<Vec<_>>();

    let count = flags.iter().filter(|f| f.exceeds).count();
    info!("found {} anomalies in {} bins", count, flags.len());

    flags
}

fn index(cfg: &Config, ts: &DateTime<Utc>) -> Option<usize> {
    if *ts < cfg.start_date || *ts >= cfg.end_date {
        return None;
    }
    let offset = (*ts - cfg.start_date).num_milliseconds() as u128;
    Some((offset / width(cfg).max(1)) as usize)
}

fn width(cfg: &Config) -> u128 {
    cfg.bin_size as u128 * 1000
}
