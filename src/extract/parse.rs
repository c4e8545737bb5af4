use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use crate::config::date;
use crate::error::Error;
use super::FlowRecord;

// Delimited rwcount output: time|records|bytes|packets|
pub fn parse(output: &str, duration: u64) -> Result<Vec<FlowRecord>, Error> {
    let mut records = Vec::new();

    for (n, line) in output.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record = record(line, duration).map_err(|msg| {
            Error::Extraction(format!("line {}: {}: '{}'", n + 1, msg, line))
        })?;

        records.push(record);
    }

    debug!("parsed {} records", records.len());

    Ok(records)
}

fn record(line: &str, duration: u64) -> Result<FlowRecord, String> {
    let mut fields = line.split('|').map(str::trim);

    let mut field = |name: &str| {
        fields.next().ok_or_else(|| format!("missing {}", name))
    };

    let start   = field("time")?;
    let flows   = field("records")?;
    let bytes   = field("bytes")?;
    let packets = field("packets")?;

    let start = timestamp(start).ok_or_else(|| {
        format!("invalid time '{}'", start)
    })?;

    Ok(FlowRecord {
        start:    start,
        duration: duration,
        flows:    number("records", flows)?.ok_or("missing records")?,
        bytes:    number("bytes", bytes)?,
        packets:  number("packets", packets)?,
    })
}

fn timestamp(s: &str) -> Option<DateTime<Utc>> {
    match s.parse::<f64>() {
        Ok(epoch) if epoch.is_finite() => {
            let secs  = epoch.floor();
            let nanos = ((epoch - secs) * 1e9).round().min(999_999_999.0);
            Utc.timestamp_opt(secs as i64, nanos as u32).single()
        }
        Ok(_)  => None,
        Err(_) => date::parse(s),
    }
}

fn number(name: &str, s: &str) -> Result<Option<f64>, String> {
    if s.is_empty() {
        return Ok(None);
    }

    match s.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(Some(n)),
        _                                  => Err(format!("invalid {} '{}'", name, s)),
    }
}
