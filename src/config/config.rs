use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Deserialize;
use crate::classify::Strategy;
use crate::detect::bins;
use crate::error::Error;
use super::date;

pub const SENSOR:    &str = "S0";
pub const FLOW_TYPE: &str = "all";
pub const TIMEOUT:   u64  = 600;

pub const MAX_BIN_SIZE: u64  = 366 * 24 * 3600;
pub const MAX_BINS:     u128 = 1_000_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub anomaly_threshold: f64,
    pub start_date:        DateTime<Utc>,
    pub end_date:          DateTime<Utc>,
    pub bin_size:          u64,
    pub classifier:        Strategy,
    pub sensor:            String,
    pub flow_type:         String,
    pub timeout:           Duration,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Row {
    anomaly_threshold: Option<String>,
    start_date:        Option<String>,
    end_date:          Option<String>,
    bin_size:          Option<String>,
    classifier:        Option<String>,
    sensor:            Option<String>,
    flow_type:         Option<String>,
    timeout:           Option<String>,
}

impl Config {
    pub fn new(anomaly_threshold: f64, start_date: DateTime<Utc>, end_date: DateTime<Utc>, bin_size: u64) -> Self {
        Self {
            anomaly_threshold: anomaly_threshold,
            start_date:        start_date,
            end_date:          end_date,
            bin_size:          bin_size,
            classifier:        Strategy::IncrementalTree,
            sensor:            SENSOR.to_owned(),
            flow_type:         FLOW_TYPE.to_owned(),
            timeout:           Duration::from_secs(TIMEOUT),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| {
            Error::Config(format!("{}: {}", path.display(), e))
        })?;
        let cfg = Self::read(file)?;
        debug!("config {:?}", cfg);
        Ok(cfg)
    }

    pub fn read<R: Read>(rdr: R) -> Result<Self, Error> {
        let mut rdr  = ReaderBuilder::new().trim(Trim::All).from_reader(rdr);
        let mut rows = rdr.deserialize::<Row>();

        let row = match rows.next() {
            Some(row) => row?,
            None      => return Err(Error::Config("missing data row".to_owned())),
        };

        if rows.next().is_some() {
            return Err(Error::Config("expected a single data row".to_owned()));
        }

        let anomaly_threshold = number::<f64>("anomaly_threshold", &row.anomaly_threshold)?;
        let start_date        = timestamp("start_date", &row.start_date)?;
        let end_date          = timestamp("end_date", &row.end_date)?;
        let bin_size          = number::<u64>("bin_size", &row.bin_size)?;

        if !anomaly_threshold.is_finite() || anomaly_threshold < 0.0 {
            let msg = format!("invalid anomaly_threshold '{}'", anomaly_threshold);
            return Err(Error::Config(msg));
        }

        if start_date > end_date {
            let msg = format!("start_date {} is after end_date {}", start_date, end_date);
            return Err(Error::Config(msg));
        }

        if bin_size == 0 {
            return Err(Error::Config("bin_size must be positive".to_owned()));
        }

        if bin_size > MAX_BIN_SIZE {
            let msg = format!("bin_size {} exceeds {} s", bin_size, MAX_BIN_SIZE);
            return Err(Error::Config(msg));
        }

        let classifier = match present(&row.classifier) {
            Some(s) => s.parse()?,
            None    => Strategy::IncrementalTree,
        };

        let timeout = match present(&row.timeout) {
            Some(_) => number::<u64>("timeout", &row.timeout)?,
            None    => TIMEOUT,
        };

        if timeout == 0 {
            return Err(Error::Config("timeout must be positive".to_owned()));
        }

        let cfg = Self {
            anomaly_threshold: anomaly_threshold,
            start_date:        start_date,
            end_date:          end_date,
            bin_size:          bin_size,
            classifier:        classifier,
            sensor:            present(&row.sensor).unwrap_or(SENSOR).to_owned(),
            flow_type:         present(&row.flow_type).unwrap_or(FLOW_TYPE).to_owned(),
            timeout:           Duration::from_secs(timeout),
        };

        let count = bins(&cfg);
        if count > MAX_BINS {
            let msg = format!("{} bins of {} s exceed the limit of {}", count, bin_size, MAX_BINS);
            return Err(Error::Config(msg));
        }

        Ok(cfg)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn required<'a>(name: &str, field: &'a Option<String>) -> Result<&'a str, Error> {
    present(field).ok_or_else(|| Error::Config(format!("missing field '{}'", name)))
}

fn number<T: std::str::FromStr>(name: &str, field: &Option<String>) -> Result<T, Error> {
    let value = required(name, field)?;
    value.parse().map_err(|_| {
        Error::Config(format!("invalid {} '{}'", name, value))
    })
}

fn timestamp(name: &str, field: &Option<String>) -> Result<DateTime<Utc>, Error> {
    let value = required(name, field)?;
    date::parse(value).ok_or_else(|| {
        Error::Config(format!("invalid {} '{}'", name, value))
    })
}
