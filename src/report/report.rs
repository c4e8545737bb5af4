use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use log::{info, warn};
use tempfile::NamedTempFile;
use crate::classify::{ClassifiedRecord, Label, Strategy};
use crate::config::Config;
use crate::detect::AnomalyFlag;
use crate::error::Error;
use super::{Chart, Stats};

pub const OUTPUT_DIR: &str = "output";
pub const REPORT:     &str = "report.txt";
pub const CHART:      &str = "traffic.svg";

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub config: Config,
    pub stats:  Stats,
    pub labels: BTreeMap<Label, usize>,
    pub flags:  Vec<AnomalyFlag>,
    pub others: Vec<Distribution>,
}

// Label counts produced by a strategy other than the configured one.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
    pub strategy: Strategy,
    pub labels:   BTreeMap<Label, usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    pub report: PathBuf,
    pub chart:  PathBuf,
}

impl Report {
    pub fn new(cfg: &Config, records: &[ClassifiedRecord], flags: Vec<AnomalyFlag>) -> Self {
        Self {
            config: cfg.clone(),
            stats:  Stats::new(records),
            labels: counts(records),
            flags:  flags,
            others: Vec::new(),
        }
    }

    pub fn compare(mut self, strategy: Strategy, records: &[ClassifiedRecord]) -> Self {
        self.others.push(Distribution {
            strategy: strategy,
            labels:   counts(records),
        });
        self
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &AnomalyFlag> {
        self.flags.iter().filter(|f| f.exceeds)
    }

    // Both documents are staged next to their targets before either is
    // moved into place, and the chart is removed again if the report
    // cannot follow it.
    pub fn write(&self, out: &Output) -> Result<(), Error> {
        let text  = stage(&out.report, &self.to_string())?;
        let chart = stage(&out.chart, &Chart(self).to_string())?;

        persist(chart, &out.chart)?;
        if let Err(e) = persist(text, &out.report) {
            if let Err(e) = fs::remove_file(&out.chart) {
                warn!("unable to remove {}: {}", out.chart.display(), e);
            }
            return Err(e);
        }

        info!("saved results to {}", out.report.display());
        info!("saved visualization to {}", out.chart.display());

        Ok(())
    }
}

impl Output {
    pub fn new(dir: &Path) -> Self {
        Self {
            report: dir.join(REPORT),
            chart:  dir.join(CHART),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new(Path::new(OUTPUT_DIR))
    }
}

fn counts(records: &[ClassifiedRecord]) -> BTreeMap<Label, usize> {
    let mut labels = BTreeMap::new();
    for c in records {
        *labels.entry(c.label.clone()).or_insert(0) += 1;
    }
    labels
}

fn stage(path: &Path, body: &str) -> Result<NamedTempFile, Error> {
    let dir = match path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => dir,
        None      => Path::new("."),
    };

    let error = |e: std::io::Error| Error::Write(path.to_owned(), e.to_string());

    fs::create_dir_all(dir).map_err(|e| {
        Error::Write(dir.to_owned(), e.to_string())
    })?;

    let mut file = NamedTempFile::new_in(dir).map_err(error)?;
    file.write_all(body.as_bytes()).map_err(error)?;
    file.flush().map_err(error)?;

    Ok(file)
}

fn persist(file: NamedTempFile, path: &Path) -> Result<(), Error> {
    file.persist(path).map(drop).map_err(|e| {
        Error::Write(path.to_owned(), e.error.to_string())
    })
}
