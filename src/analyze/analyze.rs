use log::info;
use crate::classify::{classify_all, Strategy};
use crate::config::{Config, Location};
use crate::detect::detect;
use crate::error::Error;
use crate::extract::Toolkit;
use crate::report::{Output, Report};

pub fn analyze(cfg: &Config, loc: &Location, kit: &Toolkit, out: &Output) -> Result<Report, Error> {
    info!("starting TCP traffic analysis");

    let records = kit.extract(cfg, loc)?;
    info!("extracted {} records", records.len());

    let classified = classify_all(records.clone(), cfg.classifier);
    let flags      = detect(&classified, cfg);
    let mut report = Report::new(cfg, &classified, flags);

    for &strategy in Strategy::ALL.iter().filter(|&&s| s != cfg.classifier) {
        let other = classify_all(records.clone(), strategy);
        report = report.compare(strategy, &other);
    }

    report.write(out)?;

    Ok(report)
}
