use std::path::Path;
use anyhow::Result;
use clap::{App, load_yaml};
use env_logger::Builder;
use log::info;
use flowstat::analyze;
use flowstat::args::verbosity;
use flowstat::config::{Config, Location};
use flowstat::extract::Toolkit;
use flowstat::report::{grouped, Output};

const CONFIG: &str = "config.csv";

fn main() -> Result<()> {
    let yaml = load_yaml!("args.yml");
    let ver  = env!("CARGO_PKG_VERSION");
    let args = App::from_yaml(&yaml).version(ver).get_matches();

    let (module, level) = verbosity(args.occurrences_of("verbose"));
    Builder::from_default_env().filter(module, level).init();

    info!("initializing flowstat {}", ver);

    let cfg = Config::load(Path::new(CONFIG))?;
    let loc = Location::from_env()?;
    let kit = Toolkit::silk()?;
    let out = Output::default();

    let report = analyze(&cfg, &loc, &kit, &out)?;
    let stats  = &report.stats;

    info!("analysis complete, see {}", out.report.display());
    info!("records processed: {}", stats.records);
    info!("total packets: {}", grouped(stats.packets));
    info!("total bytes: {}", grouped(stats.bytes));
    info!("max packets per record: {}", grouped(stats.max));
    info!("anomalies: {}", report.anomalies().count());

    Ok(())
}
