use std::fs;
use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::tempdir;
use crate::classify::{ClassifiedRecord, Label, Strategy};
use crate::config::Config;
use crate::detect::detect;
use crate::error::Error;
use crate::extract::FlowRecord;
use super::{grouped, Chart, Output, Report, Stats};

fn at(m: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(m)
}

fn classified(m: i64, packets: f64, label: &str) -> ClassifiedRecord {
    ClassifiedRecord {
        record: FlowRecord::new(at(m), 1800, packets).bytes(packets * 100.0),
        label:  Label::new(label),
    }
}

fn scenario(threshold: f64) -> Report {
    let cfg     = Config::new(threshold, at(0), at(60), 1800);
    let records = vec![classified(0, 100.0, "Low"), classified(30, 2000.0, "High")];
    let flags   = detect(&records, &cfg);
    Report::new(&cfg, &records, flags)
}

#[test]
fn stats() {
    let records = vec![
        classified(0, 2.0, "a"),
        classified(1, 4.0, "a"),
        classified(2, 4.0, "b"),
        classified(3, 4.0, "b"),
        classified(4, 5.0, "b"),
        classified(5, 5.0, "c"),
        classified(6, 7.0, "c"),
        classified(7, 9.0, "c"),
    ];
    let stats = Stats::new(&records);
    assert_eq!(8, stats.records);
    assert_eq!(40.0, stats.packets);
    assert_eq!(4000.0, stats.bytes);
    assert_eq!(5.0, stats.mean);
    assert_eq!(2.0, stats.min);
    assert_eq!(9.0, stats.max);
    assert!((stats.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-9);

    assert_eq!(Stats::default(), Stats::new(&[]));

    let one = Stats::new(&records[..1]);
    assert_eq!(0.0, one.std_dev);
}

#[test]
fn label_counts() {
    let cfg     = Config::new(1.0, at(0), at(60), 1800);
    let records = vec![classified(0, 1.0, "b"), classified(1, 1.0, "a"), classified(2, 1.0, "b")];
    let report  = Report::new(&cfg, &records, Vec::new());

    let counts = report.labels.iter().map(|(l, n)| (l.as_str(), *n)).collect::<Vec<_>>();
    assert_eq!(vec![("a", 1), ("b", 2)], counts);
}

#[test]
fn grouping() {
    assert_eq!("0.00", grouped(0.0));
    assert_eq!("999.50", grouped(999.5));
    assert_eq!("1,000.00", grouped(1000.0));
    assert_eq!("1,234,567.89", grouped(1234567.891));
    assert_eq!("-12,345.00", grouped(-12345.0));
}

#[test]
fn text_lists_anomalies() {
    let text = scenario(1.0).to_string();
    assert!(text.starts_with("=== TCP Traffic Analysis Results ===\n"));
    assert!(text.contains("records_processed: 2\n"));
    assert!(text.contains("total_packets: 2,100.00\n"));
    assert!(text.contains("High  1\nLow   1\n"));
    assert!(text.contains("Bins Analyzed: 2\n"));
    assert!(text.contains("Anomalies Detected: 1\n"));
    assert!(text.contains("bin 1  2024-01-01 00:30:00 UTC  packets 2,000.00  rate 1.11 packets/s\n"));
    assert!(text.contains("Top 1 Anomalous Periods:\n"));
    assert!(!text.contains("bin 0 "));
}

#[test]
fn text_without_anomalies() {
    let text = scenario(1000.0).to_string();
    assert!(text.contains("Anomalies Detected: none detected\n"));
    assert!(!text.contains("Anomalous Periods"));
}

#[test]
fn top_periods_by_rate() {
    let cfg     = Config::new(0.0, at(0), at(60 * 7), 3600);
    let records = (0..7).map(|h| classified(60 * h, ((h * 3) % 7 + 1) as f64, "x")).collect::<Vec<_>>();
    let report  = Report::new(&cfg, &records, detect(&records, &cfg));
    let text    = report.to_string();

    let top  = text.split("Top 5 Anomalous Periods:\n").nth(1).unwrap_or_default();
    let bins = top.lines().map(|l| l.split_whitespace().nth(1).unwrap_or_default()).collect::<Vec<_>>();
    assert_eq!(vec!["2", "4", "6", "1", "3"], bins);
}

#[test]
fn empty_run() -> Result<()> {
    let dir    = tempdir()?;
    let out    = Output::new(dir.path());
    let cfg    = Config::new(1000.0, at(0), at(60), 1800);
    let report = Report::new(&cfg, &[], detect(&[], &cfg));

    report.write(&out)?;

    let text = fs::read_to_string(&out.report)?;
    assert!(text.contains("records_processed: 0\n"));
    assert!(text.contains("no records classified\n"));
    assert!(text.contains("Anomalies Detected: none detected\n"));
    assert!(fs::read_to_string(&out.chart)?.contains("</svg>"));

    Ok(())
}

#[test]
fn write_is_idempotent() -> Result<()> {
    let dir    = tempdir()?;
    let out    = Output::new(&dir.path().join("nested").join("output"));
    let report = scenario(1.0);

    fs::create_dir_all(dir.path().join("nested").join("output"))?;
    fs::write(&out.report, "stale contents that are longer than anything the report would write")?;

    report.write(&out)?;
    let first = fs::read(&out.report)?;
    let chart = fs::read(&out.chart)?;

    report.write(&out)?;
    assert_eq!(first, fs::read(&out.report)?);
    assert_eq!(chart, fs::read(&out.chart)?);
    assert_eq!(report.to_string().into_bytes(), first);

    Ok(())
}

#[test]
fn unwritable_output() -> Result<()> {
    let dir  = tempdir()?;
    let file = dir.path().join("file");
    fs::write(&file, "")?;

    let out = Output::new(&file.join("output"));
    let err = scenario(1.0).write(&out);
    assert!(matches!(err, Err(Error::Write(..))));

    Ok(())
}

#[test]
fn failed_chart_leaves_no_report() -> Result<()> {
    let dir   = tempdir()?;
    let chart = dir.path().join("traffic.svg");
    fs::create_dir(&chart)?;

    let out = Output {
        report: dir.path().join("report.txt"),
        chart:  chart.clone(),
    };

    let err = scenario(1.0).write(&out);
    assert!(matches!(err, Err(Error::Write(path, _)) if path == chart));
    assert!(!out.report.exists());
    assert_eq!(1, fs::read_dir(dir.path())?.count());

    Ok(())
}

#[test]
fn chart_marks_anomalies() {
    let report = scenario(1.0);
    let svg    = Chart(&report).to_string();
    assert!(svg.starts_with("<?xml"));
    assert_eq!(1, svg.matches("<circle").count());
    assert_eq!(1, svg.matches("<polyline").count());
    assert!(svg.contains(">High</text>"));
    assert!(svg.contains(">Low</text>"));
    assert!(svg.contains("stroke-dasharray"));

    let quiet = Chart(&scenario(1000.0)).to_string();
    assert_eq!(0, quiet.matches("<circle").count());
}

#[test]
fn other_distributions() {
    let quartiles = vec![classified(0, 100.0, "Q1"), classified(30, 2000.0, "Q1")];
    let report    = scenario(1.0).compare(Strategy::IncrementalTree, &quartiles);

    let text = report.to_string();
    assert!(text.contains("Traffic Classification Summary:\nHigh  1\nLow   1\n"));
    assert!(text.contains("Classification Summary (incremental-tree):\nQ1  2\n"));

    let svg = Chart(&report).to_string();
    assert!(svg.contains(r#"height="1020""#));
    assert!(svg.contains("Traffic Distribution by Class (incremental-tree)"));
    assert!(svg.contains(">Q1</text>"));

    let plain = Chart(&scenario(1.0)).to_string();
    assert!(plain.contains(r#"height="720""#));
    assert!(!plain.contains(">Q1</text>"));
}

#[test]
fn chart_escapes_labels() {
    let cfg     = Config::new(1.0, at(0), at(30), 1800);
    let records = vec![classified(0, 1.0, "<&>")];
    let report  = Report::new(&cfg, &records, Vec::new());
    assert!(Chart(&report).to_string().contains("&lt;&amp;&gt;"));
}
