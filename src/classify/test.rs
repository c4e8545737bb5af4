use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use crate::error::Error;
use crate::extract::FlowRecord;
use super::*;
use super::tree::{DELTA, GRACE, MAX_DEPTH};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn record(n: i64, packets: f64) -> FlowRecord {
    FlowRecord::new(start() + Duration::seconds(60 * n), 60, packets)
}

fn labels(classified: &[ClassifiedRecord]) -> Vec<&str> {
    classified.iter().map(|c| c.label.as_str()).collect()
}

#[test]
fn strategy_names() -> Result<()> {
    assert_eq!(Strategy::IncrementalTree, "incremental-tree".parse()?);
    assert_eq!(Strategy::OnDemand, "on-demand".parse()?);
    assert_eq!("incremental-tree", Strategy::IncrementalTree.to_string());
    assert_eq!("on-demand", Strategy::OnDemand.to_string());

    let err = "kmeans".parse::<Strategy>();
    assert!(matches!(err, Err(Error::Classification(_))));

    Ok(())
}

#[test]
fn features() {
    let f = Features::extract(&record(0, 120.0).bytes(12_000.0));
    assert_eq!(Some(Features { rate: 2.0, size: Some(100.0) }), f);

    let f = Features::extract(&record(0, 0.0).bytes(0.0));
    assert_eq!(Some(Features { rate: 0.0, size: None }), f);

    let mut missing = record(0, 1.0);
    missing.packets = None;
    assert_eq!(None, Features::extract(&missing));

    let mut instant = record(0, 1.0);
    instant.duration = 0;
    assert_eq!(None, Features::extract(&instant));
}

#[test]
fn preserves_length_and_order() {
    let records = (0..50).map(|n| record(n, (n * 37 % 11) as f64 * 100.0)).collect::<Vec<_>>();

    for strategy in &[Strategy::IncrementalTree, Strategy::OnDemand] {
        let classified = classify_all(records.clone(), *strategy);
        assert_eq!(records.len(), classified.len());
        for (r, c) in records.iter().zip(&classified) {
            assert_eq!(r, &c.record);
        }
    }

    assert!(classify_all(Vec::new(), Strategy::OnDemand).is_empty());
}

#[test]
fn unclassifiable_is_unknown() {
    let mut missing = record(1, 0.0);
    missing.packets = None;

    let records = vec![record(0, 60.0), missing, record(2, 60.0)];

    for strategy in &[Strategy::IncrementalTree, Strategy::OnDemand] {
        let classified = classify_all(records.clone(), *strategy);
        assert!(!classified[0].label.is_unknown());
        assert!(classified[1].label.is_unknown());
        assert!(!classified[2].label.is_unknown());
    }
}

#[test]
fn tree_unknown_leaves_state() {
    let tree = Tree::default();
    let mut missing = record(0, 0.0);
    missing.packets = None;

    let (label, state) = tree.classify(&missing, TreeState::default());
    assert_eq!(Label::unknown(), label);
    assert_eq!(TreeState::default(), state);
}

#[test]
fn tree_test_then_train() {
    let tree = Tree::default();
    assert_eq!(4, tree.bands());

    let (label, state) = tree.classify(&record(0, 600.0), TreeState::default());
    assert_eq!("Q1", label.as_str());
    assert_eq!(1, state.leaves());

    // 19 observations with spread are needed before the root splits
    let mut state = TreeState::default();
    let mut seen  = Vec::new();
    for n in 0..21 {
        let packets = if n % 2 == 0 { 60.0 } else { 60_000.0 };
        let (label, next) = tree.classify(&record(n, packets), state);
        seen.push(label);
        state = next;
    }

    assert!(seen[..19].iter().all(|l| l.as_str() == "Q1"));
    assert_eq!("Q3", seen[19].as_str());
    assert_eq!("Q1", seen[20].as_str());
    assert_eq!(2, state.leaves());
}

#[test]
fn tree_no_split_without_spread() {
    let tree = Tree::default();
    let classified = classify_all((0..100).map(|n| record(n, 600.0)).collect(), Strategy::IncrementalTree);
    assert!(classified.iter().all(|c| c.label.as_str() == "Q1"));

    let mut state = TreeState::default();
    for n in 0..100 {
        state = tree.classify(&record(n, 600.0), state).1;
    }
    assert_eq!(1, state.leaves());
}

#[test]
fn tree_grows_to_depth() {
    let tree  = Tree::default();
    let rates = [1.0, 10.0, 100.0, 1000.0];

    let mut state = TreeState::default();
    for n in 0..400 {
        let packets = rates[(n % 4) as usize] * 60.0;
        state = tree.classify(&record(n, packets), state).1;
    }
    assert_eq!(4, state.leaves());

    let mut bands = Vec::new();
    for (n, rate) in rates.iter().enumerate() {
        let (label, next) = tree.classify(&record(n as i64, rate * 60.0), state);
        bands.push(label);
        state = next;
    }
    assert_eq!(vec!["Q1", "Q2", "Q3", "Q4"], bands.iter().map(Label::as_str).collect::<Vec<_>>());
}

#[test]
fn tree_depth_is_clamped() {
    let tree = Tree::new(GRACE, 40, DELTA);
    assert_eq!(MAX_DEPTH, tree.depth());
    assert_eq!(1 << MAX_DEPTH, tree.bands());

    let (label, _) = tree.classify(&record(0, 60.0), TreeState::default());
    assert_eq!("Q1", label.as_str());
}

#[test]
fn tree_reads_deeper_state() {
    let deep = Tree::new(GRACE, 3, DELTA);
    let rate = |n: i64| 10f64.powi((n % 8) as i32) * 60.0;

    let mut state = TreeState::default();
    for n in 0..2000 {
        state = deep.classify(&record(n, rate(n)), state).1;
    }
    assert_eq!(8, state.leaves());

    let tree = Tree::default();
    let (low, state)  = tree.classify(&record(0, rate(0)), state);
    let (high, _)     = tree.classify(&record(7, rate(7)), state);
    assert_eq!("Q1", low.as_str());
    assert_eq!("Q4", high.as_str());
}

#[test]
fn tree_state_is_owned_by_caller() {
    let tree = Tree::default();

    let mut state = TreeState::default();
    for n in 0..40 {
        let packets = if n % 2 == 0 { 60.0 } else { 60_000.0 };
        state = tree.classify(&record(n, packets), state).1;
    }

    let (a, _) = tree.classify(&record(0, 60_000.0), state.clone());
    let (b, _) = tree.classify(&record(0, 60_000.0), state.clone());
    let (c, _) = tree.classify(&record(0, 60_000.0), TreeState::default());
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn nearest_bands() {
    let nearest = Nearest::default();
    let label = |packets: f64| nearest.classify(&record(0, packets), ()).0;

    assert_eq!(Label::new("Low"), label(30.0));
    assert_eq!(Label::new("Medium"), label(3_000.0));
    assert_eq!(Label::new("High"), label(30_000.0));
    assert_eq!(Label::new("Very High"), label(600_000.0));

    let large = record(0, 3_000.0).bytes(3_000.0 * 1400.0);
    assert_eq!(Label::new("Medium"), nearest.classify(&large, ()).0);
}

#[test]
fn nearest_band_limits() {
    let nearest = Nearest::default();

    // packets per minute around the Low/Medium/High/Very High limits
    for &(packets, want) in &[
        (0.0,       "Low"),
        (599.0,     "Low"),
        (601.0,     "Medium"),
        (5_999.0,   "Medium"),
        (6_001.0,   "High"),
        (8_000.0,   "High"),
        (59_999.0,  "High"),
        (60_001.0,  "Very High"),
        (6.0e7,     "Very High"),
    ] {
        let (label, _) = nearest.classify(&record(0, packets), ());
        assert_eq!(want, label.as_str(), "{} packets/min", packets);
    }
}

#[test]
fn nearest_is_stateless() {
    let records = vec![record(0, 30.0), record(1, 600_000.0), record(2, 30.0)];
    let classified = classify_all(records, Strategy::OnDemand);
    assert_eq!(vec!["Low", "Very High", "Low"], labels(&classified));
}

#[test]
fn nearest_ties_and_empty() {
    let tied = Nearest::new(vec![
        Exemplar::new("first",  10.0, 100.0),
        Exemplar::new("second", 10.0, 100.0),
    ]);
    assert_eq!(Label::new("first"), tied.classify(&record(0, 600.0), ()).0);

    let empty = Nearest::new(Vec::new());
    assert!(empty.classify(&record(0, 600.0), ()).0.is_unknown());
}
