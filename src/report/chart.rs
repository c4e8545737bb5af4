use std::collections::BTreeMap;
use std::fmt;
use crate::classify::Label;
use super::Report;

const WIDTH:  f64 = 960.0;
const HEIGHT: f64 = 720.0;
const LEFT:   f64 = 80.0;
const RIGHT:  f64 = 40.0;

struct Panel {
    top:    f64,
    bottom: f64,
}

const SERIES: Panel = Panel { top: 60.0,  bottom: 340.0 };
const BARS:   Panel = Panel { top: 440.0, bottom: 660.0 };
const STRIDE: f64   = 300.0;

// SVG rendering of a report: packet rate per bin with the threshold and
// flagged bins, then one bar chart per label distribution.
pub struct Chart<'a>(pub &'a Report);

impl<'a> fmt::Display for Chart<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let report = self.0;
        let height = HEIGHT + STRIDE * report.others.len() as f64;

        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(f, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#, w = WIDTH, h = height)?;
        writeln!(f, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        self.series(f)?;
        bars(f, &BARS, "Traffic Distribution by Class", &report.labels)?;

        for (n, other) in report.others.iter().enumerate() {
            let offset = STRIDE * (n + 1) as f64;
            let panel  = Panel { top: BARS.top + offset, bottom: BARS.bottom + offset };
            let title  = format!("Traffic Distribution by Class ({})", other.strategy);
            bars(f, &panel, &title, &other.labels)?;
        }

        writeln!(f, "</svg>")
    }
}

impl<'a> Chart<'a> {
    fn series(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let report    = self.0;
        let flags     = &report.flags;
        let threshold = report.config.anomaly_threshold;

        title(f, &SERIES, "TCP Traffic Analysis")?;
        axes(f, &SERIES, "Time", "Packets/s")?;

        let peak = flags.iter().map(|flag| flag.rate).fold(threshold, f64::max);
        let ymax = if peak > 0.0 { peak * 1.1 } else { 1.0 };
        let span = (flags.len().max(2) - 1) as f64;

        let x = |bin: usize| LEFT + (WIDTH - LEFT - RIGHT) * bin as f64 / span;
        let y = |v: f64| SERIES.bottom - (SERIES.bottom - SERIES.top) * v / ymax;

        writeln!(f, r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#, LEFT - 6.0, SERIES.top + 4.0, number(ymax))?;
        writeln!(f, r#"<text x="{:.1}" y="{:.1}" text-anchor="end">0</text>"#, LEFT - 6.0, SERIES.bottom)?;

        if let (Some(first), Some(last)) = (flags.first(), flags.last()) {
            let start = first.start.format("%Y-%m-%d %H:%M");
            let end   = last.start.format("%Y-%m-%d %H:%M");
            writeln!(f, r#"<text x="{:.1}" y="{:.1}">{}</text>"#, LEFT, SERIES.bottom + 18.0, start)?;
            writeln!(f, r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#, WIDTH - RIGHT, SERIES.bottom + 18.0, end)?;
        }

        let points = flags.iter().map(|flag| {
            format!("{:.1},{:.1}", x(flag.bin), y(flag.rate))
        }).collect::<Vec<_>>();

        if !points.is_empty() {
            writeln!(f, r#"<polyline fill="none" stroke="steelblue" stroke-width="1.5" points="{}"/>"#, points.join(" "))?;
        }

        writeln!(f, r#"<line x1="{:.1}" y1="{ty:.1}" x2="{:.1}" y2="{ty:.1}" stroke="orange" stroke-dasharray="6,4"/>"#, LEFT, WIDTH - RIGHT, ty = y(threshold))?;

        for flag in report.anomalies() {
            writeln!(f, r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="red"/>"#, x(flag.bin), y(flag.rate))?;
        }

        legend(f, &[("steelblue", "TCP traffic"), ("orange", "threshold"), ("red", "anomalies")])
    }
}

fn bars(f: &mut fmt::Formatter, panel: &Panel, name: &str, labels: &BTreeMap<Label, usize>) -> fmt::Result {
    title(f, panel, name)?;
    axes(f, panel, "Traffic Class", "Count")?;

    let max   = labels.values().cloned().max().unwrap_or(0).max(1) as f64;
    let slot  = (WIDTH - LEFT - RIGHT) / labels.len().max(1) as f64;
    let width = slot * 0.6;

    for (n, (label, count)) in labels.iter().enumerate() {
        let height = (panel.bottom - panel.top) * *count as f64 / max;
        let x      = LEFT + slot * n as f64 + (slot - width) / 2.0;
        let y      = panel.bottom - height;
        let mid    = x + width / 2.0;
        writeln!(f, r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="steelblue"/>"#, x, y, width, height)?;
        writeln!(f, r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#, mid, y - 4.0, count)?;
        writeln!(f, r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#, mid, panel.bottom + 16.0, escape(label.as_str()))?;
    }

    Ok(())
}

fn title(f: &mut fmt::Formatter, panel: &Panel, text: &str) -> fmt::Result {
    writeln!(f, r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{}</text>"#, WIDTH / 2.0, panel.top - 20.0, text)
}

fn axes(f: &mut fmt::Formatter, panel: &Panel, x: &str, y: &str) -> fmt::Result {
    writeln!(f, r#"<line x1="{l:.1}" y1="{:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/>"#, panel.top, l = LEFT, b = panel.bottom)?;
    writeln!(f, r#"<line x1="{l:.1}" y1="{b:.1}" x2="{:.1}" y2="{b:.1}" stroke="black"/>"#, WIDTH - RIGHT, l = LEFT, b = panel.bottom)?;
    writeln!(f, r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#, (LEFT + WIDTH - RIGHT) / 2.0, panel.bottom + 34.0, x)?;
    let mid = (panel.top + panel.bottom) / 2.0;
    writeln!(f, r#"<text x="20" y="{:.1}" text-anchor="middle" transform="rotate(-90 20 {:.1})">{}</text>"#, mid, mid, y)
}

fn legend(f: &mut fmt::Formatter, entries: &[(&str, &str)]) -> fmt::Result {
    for (n, (color, text)) in entries.iter().enumerate() {
        let y = SERIES.top + 14.0 * n as f64;
        writeln!(f, r#"<rect x="{:.1}" y="{:.1}" width="10" height="10" fill="{}"/>"#, WIDTH - RIGHT - 120.0, y - 9.0, color)?;
        writeln!(f, r#"<text x="{:.1}" y="{:.1}">{}</text>"#, WIDTH - RIGHT - 104.0, y, text)?;
    }
    Ok(())
}

fn number(v: f64) -> String {
    if v >= 100.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
