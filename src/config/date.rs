use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const FORMATS: &[&str] = &[
    "%Y/%m/%d:%H:%M:%S",
    "%Y/%m/%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

// SiLK style dates, ISO 8601 variants and RFC 3339, all taken as UTC.
// Minutes and seconds may be left off, as in 2004/10/04:20.
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }

    for pad in &["", ":00", ":00:00"] {
        let padded = format!("{}{}", s, pad);
        for fmt in FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(&padded, fmt) {
                return Some(Utc.from_utc_datetime(&ts));
            }
        }
    }

    for fmt in &["%Y/%m/%d", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|ts| Utc.from_utc_datetime(&ts));
        }
    }

    None
}

// rwfilter only resolves dates to the hour.
pub fn silk_hour(ts: &DateTime<Utc>) -> String {
    ts.format("%Y/%m/%d:%H").to_string()
}

pub fn silk_time(ts: &DateTime<Utc>) -> String {
    ts.format("%Y/%m/%d:%H:%M:%S").to_string()
}
