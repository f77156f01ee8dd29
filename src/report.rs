// src/report.rs
// Human-readable output for each cycle (stdout, not logs).

use std::fmt::Write as _;

use crate::checker::NearbySite;

const UNKNOWN_NAME: &str = "(unknown name)";
const UNKNOWN_ADDRESS: &str = "(unknown address)";
const UNKNOWN_CITY: &str = "(unknown city)";
const UNKNOWN_STATE: &str = "(unknown state)";
const UNKNOWN_TIME: &str = "(unknown time)";
const UNKNOWN_TYPE: &str = "(unknown type)";

/// One block per site: header line, one indented line per appointment, blank line.
pub fn format_site(nearby: &NearbySite) -> String {
    let s = &nearby.site;
    let mut out = format!(
        "{} - {}, {}, {} - {:.2} km\n",
        s.name.as_deref().unwrap_or(UNKNOWN_NAME),
        s.address.as_deref().unwrap_or(UNKNOWN_ADDRESS),
        s.city.as_deref().unwrap_or(UNKNOWN_CITY),
        s.state.as_deref().unwrap_or(UNKNOWN_STATE),
        nearby.distance_m / 1000.0,
    );
    for appt in &s.appointments {
        let _ = writeln!(
            out,
            "  {}: {}",
            appt.time.as_deref().unwrap_or(UNKNOWN_TIME),
            appt.kind.as_deref().unwrap_or(UNKNOWN_TYPE),
        );
    }
    out.push('\n');
    out
}

pub fn summary_line(found: usize, available: usize, total: usize) -> String {
    format!("found {found} nearby, out of {available} available from {total} locations.")
}
