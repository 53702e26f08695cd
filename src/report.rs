//! Text rendering for profiling reports
//!
//! ```text
//! Run at Sun, 18 Oct 2026 09:30:00 +0200
//! app::FileScanner#count_lines(&Path): 0.004213s
//! app::FileScanner#count_words(&Path): 1.5s
//!
//! ```

use crate::method::MethodKey;
use crate::state::MethodStats;
use chrono::{DateTime, FixedOffset};
use std::io::{self, Write};
use std::time::Duration;

/// Render a duration as seconds with a trimmed fractional part
///
/// The rendering is exact at nanosecond resolution: `2s`, `1.5s`,
/// `0.000000042s`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let nanos = duration.subsec_nanos();
    if nanos == 0 {
        return format!("{}s", secs);
    }
    let fraction = format!("{:09}", nanos);
    format!("{}.{}s", secs, fraction.trim_end_matches('0'))
}

/// RFC 1123 style timestamp used in the run header
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.to_rfc2822()
}

pub(crate) fn write_header<W: Write + ?Sized>(
    writer: &mut W,
    start_time: &DateTime<FixedOffset>,
) -> io::Result<()> {
    writeln!(writer, "Run at {}", format_timestamp(start_time))
}

pub(crate) fn write_entry<W: Write + ?Sized>(
    writer: &mut W,
    key: &MethodKey,
    stats: &MethodStats,
) -> io::Result<()> {
    writeln!(writer, "{}: {}", key, format_duration(stats.total))
}
