//! LIST / MLSD line parsers.
//!
//! Two independent, stateless formats:
//! 1. **Unix-style** (`ls -l`): `-rw-r--r-- 1 owner group 1234 Jan 15 10:30 file.txt`
//! 2. **RFC 3659 facts**: `type=file;size=1234;modify=20260101120000; file.txt`
//!
//! Lines arrive already decoded with the session's server encoding.

use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::types::{DirectoryEntry, EntryType, FactEntry};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::HashMap;

/// MLSD/MLST `modify` layout without fractions of a second.
pub const MLST_TIME_LAYOUT: &str = "%Y%m%d%H%M%S";
/// MLSD/MLST `modify` layout with fractions of a second.
pub const MLST_TIME_LAYOUT_FRAC: &str = "%Y%m%d%H%M%S%.f";

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

// ─── Unix-style parser ───────────────────────────────────────────────

/// Parse a LIST line relative to the current local time.
pub fn parse_list_line(line: &str) -> FtpResult<DirectoryEntry> {
    parse_list_line_at(line, Local::now())
}

/// Parse a Unix `ls -l` line:
/// ```text
/// drwxr-xr-x   2 user group  4096 Jan  1 12:00 dirname
/// -rw-r--r--   1 user group  1234 Jan  1  2025 file.txt
/// ```
///
/// Fields 5–7 are month, day and either `HH:MM` or a year. Without a year
/// the entry is dated this year, or last year if its month lies after
/// `now`'s month. Everything from field 8 on is the name, re-joined with
/// single spaces.
pub fn parse_list_line_at(line: &str, now: DateTime<Local>) -> FtpResult<DirectoryEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 9 {
        return Err(FtpError::format(format!("Unsupported LIST line: {}", line)));
    }

    let kind = match fields[0].chars().next() {
        Some('-') => EntryType::File,
        Some('d') => EntryType::Directory,
        Some('l') => EntryType::Symlink,
        _ => {
            return Err(FtpError::format(format!(
                "Unknown entry type '{}' in LIST line",
                fields[0]
            )))
        }
    };

    let size = if kind == EntryType::File {
        fields[4]
            .parse::<u64>()
            .map_err(|_| FtpError::format(format!("Invalid size '{}' in LIST line", fields[4])))?
    } else {
        0
    };

    let month = parse_month(fields[5])?;
    let day = fields[6]
        .parse::<u32>()
        .map_err(|_| FtpError::format(format!("Invalid day '{}' in LIST line", fields[6])))?;

    let (year, hour, minute) = if let Some((h, m)) = fields[7].split_once(':') {
        let mut year = now.year();
        if month > now.month() {
            year -= 1;
        }
        (year, parse_clock(h)?, parse_clock(m)?)
    } else {
        (parse_year(fields[7])?, 0, 0)
    };

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| FtpError::format(format!("Invalid date in LIST line: {}", line)))?;
    let time = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| FtpError::format(format!("Nonexistent local time in LIST line: {}", line)))?;

    Ok(DirectoryEntry {
        name: fields[8..].join(" "),
        kind,
        size,
        time,
    })
}

fn parse_month(s: &str) -> FtpResult<u32> {
    let lower = s.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| FtpError::format(format!("Invalid month '{}' in LIST line", s)))
}

fn parse_clock(s: &str) -> FtpResult<u32> {
    s.parse::<u32>()
        .map_err(|_| FtpError::format(format!("Invalid time '{}' in LIST line", s)))
}

/// Four-digit years are taken as-is; two-digit years pivot at 69.
fn parse_year(s: &str) -> FtpResult<i32> {
    let year = s
        .parse::<i32>()
        .map_err(|_| FtpError::format(format!("Invalid year '{}' in LIST line", s)))?;
    Ok(match (s.len(), year) {
        (1..=2, y) if y < 69 => 2000 + y,
        (1..=2, y) => 1900 + y,
        (_, y) => y,
    })
}

// ─── MLSD / MLST parser ──────────────────────────────────────────────

/// Parse an MLSD/MLST fact line: `fact1=val1;fact2=val2; filename`.
///
/// Malformed facts are dropped. The filename must follow exactly one
/// separating space after the last `;`.
pub fn parse_mlsx_line(line: &str) -> FtpResult<FactEntry> {
    let line = line.trim_matches(|c| c == ' ' || c == '\r' || c == '\n' || c == '\t');
    let mut fields: Vec<&str> = line.split(';').collect();
    let last = fields.pop().unwrap_or_default();

    let mut facts = HashMap::new();
    for item in fields {
        let kv: Vec<&str> = item.split('=').collect();
        if let [key, value] = kv.as_slice() {
            facts.insert(key.to_lowercase(), value.to_string());
        }
    }

    let name = last
        .strip_prefix(' ')
        .ok_or_else(|| FtpError::format(format!("Invalid filename '{}' in MLSx line", last)))?;

    Ok(FactEntry::new(name, facts))
}

/// Parse the `modify`/`create` fact format: `YYYYMMDDHHMMSS[.F...]`, UTC.
pub fn parse_mlst_time(s: &str) -> FtpResult<DateTime<Utc>> {
    let layout = if s.contains('.') {
        MLST_TIME_LAYOUT_FRAC
    } else {
        MLST_TIME_LAYOUT
    };
    NaiveDateTime::parse_from_str(s, layout)
        .map(|dt| Utc.from_utc_datetime(&dt))
        .map_err(|e| FtpError::format(format!("Invalid MLSx time '{}': {}", s, e)))
}
