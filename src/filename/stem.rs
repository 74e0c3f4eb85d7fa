//! File-stem assembly and normalization.

use chrono::NaiveDate;
use log::warn;

use super::{FilenameError, DATE_SEPARATOR, PART_SEPARATOR};

/// The parts that make up a file stem.
///
/// Only `name` is mandatory. Dates are optional, but a monitor date
/// (`time1`) without a base date (`time0`) is rejected.
#[derive(Debug, Clone, Default)]
pub struct StemParts<'a> {
    /// Primary name of the exported object, e.g. a surface or table name.
    pub name: &'a str,
    /// Optional qualifier, e.g. an attribute or processing tag.
    pub tagname: &'a str,
    /// Optional parent qualifier, prepended before the name.
    pub parent: &'a str,
    /// Base (oldest) sampling date.
    pub time0: Option<NaiveDate>,
    /// Monitor (newest) sampling date. Requires `time0`.
    pub time1: Option<NaiveDate>,
    /// Render a date pair oldest-first (`t0_t1`) instead of the default
    /// newest-first (`t1_t0`).
    pub reverse_date_pair: bool,
}

impl<'a> StemParts<'a> {
    /// Stem with only a name; other parts are filled in by the caller.
    pub fn named(name: &'a str) -> Self {
        StemParts {
            name,
            ..StemParts::default()
        }
    }
}

/// Compact `YYYYMMDD` rendering of a date, as used in file stems.
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Build a normalized file stem from its parts.
///
/// See the module docs for the grammar. The returned stem is lowercase and
/// free of dots, spaces and repeated underscores, but it is *not* checked
/// for ASCII purity; that happens when the full destination path is derived.
pub fn build_filestem(parts: &StemParts) -> Result<String, FilenameError> {
    if parts.name.is_empty() {
        return Err(FilenameError::MissingName);
    }
    if parts.time0.is_none() && parts.time1.is_some() {
        return Err(FilenameError::BaseDateMissing);
    }

    let mut stem = parts.name.to_lowercase();
    if !parts.tagname.is_empty() {
        stem.push_str(PART_SEPARATOR);
        stem.push_str(&parts.tagname.to_lowercase());
    }
    if !parts.parent.is_empty() {
        stem = format!("{}{}{}", parts.parent.to_lowercase(), PART_SEPARATOR, stem);
    }

    match (parts.time0, parts.time1) {
        (Some(base), None) => {
            stem.push_str(PART_SEPARATOR);
            stem.push_str(&compact_date(base));
        }
        (Some(base), Some(monitor)) => {
            if base == monitor {
                warn!("The monitor date and base date are equal");
            }
            let (first, second) = if parts.reverse_date_pair {
                (base, monitor)
            } else {
                (monitor, base)
            };
            stem.push_str(PART_SEPARATOR);
            stem.push_str(&compact_date(first));
            stem.push_str(DATE_SEPARATOR);
            stem.push_str(&compact_date(second));
        }
        _ => {}
    }

    Ok(normalize(&stem))
}

/// Replace dots and spaces with underscores, transliterate Norwegian
/// letters, and collapse runs of underscores.
fn normalize(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut last_was_underscore = false;
    for ch in stem.chars() {
        let mapped: &str = match ch {
            '.' | ' ' | '_' => "_",
            'æ' => "ae",
            'ø' => "oe",
            'å' => "aa",
            _ => {
                out.push(ch);
                last_was_underscore = false;
                continue;
            }
        };
        if mapped == "_" {
            if !last_was_underscore {
                out.push('_');
            }
            last_was_underscore = true;
        } else {
            out.push_str(mapped);
            last_was_underscore = false;
        }
    }
    out
}
