//! # File Naming Module
//!
//! Deterministic construction of export file stems. A stem is the file name
//! without directory or extension, and follows a fixed grammar so that
//! downstream consumers (and humans) can parse names back into their parts:
//!
//! ```text
//! [parent--]name[--tagname][--dates]
//! ```
//!
//! Rules applied, in order:
//!
//! 1. All free-text parts are lowercased.
//! 2. A single sampling date renders as `YYYYMMDD`; a date pair renders as
//!    `t1_t0` (newest first) unless reversed, so a diff between a monitor
//!    and a base survey is recognizable from the name alone.
//! 3. Dots and spaces become underscores, runs of underscores collapse to
//!    one, and the Norwegian letters æ/ø/å transliterate to ae/oe/aa.
//!
//! Stems never contain path separators; directory placement is handled by
//! [`crate::paths`].

mod stem;


pub use stem::{build_filestem, compact_date, StemParts};

use thiserror::Error;

/// Separator between the parts of a file stem.
pub const PART_SEPARATOR: &str = "--";

/// Separator between the two dates of a date-pair suffix.
pub const DATE_SEPARATOR: &str = "_";

/// Errors from file-stem construction.
#[derive(Error, Debug)]
pub enum FilenameError {
    /// No name was given and none could be inferred from the object.
    #[error("The 'name' entry is missing for constructing a file name")]
    MissingName,

    /// A monitor date was given without a base date.
    #[error("Not legal: 'time0' is missing while 'time1' is present")]
    BaseDateMissing,
}
