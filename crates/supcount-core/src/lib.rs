//! Forced-subtitle statistics for Presentation Graphics Stream (SUP) files.
//!
//! This crate implements the decoding pipeline used by the CLI: a source
//! (file or buffered standard input) feeds a big-endian field reader, the
//! segment walker decodes segment headers, and presentation composition
//! segments are decoded down to their sprite records. Everything else in the
//! stream is skipped by its declared body size. All I/O is isolated in
//! `source`; the `protocols::pgs` decoders only see a `SupReader`.
//!
//! Invariants:
//! - The walker always lands on `body_start + body_size` before the next
//!   header, regardless of how much of the body was decoded.
//! - A stream ends cleanly only on a segment boundary; any shortfall is a
//!   truncation error and no partial summary is returned.
//! - `forced_objects <= total_objects`.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use supcount_core::analyze_sup_file;
//!
//! let summary = analyze_sup_file(Path::new("subtitles.sup"))?;
//! println!("{summary}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

mod analysis;
pub mod protocols;
mod source;

pub use analysis::{
    AnalysisError, FailureKind, analyze_source, analyze_stdin, analyze_sup_file, count_forced,
};
pub use source::{STDIN_LABEL, SourceError, SupInput};

/// Per-stream counters accumulated by the segment walker.
///
/// # Examples
/// ```
/// use supcount_core::StreamSummary;
///
/// let summary = StreamSummary {
///     forced_objects: 1,
///     total_objects: 2,
///     segments: 2,
///     compositions: 1,
/// };
/// assert_eq!(summary.to_string(), "1 2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSummary {
    /// Composition objects flagged forced.
    pub forced_objects: u64,
    /// Composition objects across all PCS segments.
    pub total_objects: u64,
    /// Segment headers decoded.
    pub segments: u64,
    /// Presentation composition segments decoded.
    pub compositions: u64,
}

impl fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.forced_objects, self.total_objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_all_counters() {
        let summary = StreamSummary {
            forced_objects: 3,
            total_objects: 7,
            segments: 12,
            compositions: 4,
        };
        let value = serde_json::to_value(&summary).expect("summary json");
        assert_eq!(value["forced_objects"], 3);
        assert_eq!(value["total_objects"], 7);
        assert_eq!(value["segments"], 12);
        assert_eq!(value["compositions"], 4);
    }

    #[test]
    fn default_summary_renders_zero_zero() {
        assert_eq!(StreamSummary::default().to_string(), "0 0");
    }
}
