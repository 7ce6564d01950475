use std::io::{BufRead, Seek};
use std::path::Path;

use thiserror::Error;

use crate::StreamSummary;
use crate::protocols::pgs::{PgsError, SupReader};
use crate::source::{SourceError, SupInput};

mod walker;

pub use walker::count_forced;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Decode(#[from] PgsError),
}

/// Coarse failure classes, used by callers to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InputUnavailable,
    IoFailure,
    MalformedData,
    TruncatedStream,
}

impl AnalysisError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalysisError::Source(SourceError::Unavailable { .. }) => FailureKind::InputUnavailable,
            AnalysisError::Source(SourceError::Io(_)) => FailureKind::IoFailure,
            AnalysisError::Decode(PgsError::Io(_)) => FailureKind::IoFailure,
            AnalysisError::Decode(PgsError::Malformed { .. }) => FailureKind::MalformedData,
            AnalysisError::Decode(PgsError::Truncated { .. }) => FailureKind::TruncatedStream,
        }
    }
}

pub fn analyze_sup_file(path: &Path) -> Result<StreamSummary, AnalysisError> {
    let source = SupInput::open(path)?;
    analyze_source(source)
}

pub fn analyze_stdin() -> Result<StreamSummary, AnalysisError> {
    let source = SupInput::stdin()?;
    analyze_source(source)
}

/// Count forced objects in any seekable source; the source is dropped on return.
pub fn analyze_source<S: BufRead + Seek>(source: S) -> Result<StreamSummary, AnalysisError> {
    let mut reader = SupReader::new(source)?;
    let summary = count_forced(&mut reader)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::{AnalysisError, FailureKind, analyze_source, analyze_sup_file};
    use std::io::Cursor;
    use std::path::Path;

    #[test]
    fn missing_file_is_input_unavailable() {
        let err = analyze_sup_file(Path::new("no/such/input.sup")).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InputUnavailable);
    }

    #[test]
    fn bad_magic_is_malformed() {
        let err = analyze_source(Cursor::new(b"XX".to_vec())).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedData);
        assert!(err.to_string().contains("@offset 0"));
    }

    #[test]
    fn short_header_is_truncated() {
        let err = analyze_source(Cursor::new(b"PG\x00".to_vec())).unwrap_err();
        assert_eq!(err.kind(), FailureKind::TruncatedStream);
    }

    #[test]
    fn io_error_kind() {
        let err = AnalysisError::from(crate::source::SourceError::Io(std::io::Error::other(
            "broken pipe",
        )));
        assert_eq!(err.kind(), FailureKind::IoFailure);
    }

    #[test]
    fn empty_source_is_zero_zero() {
        let summary = analyze_source(Cursor::new(Vec::new())).unwrap();
        assert_eq!(summary.to_string(), "0 0");
    }
}
