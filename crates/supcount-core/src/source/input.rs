use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use super::SourceError;

/// Label used for standard input in messages and reports.
pub const STDIN_LABEL: &str = "stdin";

/// An opened SUP byte source.
///
/// Standard input is not seekable, so it is buffered in memory up front.
/// The handle is closed when the value is dropped.
pub struct SupInput {
    label: String,
    inner: InputReader,
}

enum InputReader {
    File(BufReader<File>),
    Stdin(Cursor<Vec<u8>>),
}

impl SupInput {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            label: path.display().to_string(),
            inner: InputReader::File(BufReader::new(file)),
        })
    }

    pub fn stdin() -> Result<Self, SourceError> {
        Self::from_reader(STDIN_LABEL, io::stdin().lock())
    }

    /// Buffer an arbitrary non-seekable reader into memory.
    pub fn from_reader<R: Read>(label: &str, mut reader: R) -> Result<Self, SourceError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self {
            label: label.to_string(),
            inner: InputReader::Stdin(Cursor::new(data)),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Read for SupInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            InputReader::File(reader) => reader.read(buf),
            InputReader::Stdin(reader) => reader.read(buf),
        }
    }
}

impl BufRead for SupInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match &mut self.inner {
            InputReader::File(reader) => reader.fill_buf(),
            InputReader::Stdin(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match &mut self.inner {
            InputReader::File(reader) => reader.consume(amt),
            InputReader::Stdin(reader) => reader.consume(amt),
        }
    }
}

impl Seek for SupInput {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.inner {
            InputReader::File(reader) => reader.seek(pos),
            InputReader::Stdin(reader) => reader.seek(pos),
        }
    }

    fn seek_relative(&mut self, offset: i64) -> io::Result<()> {
        match &mut self.inner {
            InputReader::File(reader) => reader.seek_relative(offset),
            InputReader::Stdin(reader) => Seek::seek_relative(reader, offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SupInput;
    use crate::source::SourceError;
    use std::io::{BufRead, Read, Seek, SeekFrom};
    use std::path::Path;

    #[test]
    fn open_missing_file_is_unavailable() {
        let err = match SupInput::open(Path::new("definitely/not/here.sup")) {
            Ok(_) => panic!("expected missing file to be rejected"),
            Err(err) => err,
        };
        match err {
            SourceError::Unavailable { path, .. } => {
                assert_eq!(path, Path::new("definitely/not/here.sup"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn buffered_reader_is_seekable() {
        let mut input = SupInput::from_reader("pipe", &[1u8, 2, 3, 4][..]).unwrap();
        assert_eq!(input.label(), "pipe");
        assert_eq!(input.fill_buf().unwrap(), &[1, 2, 3, 4]);
        input.seek(SeekFrom::Start(2)).unwrap();
        let mut rest = Vec::new();
        input.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, vec![3, 4]);
    }

    #[test]
    fn relative_seek_keeps_file_buffer_consistent() {
        let path = std::env::temp_dir().join(format!(
            "supcount_input_{}.sup",
            std::process::id()
        ));
        std::fs::write(&path, [10u8, 11, 12, 13, 14, 15]).unwrap();
        let mut input = SupInput::open(&path).unwrap();
        let mut byte = [0u8; 1];
        input.read_exact(&mut byte).unwrap();
        input.seek_relative(3).unwrap();
        input.read_exact(&mut byte).unwrap();
        assert_eq!(byte[0], 14);
        input.seek_relative(-4).unwrap();
        input.read_exact(&mut byte).unwrap();
        assert_eq!(byte[0], 11);
        assert_eq!(input.stream_position().unwrap(), 2);
        drop(input);
        let _ = std::fs::remove_file(&path);
    }
}
