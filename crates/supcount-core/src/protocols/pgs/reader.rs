use std::io::{BufRead, ErrorKind, Seek, SeekFrom};

use super::error::PgsError;

/// Big-endian field reader over a seekable, buffered byte source.
///
/// Tracks the absolute offset itself so that error reports and segment
/// resynchronisation never need to query the underlying handle.
pub struct SupReader<R> {
    inner: R,
    pos: u64,
}

impl<R: BufRead + Seek> SupReader<R> {
    /// Wrap `inner`, starting at its current stream position.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use supcount_core::protocols::pgs::reader::SupReader;
    ///
    /// let mut reader = SupReader::new(Cursor::new(vec![0x12, 0x34])).unwrap();
    /// assert_eq!(reader.read_u16_be().unwrap(), 0x1234);
    /// ```
    ///
    /// # Errors
    /// Returns `PgsError::Io` when the stream position cannot be queried.
    pub fn new(mut inner: R) -> Result<Self, PgsError> {
        let pos = inner.stream_position()?;
        Ok(Self { inner, pos })
    }

    pub fn read_u8(&mut self) -> Result<u8, PgsError> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, PgsError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, PgsError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Consume `bytes.len()` bytes and fail on the first one that differs.
    ///
    /// The reported offset is the absolute position of the mismatching byte.
    pub fn expect(&mut self, bytes: &[u8]) -> Result<(), PgsError> {
        for &expected in bytes {
            let offset = self.pos;
            let actual = self.read_u8()?;
            if actual != expected {
                return Err(PgsError::Malformed {
                    expected,
                    actual,
                    offset,
                });
            }
        }
        Ok(())
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Move to an absolute offset. Seeking past the end is allowed; the next
    /// read then fails as truncation.
    ///
    /// Moves relative to the tracked position so buffered sources can keep
    /// their buffer when the target is already loaded.
    pub fn seek(&mut self, offset: u64) -> Result<(), PgsError> {
        let delta = if offset >= self.pos {
            i64::try_from(offset - self.pos).ok()
        } else {
            i64::try_from(self.pos - offset).ok().map(|back| -back)
        };
        match delta {
            Some(delta) => self.inner.seek_relative(delta)?,
            None => {
                self.inner.seek(SeekFrom::Start(offset))?;
            }
        }
        self.pos = offset;
        Ok(())
    }

    /// Report whether at least one more byte is available without consuming it.
    pub fn has_more(&mut self) -> Result<bool, PgsError> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(!buf.is_empty()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PgsError::Io(err)),
            }
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PgsError> {
        let mut buf = [0u8; N];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                self.pos += N as u64;
                Ok(buf)
            }
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Err(PgsError::Truncated {
                offset: self.pos,
                needed: N,
            }),
            Err(err) => Err(PgsError::Io(err)),
        }
    }
}
