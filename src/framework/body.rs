//! In-memory response body stream.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use bytes::Bytes;

/// Writable, readable, seekable in-memory body.
///
/// Writing at a position inside the buffer overwrites bytes in place and does
/// not truncate what follows the cursor.
#[derive(Debug, Clone, Default)]
pub struct Body {
    inner: Cursor<Vec<u8>>,
}

impl Body {
    /// Create an empty body.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the cursor back to the start.
    #[inline]
    pub fn rewind(&mut self) {
        self.inner.set_position(0);
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Read everything from the cursor to the end.
    pub fn contents(&mut self) -> io::Result<String> {
        let mut out = String::new();
        self.inner.read_to_string(&mut out)?;
        Ok(out)
    }

    /// Copy the full buffer, independent of the cursor.
    #[inline]
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.inner.get_ref())
    }

    /// Total length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Check if the body is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for Body {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for Body {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl From<Vec<u8>> for Body {
    /// The cursor starts at the end, ready for appending.
    fn from(buf: Vec<u8>) -> Self {
        let pos = buf.len() as u64;
        let mut inner = Cursor::new(buf);
        inner.set_position(pos);
        Self { inner }
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes().to_vec())
    }
}
