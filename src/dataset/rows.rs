use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::warn;

/// Lazy, forward-only sequence of raw text rows.
///
/// This is the input side of [`ParsingIterator`](super::ParsingIterator).
/// Implementations own whatever framing logic turns their medium into rows.
pub trait RowSource {
    /// Whether a current row is available. Has no side effects.
    fn is_valid(&self) -> bool;

    /// Move to the next row. A no-op once the source is exhausted.
    ///
    /// A failure leaves the source exhausted.
    fn advance(&mut self) -> io::Result<()>;

    /// The current row, or `None` once exhausted.
    fn current(&self) -> Option<&str>;
}

/// Row source over the lines of a buffered reader.
///
/// Keeps exactly one line read ahead; line terminators (`\n` or `\r\n`) are
/// stripped. Bytes that are not valid UTF-8 become U+FFFD, so such a row
/// reaches the parser instead of ending the stream.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    buffer: Vec<u8>,
    line: String,
    valid: bool,
    lines_read: usize,
}

impl LineSource<BufReader<File>> {
    /// Open a file and position the source on its first line.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: BufRead> LineSource<R> {
    /// Wrap a reader and position the source on its first line.
    pub fn new(reader: R) -> io::Result<Self> {
        let mut source = Self {
            reader,
            buffer: Vec::new(),
            line: String::new(),
            valid: true,
            lines_read: 0,
        };
        source.read_line()?;
        Ok(source)
    }

    /// Number of lines pulled from the reader so far, including the
    /// read-ahead line.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Release the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_line(&mut self) -> io::Result<()> {
        self.buffer.clear();
        self.line.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => {
                self.valid = false;
                Ok(())
            }
            Ok(_) => {
                if self.buffer.ends_with(b"\n") {
                    self.buffer.pop();
                    if self.buffer.ends_with(b"\r") {
                        self.buffer.pop();
                    }
                }
                self.lines_read += 1;
                let text = String::from_utf8_lossy(&self.buffer);
                if let Cow::Owned(_) = text {
                    warn!(line = self.lines_read, "replaced invalid UTF-8 in row");
                }
                self.line.push_str(&text);
                Ok(())
            }
            Err(err) => {
                self.valid = false;
                Err(err)
            }
        }
    }
}

impl<R: BufRead> RowSource for LineSource<R> {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn advance(&mut self) -> io::Result<()> {
        if !self.valid {
            return Ok(());
        }
        self.read_line()
    }

    fn current(&self) -> Option<&str> {
        self.valid.then_some(self.line.as_str())
    }
}

/// Row source over rows already held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource<S> {
    rows: Vec<S>,
    position: usize,
}

impl<S: AsRef<str>> MemorySource<S> {
    /// Create a source positioned on the first of `rows`.
    pub fn new(rows: Vec<S>) -> Self {
        Self { rows, position: 0 }
    }

    /// Rows not yet passed, including the current one.
    pub fn remaining(&self) -> usize {
        self.rows.len().saturating_sub(self.position)
    }
}

impl<S: AsRef<str>> FromIterator<S> for MemorySource<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<S: AsRef<str>> RowSource for MemorySource<S> {
    fn is_valid(&self) -> bool {
        self.position < self.rows.len()
    }

    fn advance(&mut self) -> io::Result<()> {
        if self.is_valid() {
            self.position += 1;
        }
        Ok(())
    }

    fn current(&self) -> Option<&str> {
        self.rows.get(self.position).map(AsRef::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn drain<R: RowSource>(mut source: R) -> Vec<String> {
        let mut rows = Vec::new();
        while source.is_valid() {
            rows.push(source.current().unwrap().to_string());
            source.advance().unwrap();
        }
        rows
    }

    #[test]
    fn test_line_source_strips_terminators() {
        let source = LineSource::new(Cursor::new("a\r\nb\nc")).unwrap();
        assert_eq!(drain(source), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_line_source_keeps_blank_rows() {
        let source = LineSource::new(Cursor::new("a\n\nb\n")).unwrap();
        assert_eq!(drain(source), vec!["a", "", "b"]);
    }

    #[test]
    fn test_line_source_empty_input() {
        let mut source = LineSource::new(Cursor::new("")).unwrap();
        assert!(!source.is_valid());
        assert!(source.current().is_none());
        source.advance().unwrap();
        assert!(!source.is_valid());
        assert_eq!(source.lines_read(), 0);
    }

    #[test]
    fn test_line_source_reads_one_ahead() {
        let mut source = LineSource::new(Cursor::new("x\ny\n")).unwrap();
        assert_eq!(source.lines_read(), 1);
        source.advance().unwrap();
        assert_eq!(source.lines_read(), 2);
        assert_eq!(source.current(), Some("y"));
    }

    /// Yields `good` and then fails every read.
    struct Flaky {
        good: Cursor<Vec<u8>>,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.good.read(buf)?;
            if n == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "device unplugged"));
            }
            Ok(n)
        }
    }

    #[test]
    fn test_line_source_read_error_exhausts() {
        let reader = BufReader::new(Flaky {
            good: Cursor::new(b"first\n".to_vec()),
        });
        let mut source = LineSource::new(reader).unwrap();
        assert_eq!(source.current(), Some("first"));

        let err = source.advance().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(!source.is_valid());
        assert!(source.current().is_none());
    }

    #[test]
    fn test_line_source_survives_invalid_utf8() {
        let source = LineSource::new(Cursor::new(b"a\n1:2\t\xff\nc\r\n".to_vec())).unwrap();
        assert_eq!(drain(source), vec!["a", "1:2\t\u{FFFD}", "c"]);
    }

    #[test]
    fn test_memory_source() {
        let mut source: MemorySource<&str> = ["r0", "r1"].into_iter().collect();
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.current(), Some("r0"));
        source.advance().unwrap();
        assert_eq!(source.current(), Some("r1"));
        source.advance().unwrap();
        assert!(!source.is_valid());
        source.advance().unwrap();
        assert_eq!(source.remaining(), 0);
    }
}
