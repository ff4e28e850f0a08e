use std::io::{self, ErrorKind, Read};

use log::trace;

const INITIAL_CAPACITY: usize = 16;

/// Reads newline-terminated lines of any length from a byte stream.
///
/// The buffer starts small and doubles every time it fills up without
/// holding a complete line. Bytes read past the end of a line stay in the
/// buffer for the next call.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    capacity: usize,
    eof: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            capacity: INITIAL_CAPACITY,
            eof: false,
        }
    }

    /// Current size of the line buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the next line without its trailing newline, or `None` once
    /// the stream is exhausted and nothing is pending.
    ///
    /// A final line without a newline is still returned. A line that is not
    /// valid UTF-8 is consumed and reported as [`ErrorKind::InvalidData`];
    /// running out of memory while growing the buffer is reported as
    /// [`ErrorKind::OutOfMemory`].
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut scanned = 0;
        loop {
            if let Some(pos) = self.buf[scanned..].iter().position(|&b| b == b'\n') {
                let end = scanned + pos;
                let mut line: Vec<u8> = self.buf.drain(..=end).collect();
                line.pop();
                return decode(line).map(Some);
            }
            scanned = self.buf.len();

            if self.eof {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let line = std::mem::take(&mut self.buf);
                return decode(line).map(Some);
            }

            if self.buf.len() >= self.capacity {
                self.grow()?;
            }
            self.fill()?;
        }
    }

    fn grow(&mut self) -> io::Result<()> {
        let capacity = self
            .capacity
            .checked_mul(2)
            .ok_or_else(|| io::Error::new(ErrorKind::OutOfMemory, "line too long"))?;
        self.buf
            .try_reserve_exact(capacity - self.buf.len())
            .map_err(|e| io::Error::new(ErrorKind::OutOfMemory, e))?;
        trace!("line buffer grown to {} bytes", capacity);
        self.capacity = capacity;
        Ok(())
    }

    fn fill(&mut self) -> io::Result<()> {
        let start = self.buf.len();
        self.buf.resize(self.capacity, 0);
        let read = loop {
            match self.inner.read(&mut self.buf[start..]) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        match read {
            Ok(0) => {
                self.buf.truncate(start);
                self.eof = true;
                Ok(())
            }
            Ok(n) => {
                self.buf.truncate(start + n);
                Ok(())
            }
            Err(e) => {
                self.buf.truncate(start);
                Err(e)
            }
        }
    }
}

fn decode(bytes: Vec<u8>) -> io::Result<String> {
    String::from_utf8(bytes).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most `chunk` bytes per read call.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_lines_are_split_and_stripped() {
        let mut reader = LineReader::new(&b"ls -l\n\necho hi | cat\n"[..]);
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("ls -l"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("echo hi | cat"));
        assert_eq!(reader.read_line().unwrap(), None);
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_final_line_without_newline() {
        let mut reader = LineReader::new(&b"first\nlast"[..]);
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("first"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("last"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_empty_input_is_end_of_input() {
        let mut reader = LineReader::new(&b""[..]);
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_buffer_doubles_for_long_lines() {
        let long = "x".repeat(100);
        let input = format!("{}\nshort\n", long);
        let mut reader = LineReader::new(Trickle {
            data: input.as_bytes(),
            chunk: 7,
        });
        assert_eq!(reader.capacity(), 16);
        assert_eq!(reader.read_line().unwrap(), Some(long));
        assert_eq!(reader.capacity(), 128);
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("short"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_carriage_return_is_kept() {
        let mut reader = LineReader::new(&b"dos\r\n"[..]);
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("dos\r"));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_invalid_utf8_is_rejected_not_rewritten() {
        let mut reader = LineReader::new(&b"cat caf\xe9.txt\necho ok\n"[..]);
        let err = reader.read_line().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        // The bad line is consumed; reading carries on with the next one.
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("echo ok"));
        assert_eq!(reader.read_line().unwrap(), None);
    }
}
