//! Line-delimited capture log reader.
//!
//! Yields one [`CaptureEvent`] per non-empty line, lazily. A line that does
//! not parse produces a `MalformedRecord` item and reading continues with
//! the next line. Blank lines are skipped silently.
//!
//! # Example
//!
//! ```no_run
//! use capdec::capture::EventReader;
//!
//! let mut reader = EventReader::open("capture.jsonl")?;
//! for item in &mut reader {
//!     match item {
//!         Ok(event) => println!("{} {}", event.line, event.function),
//!         Err(err) => eprintln!("Warning: {}", err),
//!     }
//! }
//! reader.rewind()?; // scan again from the first line
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use super::CaptureEvent;
use crate::error::DecodeError;

/// Lazy, restartable reader over a capture log.
pub struct EventReader<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
    done: bool,
}

impl EventReader<BufReader<File>> {
    /// Open a capture log on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open capture file: {:?}", path))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead + Seek> EventReader<R> {
    /// Restart from the first line.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line = 0;
        self.done = false;
        Ok(())
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = std::result::Result<CaptureEvent, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {
                    self.line += 1;
                }
                Err(source) => {
                    self.line += 1;
                    self.done = true;
                    warn!(line = self.line, error = %source, "read error, stopping scan");
                    return Some(Err(DecodeError::Io {
                        line: self.line,
                        source,
                    }));
                }
            }

            let line_no = self.line;
            let text = match std::str::from_utf8(&self.buf) {
                Ok(text) => text.trim(),
                Err(e) => {
                    let err = DecodeError::MalformedRecord {
                        line: line_no,
                        reason: format!("invalid UTF-8: {}", e),
                    };
                    warn!(line = line_no, "{}", err);
                    return Some(Err(err));
                }
            };

            if text.is_empty() {
                continue;
            }

            return Some(CaptureEvent::from_json(line_no, text).map_err(|reason| {
                warn!(line = line_no, %reason, "skipping malformed record");
                DecodeError::MalformedRecord {
                    line: line_no,
                    reason,
                }
            }));
        }
    }
}
