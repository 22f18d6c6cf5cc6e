//! One decode run over a capture log.
//!
//! Reading is sequential. Decoding is a pure map over events, so it can be
//! spread across a rayon pool without changing the output order.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::capture::{CaptureEvent, EventReader};
use crate::config::Config;
use crate::decode::{DecodedEvent, Decoder};
use crate::report::{Report, Reporter};

/// Decoder settings plus the execution strategy.
#[derive(Debug, Clone)]
pub struct Session {
    decoder: Decoder,
    preview_chars: usize,
    parallel: bool,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            decoder: Decoder::new(&config.decode),
            preview_chars: config.output.preview_chars,
            parallel: false,
        }
    }

    /// Decode events on a rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Decode a capture log on disk.
    ///
    /// # Errors
    ///
    /// Fails only when the file is missing or cannot be opened. Problems
    /// inside the file end up in the report.
    pub fn run_file(&self, path: &Path) -> Result<Report> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("File not found: {}", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("Not a file: {}", path.display());
        }
        let reader = EventReader::open(path)?;
        Ok(self.run(reader, path.to_path_buf(), metadata.len()))
    }

    /// Decode every event from `reader`.
    pub fn run<R: BufRead>(
        &self,
        mut reader: EventReader<R>,
        source: PathBuf,
        file_size: u64,
    ) -> Report {
        let mut reporter = Reporter::new(self.preview_chars);
        let mut events = Vec::new();
        for item in &mut reader {
            match item {
                Ok(event) => events.push(event),
                Err(err) => reporter.record_warning(&err),
            }
        }
        info!(
            lines = reader.line(),
            events = events.len(),
            parallel = self.parallel,
            "decoding capture"
        );

        for (event, decoded) in events.iter().zip(self.decode_all(&events)) {
            reporter.record_event(event, &decoded);
        }
        reporter.finish(source, file_size)
    }

    fn decode_all(&self, events: &[CaptureEvent]) -> Vec<DecodedEvent> {
        if !self.parallel || events.len() < 2 {
            return events.iter().map(|e| self.decoder.decode(e)).collect();
        }
        match rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("decoder-{}", i))
            .build()
        {
            Ok(pool) => pool.install(|| events.par_iter().map(|e| self.decoder.decode(e)).collect()),
            Err(e) => {
                warn!(error = %e, "failed to create thread pool, decoding sequentially");
                events.iter().map(|e| self.decoder.decode(e)).collect()
            }
        }
    }
}
