//! Output sinks for scraped film records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::FilmRecord;
use crate::scrapers::ScrapeError;

/// Accepts finalized records one at a time. Serialization and storage live
/// behind this seam, not in the pipeline.
pub trait RecordSink {
    /// Write one record.
    fn write(&mut self, record: &FilmRecord) -> Result<(), ScrapeError>;

    /// Flush any buffered output. Called once after the crawl.
    fn finish(&mut self) -> Result<(), ScrapeError> {
        Ok(())
    }
}

/// JSON Lines sink: one serialized record per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Create a sink writing to a file at `path`.
    pub fn create(path: &Path) -> Result<Self, ScrapeError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a sink over any writer.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn write(&mut self, record: &FilmRecord) -> Result<(), ScrapeError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ScrapeError> {
        self.writer.flush()?;
        Ok(())
    }
}
