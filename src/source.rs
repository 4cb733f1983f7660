//! Input resolution, Latin-1 decoding and size-bounded chunking.
//!
//! Input is read as `;`-delimited lines with quoting disabled, so every line
//! splits exactly on the delimiter. The first line is a header and is dropped.

use crate::error::{Result, SyncError};
use csv::{ByteRecord, ReaderBuilder};
use log::{debug, info};
use reqwest::blocking::Client;
use std::fs::File;
use std::io::{BufReader, Read};

/// Field delimiter for customer files.
pub const DELIMITER: u8 = b';';

/// Returns `true` when `location` should be fetched over HTTP.
pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Opens a local path or an HTTP(S) URL as a byte stream.
///
/// Remote bodies are streamed, not buffered. A missing file or a failed /
/// non-success fetch is reported as [`SyncError::InputUnavailable`].
pub fn open_input(location: &str, http: &Client) -> Result<Box<dyn Read>> {
    if is_url(location) {
        info!("Fetching input from {}", location);
        let response = http
            .get(location)
            .send()
            .map_err(|e| match SyncError::transport(location, e) {
                SyncError::Http(e) => unavailable(location, e),
                other => other,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(location, format!("HTTP status {}", status)));
        }
        Ok(Box::new(response))
    } else {
        let file = File::open(location).map_err(|e| unavailable(location, e))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

fn unavailable(location: &str, reason: impl ToString) -> SyncError {
    SyncError::InputUnavailable {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

/// Decodes ISO-8859-1 bytes. Every byte value maps to the code point of the
/// same number, so decoding never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// A run of consecutive input lines whose combined size reached the threshold
/// (or the tail of the stream).
#[derive(Debug, Clone)]
pub struct Chunk {
    pub records: Vec<ByteRecord>,
    /// Raw bytes consumed for these lines, terminators and any skipped
    /// blank lines included.
    pub bytes: u64,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads a stream in chunks of whole lines.
///
/// Lines are accumulated until their byte total meets or exceeds the
/// threshold; the line that crosses it stays in the chunk. Without a
/// threshold the whole stream becomes one chunk. Blank lines are skipped.
pub struct ChunkReader<R: Read> {
    reader: csv::Reader<R>,
    threshold: Option<u64>,
    record: ByteRecord,
    records_read: usize,
}

impl<R: Read> ChunkReader<R> {
    /// Wraps `input` and consumes its header line.
    pub fn new(input: R, threshold: Option<u64>) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .quoting(false)
            .flexible(true)
            .has_headers(true)
            .from_reader(input);

        let header_fields = reader.byte_headers()?.len();
        debug!("Skipped header line with {} fields", header_fields);

        Ok(ChunkReader {
            reader,
            threshold,
            record: ByteRecord::new(),
            records_read: 0,
        })
    }

    /// Reads the next chunk, or `None` once the stream is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        let mut records = Vec::new();
        let mut bytes = 0u64;

        loop {
            let start = self.reader.position().byte();
            if !self.reader.read_byte_record(&mut self.record)? {
                break;
            }
            self.records_read += 1;
            bytes += self.reader.position().byte() - start;
            records.push(self.record.clone());

            if matches!(self.threshold, Some(limit) if bytes >= limit) {
                break;
            }
        }

        if records.is_empty() {
            return Ok(None);
        }

        debug!(
            "Read chunk of {} lines ({} bytes), {} lines so far",
            records.len(),
            bytes,
            self.records_read
        );
        Ok(Some(Chunk { records, bytes }))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}
