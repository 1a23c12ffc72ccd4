//! Incremental decoder for the `data: {...}` framed debate stream.
//!
//! Frames are separated by a blank line. Bytes may arrive split anywhere,
//! including inside a multi-byte character, so the decoder keeps both an
//! undecoded byte tail and a text buffer between calls.

use std::str;

use shared::protocol::RawRecord;

use crate::error::FrameDecodeError;

const FRAME_SEPARATOR: &str = "\n\n";
const DATA_PREFIX: &str = "data:";

#[derive(Debug, Default)]
pub struct FrameDecoder {
    pending_bytes: Vec<u8>,
    buffer: String,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every record completed by it, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<RawRecord>, FrameDecodeError> {
        self.pending_bytes.extend_from_slice(chunk);
        self.decode_pending_text(false);

        let mut records = Vec::new();
        while let Some(end) = self.buffer.find(FRAME_SEPARATOR) {
            let frame: String = self.buffer.drain(..end + FRAME_SEPARATOR.len()).collect();
            if let Some(record) = decode_frame(&frame[..end])? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Flushes whatever is left once the source is exhausted. A producer that
    /// omits the trailing blank line still gets its last frame decoded.
    pub fn finish(&mut self) -> Result<Option<RawRecord>, FrameDecodeError> {
        self.decode_pending_text(true);
        let residual = std::mem::take(&mut self.buffer);
        if residual.trim().is_empty() {
            return Ok(None);
        }
        decode_frame(&residual)
    }

    /// Number of buffered characters not yet part of a complete frame.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.pending_bytes.len()
    }

    fn decode_pending_text(&mut self, at_end: bool) {
        let mut consumed = 0;
        loop {
            let rest = &self.pending_bytes[consumed..];
            match str::from_utf8(rest) {
                Ok(text) => {
                    push_text(&mut self.buffer, text);
                    consumed = self.pending_bytes.len();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    if let Ok(text) = str::from_utf8(&rest[..valid]) {
                        push_text(&mut self.buffer, text);
                    }
                    match err.error_len() {
                        Some(invalid) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            consumed += valid + invalid;
                        }
                        // Truncated sequence at the end of the chunk.
                        None if at_end => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            consumed = self.pending_bytes.len();
                            break;
                        }
                        None => {
                            consumed += valid;
                            break;
                        }
                    }
                }
            }
        }
        self.pending_bytes.drain(..consumed);
    }
}

fn push_text(buffer: &mut String, text: &str) {
    buffer.extend(text.chars().filter(|c| *c != '\r'));
}

fn decode_frame(frame: &str) -> Result<Option<RawRecord>, FrameDecodeError> {
    let Some(line) = frame.lines().find(|line| line.starts_with(DATA_PREFIX)) else {
        return Ok(None);
    };
    let payload = line[DATA_PREFIX.len()..].trim();
    if payload.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<RawRecord>(payload)
        .map(Some)
        .map_err(|source| FrameDecodeError::new(payload, source))
}

#[cfg(test)]
#[path = "tests/frame_tests.rs"]
mod tests;
