//! Pull-based record source over a chunked byte stream.

use std::{collections::VecDeque, fmt::Display};

use futures::{Stream, StreamExt};
use shared::protocol::RawRecord;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{error::SessionError, frame::FrameDecoder};

/// Outcome of one pull.
#[derive(Debug, Clone, PartialEq)]
pub enum Pull {
    Record(RawRecord),
    /// The source is exhausted and every buffered frame has been delivered.
    Finished,
    /// The cancellation token fired while waiting for the next chunk.
    Cancelled,
}

pub struct RecordStream<S> {
    source: S,
    decoder: FrameDecoder,
    ready: VecDeque<RawRecord>,
    cancel: CancellationToken,
    exhausted: bool,
    chunks_read: usize,
}

impl<S, B, E> RecordStream<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    pub fn new(source: S, cancel: CancellationToken) -> Self {
        Self {
            source,
            decoder: FrameDecoder::new(),
            ready: VecDeque::new(),
            cancel,
            exhausted: false,
            chunks_read: 0,
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns the next decoded record. The only await point is the read of
    /// the next chunk, and that is where cancellation is observed; records
    /// already decoded from a received chunk are handed out first.
    pub async fn next_record(&mut self) -> Result<Pull, SessionError> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Ok(Pull::Record(record));
            }
            if self.exhausted {
                return Ok(Pull::Finished);
            }

            let chunk = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!(chunks_read = self.chunks_read, "record stream cancelled");
                    return Ok(Pull::Cancelled);
                }
                chunk = self.source.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => {
                    self.chunks_read += 1;
                    self.ready.extend(self.decoder.push(bytes.as_ref())?);
                }
                Some(Err(err)) => {
                    return Err(SessionError::transport(format!(
                        "debate stream interrupted: {err}"
                    )));
                }
                None => {
                    self.exhausted = true;
                    if let Some(record) = self.decoder.finish()? {
                        self.ready.push_back(record);
                    }
                    debug!(chunks_read = self.chunks_read, "record stream exhausted");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/stream_tests.rs"]
mod tests;
