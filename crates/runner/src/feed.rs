//! Frame Feed - line-delimited JSON frames
//!
//! Stands in for the exchange websocket: any `AsyncBufRead` (stdin, a
//! capture file, an in-memory buffer) yielding one frame per line.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

pub struct FrameReader<R> {
    lines: Lines<R>,
    frames_read: u64,
}

impl<R: AsyncBufRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            frames_read: 0,
        }
    }

    /// Next non-blank line, `None` at end of input
    pub async fn next_frame(&mut self) -> std::io::Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await? {
            let frame = line.trim();
            if frame.is_empty() {
                continue;
            }
            self.frames_read += 1;
            return Ok(Some(frame.to_string()));
        }
        Ok(None)
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}
