use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use weather_lookup::{Coordinate, LocationProvider};

/// Reads `lat,lon` updates, one per line. Blank lines and `#` comments are
/// skipped; unparseable lines are reported and skipped. A read error ends
/// the stream and is kept for [`take_error`](Self::take_error).
pub struct LineLocations<R> {
    lines: Lines<R>,
    error: Option<io::Error>,
}

impl LineLocations<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> LineLocations<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), error: None }
    }
}

impl<R> LineLocations<R> {
    /// The read error that ended the stream, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> LocationProvider for LineLocations<R> {
    async fn next_coordinate(&mut self) -> Option<Coordinate> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    tracing::debug!(error = %e, "location input ended with a read error");
                    self.error = Some(e);
                    return None;
                }
            };

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.parse::<Coordinate>() {
                Ok(coordinate) => return Some(coordinate),
                Err(e) => tracing::warn!(error = %e, "skipping location update"),
            }
        }
    }
}
