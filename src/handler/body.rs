//! Streaming file body
//!
//! Owns the open media file for the lifetime of the response body. The file is
//! closed when the body is dropped, whether the stream reached end of file,
//! failed to read, or the client went away.

use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures_util::Stream;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::StatusCode;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::http::ResponseBody;
use crate::logger::{self, PendingAccessLog};

/// File contents from the current offset to end of file, as body frames
pub struct FileStream {
    inner: ReaderStream<File>,
    status: StatusCode,
    bytes_sent: u64,
    finished: bool,
    access: Option<PendingAccessLog>,
}

impl FileStream {
    /// `file` must already be positioned at the first byte to send
    pub fn new(
        file: File,
        chunk_size: usize,
        status: StatusCode,
        access: Option<PendingAccessLog>,
    ) -> Self {
        Self {
            inner: ReaderStream::with_capacity(file, chunk_size),
            status,
            bytes_sent: 0,
            finished: false,
            access,
        }
    }

    pub fn into_body(self) -> ResponseBody {
        StreamBody::new(self).boxed_unsync()
    }
}

impl Stream for FileStream {
    type Item = io::Result<Frame<Bytes>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
            Some(Ok(chunk)) => {
                this.bytes_sent += chunk.len() as u64;
                Poll::Ready(Some(Ok(Frame::data(chunk))))
            }
            Some(Err(e)) => {
                this.finished = true;
                logger::log_error(&format!(
                    "Failed to read media file after {} bytes: {e}",
                    this.bytes_sent
                ));
                Poll::Ready(Some(Err(e)))
            }
            None => {
                this.finished = true;
                logger::log_stream_completed(this.bytes_sent);
                Poll::Ready(None)
            }
        }
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        if !self.finished {
            logger::log_client_disconnected(self.bytes_sent);
        }
        if let Some(access) = self.access.take() {
            access.finish(self.status.as_u16(), self.bytes_sent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::io::Write;
    use tokio::io::AsyncSeekExt;

    fn fixture(len: usize) -> (tempfile::NamedTempFile, Vec<u8>) {
        #[allow(clippy::cast_possible_truncation)]
        let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&data).expect("write fixture");
        (file, data)
    }

    #[tokio::test]
    async fn test_streams_whole_file_in_chunks() {
        let (fixture, data) = fixture(10_000);
        let file = File::open(fixture.path()).await.expect("open fixture");
        let mut stream = FileStream::new(file, 4096, StatusCode::OK, None);

        let mut received = Vec::new();
        while let Some(frame) = stream.next().await {
            let chunk = frame.expect("read ok").into_data().expect("data frame");
            received.extend_from_slice(&chunk);
        }

        assert_eq!(received, data);
        assert!(stream.finished);
        assert_eq!(stream.bytes_sent, 10_000);
        // Stays finished once end of file was seen
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_streams_from_seek_position() {
        let (fixture, data) = fixture(1000);
        let mut file = File::open(fixture.path()).await.expect("open fixture");
        file.seek(io::SeekFrom::Start(600)).await.expect("seek");

        let body = FileStream::new(file, 64, StatusCode::PARTIAL_CONTENT, None).into_body();
        let bytes = body.collect().await.expect("body").to_bytes();
        assert_eq!(&bytes[..], &data[600..]);
    }

    #[tokio::test]
    async fn test_drop_before_eof_is_not_finished() {
        let (fixture, _) = fixture(8192);
        let file = File::open(fixture.path()).await.expect("open fixture");
        let mut stream = FileStream::new(file, 1024, StatusCode::OK, None);

        let first = stream.next().await.expect("one frame").expect("read ok");
        let first_len = first.into_data().expect("data frame").len() as u64;
        assert!(first_len > 0);
        assert!(!stream.finished);
        assert_eq!(stream.bytes_sent, first_len);
        drop(stream);
    }
}
