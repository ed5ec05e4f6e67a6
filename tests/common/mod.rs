use async_std::io::{self, Read};
use async_std::net::TcpListener;
use async_std::prelude::*;
use async_std::task::{self, JoinHandle};

use std::pin::Pin;
use std::task::{Context, Poll};

/// A byte source handing out at most `size` bytes per read, and returning
/// `Pending` before every chunk.
pub struct Chunked {
    bytes: Vec<u8>,
    pos: usize,
    size: usize,
    pending: bool,
}

impl Chunked {
    #[allow(dead_code)]
    pub fn new(bytes: impl Into<Vec<u8>>, size: usize) -> Self {
        Self {
            bytes: bytes.into(),
            pos: 0,
            size,
            pending: true,
        }
    }
}

impl Read for Chunked {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.pending {
            this.pending = false;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        this.pending = true;
        let len = this
            .size
            .min(buf.len())
            .min(this.bytes.len() - this.pos);
        buf[..len].copy_from_slice(&this.bytes[this.pos..this.pos + len]);
        this.pos += len;
        Poll::Ready(Ok(len))
    }
}

/// A [`Chunked`] source whose connection resets once its bytes run out.
pub struct Broken {
    inner: Chunked,
}

impl Broken {
    #[allow(dead_code)]
    pub fn new(bytes: impl Into<Vec<u8>>, size: usize) -> Self {
        Self {
            inner: Chunked::new(bytes, size),
        }
    }
}

impl Read for Broken {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        match Pin::new(&mut self.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(0)) => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset",
            ))),
            other => other,
        }
    }
}

/// Read one request head off `stream`.
#[allow(dead_code)]
pub async fn read_request<S: Read + Unpin>(stream: &mut S) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        let len = stream.read(&mut buf).await.unwrap();
        if len == 0 {
            break;
        }
        request.extend_from_slice(&buf[..len]);
    }
    request
}

/// Answer successive connections with `responses`, one each, closing the
/// connection after every answer. The handle yields the requests received.
#[allow(dead_code)]
pub async fn serve(responses: Vec<Vec<u8>>) -> (u16, JoinHandle<Vec<Vec<u8>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = task::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);
            stream.write_all(&response).await.unwrap();
        }
        requests
    });
    (port, handle)
}

/// A port nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
