use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;

use async_io::Async;
use futures_lite::io::{AsyncReadExt, AsyncWriteExt};
use futures_rustls::rustls::pki_types::ServerName;
use futures_rustls::TlsConnector;
use http_types::Url;

use super::{secure, ClientConfig, Wire};
use crate::stream::Stream;
use crate::{Error, Request, Response, Result, READ_BUFFER_LEN};

/// Conventional port of plain HTTP.
pub const HTTP_PORT: u16 = 80;

/// Conventional port of HTTP over TLS.
pub const HTTPS_PORT: u16 = 443;

/// Sends each request over a fresh socket and reads the response to the end.
///
/// The socket is closed once the peer has finished sending; keeping a
/// connection around is left to the wires stacked on top of this one.
#[derive(Debug, Clone)]
pub struct RawWire {
    host: String,
    port: u16,
    tls: Option<Arc<ClientConfig>>,
}

impl RawWire {
    /// Create a plain TCP wire to `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls: None,
        }
    }

    /// Create a wire for the server `url` points at.
    ///
    /// `http` URLs get a plain socket on port 80, `https` URLs a TLS socket
    /// on port 443, unless the URL names its own port.
    pub fn from_url(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::Url(format!("{} has no host", url)))?;
        match url.scheme() {
            "http" => Ok(Self::new(host, url.port().unwrap_or(HTTP_PORT))),
            "https" => Ok(Self::with_tls(
                host,
                url.port().unwrap_or(HTTPS_PORT),
                secure::default_config()?,
            )),
            scheme => Err(Error::Url(format!("unsupported scheme {}", scheme))),
        }
    }

    pub(crate) fn with_tls(host: impl Into<String>, port: u16, config: Arc<ClientConfig>) -> Self {
        Self {
            host: host.into(),
            port,
            tls: Some(config),
        }
    }

    /// The host this wire connects to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The TCP port this wire connects to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether the socket is wrapped in TLS.
    pub fn is_secure(&self) -> bool {
        self.tls.is_some()
    }

    async fn connect(&self) -> Result<Stream> {
        let addrs = resolve(&self.host, self.port).await?;
        let mut last = None;
        for addr in addrs {
            match Async::<TcpStream>::connect(addr).await {
                Ok(tcp) => return self.handshake(tcp).await,
                Err(err) => {
                    log::debug!("connecting to {} failed: {}", addr, err);
                    last = Some(err);
                }
            }
        }
        let err = last.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {}", self.host),
            )
        });
        Err(err.into())
    }

    async fn handshake(&self, tcp: Async<TcpStream>) -> Result<Stream> {
        let config = match &self.tls {
            None => return Ok(Stream::Plain(tcp)),
            Some(config) => Arc::clone(config),
        };
        let name = ServerName::try_from(self.host.clone())
            .map_err(|e| Error::Tls(format!("{}: {}", self.host, e)))?;
        let tls = TlsConnector::from(config)
            .connect(name, tcp)
            .await
            .map_err(|err| match err.kind() {
                // Certificate and protocol failures.
                io::ErrorKind::InvalidData => Error::Tls(format!("{}: {}", self.host, err)),
                _ => Error::Io(err),
            })?;
        Ok(Stream::Tls(Box::new(tls)))
    }

    /// Read until the peer is done sending.
    ///
    /// A TLS peer that closes the socket without `close_notify` has still
    /// finished its answer; the bytes received so far are kept.
    async fn read_response(&self, stream: &mut Stream) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let mut buf = vec![0; READ_BUFFER_LEN];
        loop {
            let read = stream.read(&mut buf).await;
            match read {
                Ok(0) => return Ok(bytes),
                Ok(len) => bytes.extend_from_slice(&buf[..len]),
                Err(err)
                    if err.kind() == io::ErrorKind::UnexpectedEof
                        && stream.is_tls()
                        && !bytes.is_empty() =>
                {
                    log::debug!(
                        "{}:{} closed without close_notify: {}",
                        self.host,
                        self.port,
                        err
                    );
                    return Ok(bytes);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl Wire for RawWire {
    async fn send(&self, request: Request) -> Result<Response> {
        let mut stream = self.connect().await?;
        log::trace!("> {} bytes to {}:{}", request.len(), self.host, self.port);
        stream.write_all(request.as_bytes()).await?;
        stream.flush().await?;

        let bytes = self.read_response(&mut stream).await?;
        log::trace!("< {} bytes from {}:{}", bytes.len(), self.host, self.port);
        Ok(Response::from_bytes(bytes))
    }
}

async fn resolve(host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    let host = host.to_owned();
    async_global_executor::spawn_blocking(move || {
        (host.as_str(), port)
            .to_socket_addrs()
            .map(|addrs| addrs.collect::<Vec<_>>())
    })
    .await
}
