//! Sending requests over a [`Wire`] and following redirects.

use http_types::Url;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::wire::{ClientConfig, HTTPS_PORT};
use crate::{Error, HeadReader, RawWire, Request, Response, Result, RetryWire, TimedWire, Wire};

pub mod decode;
mod encode;

pub use decode::{content_type, cookies, status, Headers};

/// A fixed request bound to the wire it is sent over.
#[derive(Debug, Clone)]
pub struct ResponseReader<W> {
    wire: W,
    request: Request,
}

impl<W: Wire> ResponseReader<W> {
    /// Bind `request` to `wire`.
    pub fn new(wire: W, request: Request) -> Self {
        Self { wire, request }
    }

    /// The request sent by [`ResponseReader::stream`].
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Send the request and return the response.
    pub async fn stream(&self) -> Result<Response> {
        self.wire.send(self.request.clone()).await
    }
}

impl ResponseReader<RawWire> {
    /// A `GET` for `url` over a plain connection to its host.
    pub fn get(url: &Url) -> Result<Self> {
        Ok(Self::new(RawWire::from_url(url)?, Request::get(url)?))
    }
}

/// Connector opening a plain wire for a redirect target.
pub type RawConnector = fn(&Url) -> Result<RawWire>;

/// Follows `3xx` answers with a `Location` header.
///
/// The head of each response is read to find its status; when it is not
/// followed the response is handed back byte for byte, head included.
pub struct AutoRedirect<W, F = RawConnector> {
    response: ResponseReader<W>,
    connect: F,
    max_redirects: usize,
}

impl<W: Wire> AutoRedirect<W> {
    /// Follow redirects of `response` over plain connections.
    pub fn new(response: ResponseReader<W>) -> Self {
        Self::with_connector(response, RawWire::from_url as RawConnector)
    }
}

impl<W, F> AutoRedirect<W, F> {
    /// Follow redirects over the wires built by `connect`.
    pub fn with_connector(response: ResponseReader<W>, connect: F) -> Self {
        Self {
            response,
            connect,
            max_redirects: 1,
        }
    }

    /// How many redirects are followed before the last response is returned
    /// as is. Defaults to 1.
    pub fn max_redirects(mut self, hops: usize) -> Self {
        self.max_redirects = hops;
        self
    }
}

impl<W: Wire, F> AutoRedirect<W, F> {
    /// Send the request, following redirects.
    pub async fn stream<V>(&self) -> Result<Response>
    where
        F: Fn(&Url) -> Result<V>,
        V: Wire,
    {
        let mut response = self.response.stream().await?;
        let mut previous: Option<Url> = None;
        for hop in 0..self.max_redirects {
            let parts = HeadReader::new(response).into_parts().await?;
            let target = match redirect_target(&parts.head, previous.as_ref())? {
                Some(target) => target,
                None => return Ok(Response::from_reader(parts.rejoin())),
            };
            log::debug!("redirect {} to {}", hop + 1, target);
            let wire = (self.connect)(&target)?;
            response = wire.send(Request::get(&target)?).await?;
            previous = Some(target);
        }
        Ok(response)
    }
}

impl<W: fmt::Debug, F> fmt::Debug for AutoRedirect<W, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoRedirect")
            .field("response", &self.response)
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}

/// Where a response head points to, if it is a redirect worth following.
///
/// The first `Location` must be absolute; later ones may be relative to the
/// target they came from.
fn redirect_target(head: &[u8], previous: Option<&Url>) -> Result<Option<Url>> {
    let code = status(head)?;
    if !(300..=308).contains(&code) {
        return Ok(None);
    }
    let headers = Headers::parse(head)?;
    let location = match headers.first("location") {
        Some(location) => location,
        None => {
            log::warn!("{} response without a Location header", code);
            return Ok(None);
        }
    };
    let target = match previous {
        Some(base) => base.join(location)?,
        None => Url::parse(location)?,
    };
    Ok(Some(target))
}

/// Configuration of a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Deadline for a whole exchange, retries included.
    pub timeout: Duration,
    /// Attempts made when the transport fails.
    pub attempts: u32,
    /// Redirects followed per request.
    pub max_redirects: usize,
    /// TLS configuration for `https` URLs. The bundled web PKI roots are
    /// used when unset.
    pub tls: Option<Arc<ClientConfig>>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            attempts: 1,
            max_redirects: 1,
            tls: None,
        }
    }
}

/// A ready-made stack: a timed, retrying wire per host, with redirects
/// followed over the same kind of wire.
#[derive(Debug, Clone, Default)]
pub struct Client {
    options: ClientOptions,
}

impl Client {
    /// Create a client with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with `options`.
    pub fn with_options(options: ClientOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The wire used to reach `url`.
    pub fn wire(&self, url: &Url) -> Result<TimedWire<RetryWire<RawWire>>> {
        let raw = match (&self.options.tls, url.scheme()) {
            (Some(config), "https") => {
                let host = url
                    .host_str()
                    .ok_or_else(|| Error::Url(format!("no host in {}", url)))?;
                let port = url.port().unwrap_or(HTTPS_PORT);
                RawWire::with_tls(host, port, config.clone())
            }
            _ => RawWire::from_url(url)?,
        };
        Ok(TimedWire::new(
            RetryWire::new(raw, self.options.attempts),
            self.options.timeout,
        ))
    }

    /// `GET` the resource at `url`.
    pub async fn get(&self, url: &Url) -> Result<Response> {
        let reader = ResponseReader::new(self.wire(url)?, Request::get(url)?);
        AutoRedirect::with_connector(reader, |target: &Url| self.wire(target))
            .max_redirects(self.options.max_redirects)
            .stream()
            .await
    }
}
