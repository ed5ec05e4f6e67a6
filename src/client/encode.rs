//! Formatting of the requests the client sends on its own.

use http_types::Url;

use std::time::Duration;

use crate::{Error, Request, Result};

/// The request line and `Host` header for a `GET` of `url`.
fn start(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::Url(format!("no host in {}", url)))?;

    let mut target = url.path().to_owned();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    let host = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_owned(),
    };
    Ok(format!("GET {} HTTP/1.1\r\nHost: {}\r\n", target, host))
}

impl Request {
    /// A `GET` for `url` that asks the server to close the connection after
    /// answering, so the response ends with the stream.
    pub fn get(url: &Url) -> Result<Self> {
        let mut buf = start(url)?;
        buf.push_str("Connection: close\r\n\r\n");
        log::trace!("> {}", buf.lines().next().unwrap_or_default());
        Ok(Self::from(buf))
    }

    /// A `GET` for `url` asking the server to keep the connection open for
    /// `timeout` and up to `max_requests` requests.
    pub fn keep_alive(url: &Url, timeout: Duration, max_requests: u32) -> Result<Self> {
        let mut buf = start(url)?;
        buf.push_str(&format!(
            "Connection: keep-alive\r\nKeep-Alive: timeout={}, max={}\r\n\r\n",
            timeout.as_secs(),
            max_requests
        ));
        Ok(Self::from(buf))
    }
}
