use std::sync::Arc;

use futures_rustls::rustls::crypto::ring;
use futures_rustls::rustls::RootCertStore;
use http_types::Url;

use super::{ClientConfig, RawWire, Wire, HTTPS_PORT};
use crate::{Error, Request, Response, Result};

/// A [`RawWire`] whose sockets speak TLS.
#[derive(Debug, Clone)]
pub struct SecureWire {
    raw: RawWire,
}

impl SecureWire {
    /// Create a TLS wire to `host` on port 443, trusting the webpki root
    /// certificates.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        Self::with_port(host, HTTPS_PORT)
    }

    /// Create a TLS wire to `host:port`, trusting the webpki root certificates.
    pub fn with_port(host: impl Into<String>, port: u16) -> Result<Self> {
        Ok(Self::with_config(host, port, default_config()?))
    }

    /// Create a TLS wire to the server `url` points at, on port 443 unless
    /// the URL says otherwise.
    pub fn from_url(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::Url(format!("{} has no host", url)))?;
        Self::with_port(host, url.port().unwrap_or(HTTPS_PORT))
    }

    /// Create a TLS wire to `host:port` with a custom client configuration.
    pub fn with_config(host: impl Into<String>, port: u16, config: Arc<ClientConfig>) -> Self {
        Self {
            raw: RawWire::with_tls(host, port, config),
        }
    }

    /// The host this wire connects to.
    pub fn host(&self) -> &str {
        self.raw.host()
    }

    /// The TCP port this wire connects to.
    pub fn port(&self) -> u16 {
        self.raw.port()
    }
}

impl Wire for SecureWire {
    async fn send(&self, request: Request) -> Result<Response> {
        self.raw.send(request).await
    }
}

/// Client configuration trusting the bundled webpki root certificates.
pub(crate) fn default_config() -> Result<Arc<ClientConfig>> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(Arc::new(config))
}
