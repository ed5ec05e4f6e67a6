use std::fmt;
use std::time::{Duration, Instant};

use async_dup::Mutex;

use super::Wire;
use crate::{Request, Response, Result};

/// A connection reuse budget: how long and for how many requests.
///
/// Windows are values. [`KeepAliveWindow::admit`] returns the window the
/// next request belongs to, which is either this one with one more request
/// or a fresh window once this one's request budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAliveWindow {
    timeout: Duration,
    max_requests: u32,
    created: Instant,
    count: u32,
    generation: u64,
}

impl KeepAliveWindow {
    /// Open a window lasting `timeout` and holding up to `max_requests`.
    pub fn new(timeout: Duration, max_requests: u32) -> Self {
        Self::opened_at(Instant::now(), timeout, max_requests)
    }

    fn opened_at(created: Instant, timeout: Duration, max_requests: u32) -> Self {
        Self {
            timeout,
            max_requests,
            created,
            count: 0,
            generation: 1,
        }
    }

    /// The window a request arriving at `now` is sent in.
    ///
    /// While the window is still young and already carries `max_requests`
    /// requests, a fresh window is opened for the new one.
    pub fn admit(self, now: Instant) -> Self {
        let young = now.saturating_duration_since(self.created) < self.timeout;
        if young && self.count >= self.max_requests {
            Self {
                created: now,
                count: 1,
                generation: self.generation + 1,
                ..self
            }
        } else {
            Self {
                count: self.count + 1,
                ..self
            }
        }
    }

    /// Requests sent in this window so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Number of windows opened so far, this one included.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// When the window was opened.
    pub fn created(&self) -> Instant {
        self.created
    }
}

/// Counts requests against a [`KeepAliveWindow`] before passing them on.
///
/// Meant for one caller at a time. The window sits behind a mutex only
/// because [`Wire::send`] takes `&self` and wires must be `Sync`; the lock
/// is held while admitting a request, never across the send, and gives no
/// ordering guarantee between concurrent callers.
pub struct KeepAliveWire<W> {
    origin: W,
    window: Mutex<KeepAliveWindow>,
}

impl<W: fmt::Debug> fmt::Debug for KeepAliveWire<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeepAliveWire")
            .field("origin", &self.origin)
            .field("window", &*self.window.lock())
            .finish()
    }
}

impl<W: Wire> KeepAliveWire<W> {
    /// Wrap `origin` with a window of `timeout` and `max_requests`.
    pub fn new(origin: W, timeout: Duration, max_requests: u32) -> Self {
        Self {
            origin,
            window: Mutex::new(KeepAliveWindow::new(timeout, max_requests)),
        }
    }

    /// The window the last request was sent in.
    pub fn window(&self) -> KeepAliveWindow {
        *self.window.lock()
    }
}

impl<W: Wire> Wire for KeepAliveWire<W> {
    async fn send(&self, request: Request) -> Result<Response> {
        let (previous, window) = {
            let mut current = self.window.lock();
            let previous = *current;
            *current = previous.admit(Instant::now());
            (previous, *current)
        };
        if window.generation() != previous.generation() {
            log::debug!(
                "keep-alive window {} spent after {} requests, opening window {}",
                previous.generation(),
                previous.count(),
                window.generation()
            );
        }
        self.origin.send(request).await
    }
}
