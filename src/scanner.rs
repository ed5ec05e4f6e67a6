//! Finds a fixed byte pattern across a sequence of buffers.
//!
//! A [`Scanner`] is a small immutable value: feeding it a buffer returns the
//! next state, so it can be handed from one read to the next without any
//! shared bookkeeping.

use std::fmt;

use crate::BOUNDARY;

/// Finite-state matcher for a fixed pattern spread over successive buffers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Scanner {
    pattern: &'static [u8],
    /// Length of the pattern prefix matched so far.
    progress: usize,
    /// Start of the match, relative to the last processed buffer. Only
    /// meaningful once `progress == pattern.len()`.
    index: isize,
}

impl Scanner {
    /// Create a scanner looking for `pattern`.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is empty.
    pub fn new(pattern: &'static [u8]) -> Self {
        assert!(!pattern.is_empty(), "cannot scan for an empty pattern");
        Self {
            pattern,
            progress: 0,
            index: 0,
        }
    }

    /// Create a scanner looking for the head/body boundary, `\r\n\r\n`.
    pub fn boundary() -> Self {
        Self::new(BOUNDARY)
    }

    /// Feed `buf` through the automaton and return the resulting state.
    ///
    /// Scanning stops at the byte completing the pattern; a scanner that has
    /// already found its pattern comes back unchanged.
    pub fn process(self, buf: &[u8]) -> Self {
        if self.found() {
            return self;
        }
        let mut next = self;
        for (pos, &byte) in buf.iter().enumerate() {
            next.progress = next.advance(byte);
            if next.found() {
                next.index = pos as isize + 1 - self.pattern.len() as isize;
                break;
            }
        }
        next
    }

    /// Whether at least a prefix of the pattern is currently held.
    pub fn finding(&self) -> bool {
        self.progress > 0
    }

    /// Whether the whole pattern has been matched.
    pub fn found(&self) -> bool {
        self.progress == self.pattern.len()
    }

    /// Number of pattern bytes matched so far.
    pub fn progress(&self) -> usize {
        self.progress
    }

    /// The pattern this scanner looks for.
    pub fn pattern(&self) -> &'static [u8] {
        self.pattern
    }

    /// Where the match starts.
    ///
    /// A non-negative value is an offset into the last processed buffer. A
    /// negative value `i` means the match started `-i` bytes before the end
    /// of the bytes processed earlier.
    ///
    /// # Panics
    ///
    /// Panics if the pattern has not been found yet.
    pub fn index(&self) -> isize {
        assert!(self.found(), "scanner should be in terminal state");
        self.index
    }

    /// Progress after consuming `byte`.
    ///
    /// On a mismatch the scanner falls back to the longest proper border of
    /// the matched prefix and tries again, so self-overlapping patterns are
    /// handled as well.
    fn advance(&self, byte: u8) -> usize {
        let mut progress = self.progress;
        loop {
            if self.pattern[progress] == byte {
                return progress + 1;
            }
            if progress == 0 {
                return 0;
            }
            progress = border(&self.pattern[..progress]);
        }
    }
}

/// Length of the longest proper prefix of `prefix` that is also its suffix.
fn border(prefix: &[u8]) -> usize {
    (1..prefix.len())
        .rev()
        .find(|&len| prefix[..len] == prefix[prefix.len() - len..])
        .unwrap_or(0)
}

impl Default for Scanner {
    fn default() -> Self {
        Self::boundary()
    }
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("progress", &self.progress)
            .field("found", &self.found())
            .field("index", &self.index)
            .finish()
    }
}
