//! Reading the status, headers and cookies out of a response head.

use std::collections::HashMap;

use crate::{Error, Result, BOUNDARY};

/// Content type assumed when a response does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// The first line of `head`, without its line ending.
fn status_line(head: &[u8]) -> &[u8] {
    let line = match head.iter().position(|&byte| byte == b'\n') {
        Some(end) => &head[..end],
        None => head,
    };
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// The numeric status code on the first line of `head`.
///
/// Only the status line is parsed; header lines are never looked at.
pub fn status(head: &[u8]) -> Result<u16> {
    let mut buf = status_line(head).to_vec();
    buf.extend_from_slice(BOUNDARY);
    let mut httparse_res = httparse::Response::new(&mut []);
    httparse_res.parse(&buf)?;
    httparse_res
        .code
        .ok_or_else(|| Error::Format("no status code found".to_owned()))
}

/// Headers of a response, by lower-cased name.
///
/// Values of a name repeated on several lines are kept in the order they
/// appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    map: HashMap<String, Vec<String>>,
}

impl Headers {
    /// Parse the header lines of `head`. The status line is skipped; an
    /// empty head has no headers.
    pub fn parse(head: &[u8]) -> Result<Self> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        if head.is_empty() {
            return Ok(Self { map });
        }

        // Every line after the status line is `name: value`, split on the
        // first colon. Names are not checked against the token grammar.
        for line in head.split(|&byte| byte == b'\n').skip(1) {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            let line = std::str::from_utf8(line)
                .map_err(|e| Error::Format(format!("header line: {}", e)))?;
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| Error::Format(format!("header line without a colon: {:?}", line)))?;
            map.entry(name.trim().to_ascii_lowercase())
                .or_default()
                .push(value.trim().to_owned());
        }
        Ok(Self { map })
    }

    /// All values of the header `name`, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.map
            .get(&name.to_ascii_lowercase())
            .map(|values| values.as_slice())
    }

    /// The first value of the header `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(|value| value.as_str())
    }

    /// Whether the header `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether there are no headers at all.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over names and their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// Cookie directives from every `Set-Cookie` header, grouped by name.
///
/// Each header value is split on `;`. A directive must be `name=value`;
/// the `Secure` and `HttpOnly` flags are accepted with an empty value.
pub fn cookies(headers: &Headers) -> Result<HashMap<String, Vec<String>>> {
    let mut cookies: HashMap<String, Vec<String>> = HashMap::new();
    for line in headers.get("set-cookie").unwrap_or_default() {
        for directive in line.split(';').map(str::trim).filter(|d| !d.is_empty()) {
            let (name, value) = match directive.split('=').collect::<Vec<_>>()[..] {
                [name, value] => (name, value),
                [flag] if is_flag(flag) => (flag, ""),
                _ => {
                    return Err(Error::Format(format!(
                        "incorrect cookie directive {:?}",
                        directive
                    )))
                }
            };
            cookies
                .entry(name.to_owned())
                .or_default()
                .push(value.to_owned());
        }
    }
    Ok(cookies)
}

fn is_flag(directive: &str) -> bool {
    directive.eq_ignore_ascii_case("secure") || directive.eq_ignore_ascii_case("httponly")
}

/// The `Content-Type` values, or [`DEFAULT_CONTENT_TYPE`] when there are none.
pub fn content_type(headers: &Headers) -> Vec<String> {
    match headers.get("content-type") {
        Some(values) => values.to_vec(),
        None => vec![DEFAULT_CONTENT_TYPE.to_owned()],
    }
}
