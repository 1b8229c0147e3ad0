//! Clone URL parser.
//!
//! `scheme://` URLs go through the `url` crate; SSH shorthand is matched with a
//! precompiled regex. Parsing is independent of any connection.
//!
//! Both dialects yield the same descriptor for the same repository: hosts are
//! reduced to their ASCII (punycode) lowercase form and paths are taken as
//! written, then percent-decoded.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::{Host, Url};

use super::{CloneUrl, Credentials, UrlForm};
use crate::error::ParseError;

static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("scheme regex"));

/// `[user[:secret]@]host:path`, host may be a bracketed IPv6 literal.
static SSH_SHORTHAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:(?P<user>[^@/:\s]+)(?::(?P<secret>[^@/\s]*))?@)?",
        r"(?P<host>\[[^\]\s]+\]|[^@/:\s\[\]]+):(?P<path>.*)$",
    ))
    .expect("ssh shorthand regex")
});

/// Parse a raw clone URL into a [`CloneUrl`] descriptor.
///
/// Host and path are always populated; credentials only when present. The
/// path keeps dot segments and slashes as written (normalization happens
/// later) but is percent-decoded.
pub fn parse_clone_url(raw: &str) -> Result<CloneUrl, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseError::Empty);
    }
    if SCHEME_PREFIX.is_match(raw) {
        return parse_scheme_url(raw);
    }
    parse_ssh_shorthand(raw).unwrap_or_else(|| {
        Err(ParseError::Unrecognized {
            url: raw.to_string(),
        })
    })
}

/// Canonical matching form of a hostname: IDNA to ASCII, lowercased, IPv6
/// literals bracketed. Hosts the `url` crate refuses are only lowercased.
pub fn canonical_host(host: &str) -> String {
    match Host::parse(host) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => host.to_ascii_lowercase(),
    }
}

fn decode_path(raw_url: &str, path: &str) -> Result<String, ParseError> {
    percent_decode_str(path)
        .decode_utf8()
        .map(|p| p.into_owned())
        .map_err(|_| ParseError::InvalidPathEncoding {
            url: raw_url.to_string(),
        })
}

/// The path of a `scheme://` URL exactly as written: everything after the
/// authority up to any query or fragment. `Url::path` would resolve dot
/// segments and percent-encode non-ASCII text.
fn raw_scheme_path(raw: &str) -> &str {
    let after_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let Some(start) = after_scheme.find(['/', '?', '#']) else {
        return "";
    };
    let rest = &after_scheme[start..];
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

fn parse_scheme_url(raw: &str) -> Result<CloneUrl, ParseError> {
    let url = Url::parse(raw)?;
    let host = match url.host_str() {
        Some(h) if !h.is_empty() => canonical_host(h),
        _ => {
            return Err(ParseError::MissingHost {
                url: raw.to_string(),
            });
        }
    };

    let credentials = if url.username().is_empty() && url.password().is_none() {
        None
    } else {
        Some(Credentials {
            user: url.username().to_string(),
            secret: url.password().map(str::to_string),
        })
    };

    Ok(CloneUrl {
        form: UrlForm::Url {
            scheme: url.scheme().to_string(),
        },
        credentials,
        host,
        port: url.port(),
        path: decode_path(raw, raw_scheme_path(raw))?,
    })
}

fn parse_ssh_shorthand(raw: &str) -> Option<Result<CloneUrl, ParseError>> {
    let caps = SSH_SHORTHAND.captures(raw)?;
    let credentials = caps.name("user").map(|user| Credentials {
        user: user.as_str().to_string(),
        secret: caps.name("secret").map(|s| s.as_str().to_string()),
    });
    let path = match decode_path(raw, &caps["path"]) {
        Ok(path) => path,
        Err(e) => return Some(Err(e)),
    };
    Some(Ok(CloneUrl {
        form: UrlForm::SshShorthand,
        credentials,
        host: canonical_host(&caps["host"]),
        port: None,
        path,
    }))
}
