//! Configured connection host and the host matcher.

use crate::cloneurl::{CloneUrl, canonical_host};
use crate::error::ConfigError;

/// A connection's host as configured, with scheme, userinfo and path removed.
///
/// `authority` keeps the configured casing and port and is the prefix of
/// default repository names; `hostname` is the host as configured and
/// `match_key` its canonical ASCII form, compared against parsed URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredHost {
    authority: String,
    hostname: String,
    match_key: String,
}

impl ConfiguredHost {
    /// Accepts `gitlab.com`, `https://gitlab.com/`, `gitlab.com:8443`, ...
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidHost {
            host: raw.to_string(),
        };

        let trimmed = raw.trim();
        let rest = match trimmed.split_once("://") {
            Some((_, rest)) => rest,
            None => trimmed,
        };
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let authority = match authority.rsplit_once('@') {
            Some((_, host)) => host,
            None => authority,
        };
        if authority.is_empty() || authority.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let hostname = strip_port(authority);
        if hostname.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            authority: authority.to_string(),
            hostname: hostname.to_string(),
            match_key: canonical_host(hostname),
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Whether `url` points at this host, ignoring case, scheme,
    /// credentials and port. Internationalized names match their punycode
    /// spelling.
    pub fn matches(&self, url: &CloneUrl) -> bool {
        self.match_key == url.host
    }
}

fn strip_port(authority: &str) -> &str {
    if authority.starts_with('[') {
        // IPv6 literal; keep the brackets, which is what the url crate reports.
        return match authority.find(']') {
            Some(end) => &authority[..=end],
            None => authority,
        };
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloneurl::parse_clone_url;

    #[test]
    fn strips_scheme_path_and_port() {
        let h = ConfiguredHost::parse("https://GitLab.com/").unwrap();
        assert_eq!(h.authority(), "GitLab.com");
        assert_eq!(h.hostname(), "GitLab.com");

        let h = ConfiguredHost::parse("https://gitlab.example.com:8443").unwrap();
        assert_eq!(h.authority(), "gitlab.example.com:8443");
        assert_eq!(h.hostname(), "gitlab.example.com");

        let h = ConfiguredHost::parse("gitlab.com").unwrap();
        assert_eq!(h.authority(), "gitlab.com");
    }

    #[test]
    fn ipv6_literal() {
        let h = ConfiguredHost::parse("http://[::1]:8080").unwrap();
        assert_eq!(h.hostname(), "[::1]");
        assert_eq!(h.authority(), "[::1]:8080");
    }

    #[test]
    fn rejects_empty() {
        assert!(ConfiguredHost::parse("").is_err());
        assert!(ConfiguredHost::parse("https://").is_err());
        assert!(ConfiguredHost::parse("git lab.com").is_err());
    }

    #[test]
    fn matches_case_insensitively_across_dialects() {
        let h = ConfiguredHost::parse("https://GITLAB.com").unwrap();
        for u in [
            "git@gitlab.com:a/b.git",
            "https://gitlab.com/a/b.git",
            "https://oauth2:t@gitlab.com/a/b.git",
            "ssh://git@gitlab.com:2222/a/b.git",
        ] {
            assert!(h.matches(&parse_clone_url(u).unwrap()), "{u}");
        }
        assert!(!h.matches(&parse_clone_url("https://asdf.com/a/b.git").unwrap()));
        assert!(!h.matches(&parse_clone_url("git@gitlab.com.evil.io:a/b.git").unwrap()));
    }

    #[test]
    fn internationalized_host_matches_every_dialect() {
        for configured in ["https://bücher.example", "xn--bcher-kva.example"] {
            let h = ConfiguredHost::parse(configured).unwrap();
            for u in [
                "git@bücher.example:a/b.git",
                "https://bücher.example/a/b.git",
                "https://xn--bcher-kva.example/a/b.git",
                "ssh://git@bücher.example:2222/a/b.git",
            ] {
                assert!(h.matches(&parse_clone_url(u).unwrap()), "{configured} vs {u}");
            }
        }
        let h = ConfiguredHost::parse("https://bücher.example").unwrap();
        assert_eq!(h.hostname(), "bücher.example");
        assert_eq!(h.authority(), "bücher.example");
    }

    #[test]
    fn ipv6_literal_matches() {
        let h = ConfiguredHost::parse("http://[::1]:8080").unwrap();
        assert!(h.matches(&parse_clone_url("http://[::1]:8080/a/b.git").unwrap()));
    }
}
