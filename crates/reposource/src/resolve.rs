//! Clone URL → canonical repository name resolution.
//!
//! The pipeline is: parse the URL, match its host against the connection,
//! normalize the path, build a candidate name (host-prefixed or from the path
//! pattern), run the rewrite chain, then validate the result as a
//! [`RepoName`].

use crate::cloneurl::{CloneUrl, parse_clone_url};
use crate::conn::{ConnectionConfig, Connections};
use crate::error::ParseError;
use crate::name::{RepoName, normalize_path};

/// Outcome of resolving one clone URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(RepoName),
    /// The URL is well formed but belongs to another host.
    Unmatched,
    ParseError(ParseError),
}

impl Resolution {
    pub fn matched(&self) -> Option<&RepoName> {
        match self {
            Resolution::Matched(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, Resolution::Unmatched)
    }

    /// `Ok(Some(name))`, `Ok(None)` when unmatched, `Err` on parse failure.
    pub fn into_result(self) -> Result<Option<RepoName>, ParseError> {
        match self {
            Resolution::Matched(name) => Ok(Some(name)),
            Resolution::Unmatched => Ok(None),
            Resolution::ParseError(e) => Err(e),
        }
    }
}

impl From<Result<Option<RepoName>, ParseError>> for Resolution {
    fn from(value: Result<Option<RepoName>, ParseError>) -> Self {
        match value {
            Ok(Some(name)) => Resolution::Matched(name),
            Ok(None) => Resolution::Unmatched,
            Err(e) => Resolution::ParseError(e),
        }
    }
}

/// Resolve `clone_url` against a single connection.
pub fn resolve(clone_url: &str, config: &ConnectionConfig) -> Resolution {
    parse_clone_url(clone_url)
        .and_then(|url| resolve_parsed(&url, config))
        .into()
}

fn resolve_parsed(
    url: &CloneUrl,
    config: &ConnectionConfig,
) -> Result<Option<RepoName>, ParseError> {
    if !config.host().matches(url) {
        tracing::trace!(url = %url, host = config.host().hostname(), "host mismatch");
        return Ok(None);
    }

    let path = normalize_path(&url.path).ok_or_else(|| ParseError::MissingPath {
        url: url.to_string(),
    })?;
    let candidate = match config.path_pattern() {
        Some(pattern) => pattern.render(&path),
        None => format!("{}/{}", config.host().authority(), path),
    };
    let candidate = config.name_transformations().apply(candidate);

    let name = RepoName::new(candidate.clone())
        .map_err(|source| ParseError::InvalidName { candidate, source })?;
    tracing::debug!(url = %url, name = %name, "resolved clone URL");
    Ok(Some(name))
}

impl ConnectionConfig {
    pub fn resolve(&self, clone_url: &str) -> Resolution {
        resolve(clone_url, self)
    }
}

impl Connections {
    /// Probe connections in order. The URL is parsed once, up front, so a
    /// parse failure is reported even when no connection is configured. The
    /// first connection whose host matches decides the result.
    pub fn resolve(&self, clone_url: &str) -> Resolution {
        let url = match parse_clone_url(clone_url) {
            Ok(url) => url,
            Err(e) => return Resolution::ParseError(e),
        };
        for conn in self.iter() {
            match resolve_parsed(&url, conn) {
                Ok(None) => continue,
                other => return other.into(),
            }
        }
        Resolution::Unmatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_rules() -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    fn gitlab() -> ConnectionConfig {
        ConnectionConfig::new("https://gitlab.com", None, [(r"\.d/", "/"), ("-git$", "")])
            .unwrap()
    }

    #[test]
    fn default_name_is_host_prefixed() {
        assert_eq!(
            resolve("git@gitlab.com:beyang/public-repo.git", &gitlab()),
            Resolution::Matched(RepoName::new_unchecked("gitlab.com/beyang/public-repo"))
        );
    }

    #[test]
    fn configured_authority_is_authoritative() {
        let conn = ConnectionConfig::new("https://GitLab.Example.com:8443", None, no_rules())
            .unwrap();
        let name = resolve("https://gitlab.example.com:8443/a/b.git", &conn);
        assert_eq!(
            name.matched().unwrap().as_str(),
            "GitLab.Example.com:8443/a/b"
        );
    }

    #[test]
    fn mismatch_is_unmatched() {
        let r = resolve("https://asdf.com/beyang/public-repo.git", &gitlab());
        assert!(r.is_unmatched());
        assert_eq!(r.into_result(), Ok(None));
    }

    #[test]
    fn unparseable_is_parse_error() {
        assert!(matches!(
            resolve("gitlab.com/beyang/repo", &gitlab()),
            Resolution::ParseError(ParseError::Unrecognized { .. })
        ));
    }

    #[test]
    fn empty_path_is_parse_error() {
        assert!(matches!(
            resolve("https://gitlab.com/", &gitlab()),
            Resolution::ParseError(ParseError::MissingPath { .. })
        ));
    }

    #[test]
    fn rule_producing_invalid_name_is_parse_error() {
        let conn = ConnectionConfig::new("gitlab.com", None, [(".*", "")]).unwrap();
        assert!(matches!(
            resolve("git@gitlab.com:a/b.git", &conn),
            Resolution::ParseError(ParseError::InvalidName { .. })
        ));
    }

    #[test]
    fn connections_probe_in_order() {
        let conns = Connections::from(vec![
            ConnectionConfig::new("github.com", None, no_rules()).unwrap(),
            gitlab(),
            ConnectionConfig::new("gitlab.com", Some("dup/{pathWithNamespace}"), no_rules())
                .unwrap(),
        ]);
        assert_eq!(
            conns.resolve("git@gitlab.com:/beyang.d/public-repo-git.git"),
            Resolution::Matched(RepoName::new_unchecked("gitlab.com/beyang/public-repo"))
        );
        assert!(conns.resolve("https://bitbucket.org/a/b.git").is_unmatched());
    }

    #[test]
    fn parse_error_is_reported_before_any_connection_is_probed() {
        let conns = Connections::from(vec![
            ConnectionConfig::new("github.com", None, no_rules()).unwrap(),
            gitlab(),
        ]);
        assert!(matches!(
            conns.resolve("https://gitlab.com/%FF/repo.git"),
            Resolution::ParseError(ParseError::InvalidPathEncoding { .. })
        ));
        assert!(matches!(
            conns.resolve("gitlab.com/no/separator"),
            Resolution::ParseError(ParseError::Unrecognized { .. })
        ));
        assert_eq!(
            conns.resolve("https://GITLAB.com/a.d/b.git"),
            Resolution::Matched(RepoName::new_unchecked("gitlab.com/a/b"))
        );
    }

    #[test]
    fn empty_connection_set_still_reports_parse_errors() {
        let conns = Connections::default();
        assert!(conns.resolve("https://gitlab.com/a/b").is_unmatched());
        assert!(matches!(
            conns.resolve(""),
            Resolution::ParseError(ParseError::Empty)
        ));
    }
}
