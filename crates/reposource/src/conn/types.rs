use serde::{Deserialize, Serialize};

use super::ConfiguredHost;
use crate::error::ConfigError;
use crate::name::{PathPattern, RewriteChain};

/// Connection record as it appears in configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RawConnection {
    /// Host or base URL of the code host, e.g. `https://gitlab.com`.
    #[serde(alias = "url")]
    pub host: String,
    #[serde(
        default,
        alias = "repository_path_pattern",
        alias = "repositoryPathPattern"
    )]
    pub path_pattern: Option<String>,
    #[serde(default, alias = "nameTransformations")]
    pub name_transformations: Vec<RawNameTransformation>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RawNameTransformation {
    pub regex: String,
    #[serde(default)]
    pub replacement: String,
}

/// A compiled, immutable connection. Regexes are compiled exactly once, when
/// this value is built; resolution only runs matches against them.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    host: ConfiguredHost,
    path_pattern: Option<PathPattern>,
    name_transformations: RewriteChain,
}

impl ConnectionConfig {
    pub fn new<I, P, R>(
        host: &str,
        path_pattern: Option<&str>,
        name_transformations: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let host = ConfiguredHost::parse(host)?;
        let path_pattern = path_pattern.map(PathPattern::new).transpose()?;
        let name_transformations = RewriteChain::compile(name_transformations)?;
        tracing::debug!(
            host = host.authority(),
            pattern = path_pattern.as_ref().map(PathPattern::as_str),
            rules = name_transformations.len(),
            "connection configured"
        );
        Ok(Self {
            host,
            path_pattern,
            name_transformations,
        })
    }

    pub fn host(&self) -> &ConfiguredHost {
        &self.host
    }

    pub fn path_pattern(&self) -> Option<&PathPattern> {
        self.path_pattern.as_ref()
    }

    pub fn name_transformations(&self) -> &RewriteChain {
        &self.name_transformations
    }
}

impl TryFrom<RawConnection> for ConnectionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConnection) -> Result<Self, Self::Error> {
        Self::new(
            &raw.host,
            raw.path_pattern.as_deref(),
            raw.name_transformations
                .into_iter()
                .map(|t| (t.regex, t.replacement)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_raw() {
        let raw = RawConnection {
            host: "https://gitlab.com".into(),
            path_pattern: None,
            name_transformations: vec![RawNameTransformation {
                regex: r"\.d/".into(),
                replacement: "/".into(),
            }],
        };
        let conn = ConnectionConfig::try_from(raw).unwrap();
        assert_eq!(conn.host().authority(), "gitlab.com");
        assert!(conn.path_pattern().is_none());
        assert_eq!(conn.name_transformations().rules()[0].pattern(), r"\.d/");
        assert_eq!(conn.name_transformations().rules()[0].replacement(), "/");
    }

    #[test]
    fn bad_regex_prevents_construction() {
        let err = ConnectionConfig::new("gitlab.com", None, [("[", "")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegex { index: 0, .. }));
    }

    #[test]
    fn bad_pattern_prevents_construction() {
        let err = ConnectionConfig::new("gitlab.com", Some(""), Vec::<(&str, &str)>::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPathPattern));
    }

    #[test]
    fn shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConnectionConfig>();
    }
}
