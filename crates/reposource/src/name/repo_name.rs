//! Validated canonical repository name.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::RepoNameError;

/// Canonical repository name, e.g. `gitlab.com/beyang/public-repo`.
///
/// Never empty, never carries a URL scheme, embedded credentials or a
/// trailing `.git`. Credentials means a first segment shaped like
/// `user[:secret]@host.tld[:port]`; an `@` elsewhere (`team@corp/repo`,
/// `lib@v2`) is ordinary name text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RepoName(String);

impl RepoName {
    pub fn new(name: impl Into<String>) -> Result<Self, RepoNameError> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    /// Wrap `name` without checking it. For tests and diagnostics only; the
    /// resolver never produces names this way.
    pub fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// `user[:secret]@` followed by a dotted hostname or a bracketed IPv6 literal.
static CREDENTIALED_AUTHORITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[^@:\s]+(?::[^@\s]*)?@",
        r"(?:\[[^\]]+\]|[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+)(?::\d*)?$",
    ))
    .expect("credentialed authority regex")
});

fn validate(name: &str) -> Result<(), RepoNameError> {
    if name.trim().is_empty() {
        return Err(RepoNameError::Empty);
    }
    if name.contains("://") {
        return Err(RepoNameError::ContainsScheme);
    }
    let first_segment = name.split('/').next().unwrap_or_default();
    if CREDENTIALED_AUTHORITY.is_match(first_segment) {
        return Err(RepoNameError::ContainsCredentials);
    }
    if name.ends_with(".git") {
        return Err(RepoNameError::GitSuffix);
    }
    Ok(())
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RepoName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for RepoName {
    type Err = RepoNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RepoName {
    type Error = RepoNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert_eq!(
            "gitlab.com/beyang/public-repo"
                .parse::<RepoName>()
                .unwrap()
                .as_str(),
            "gitlab.com/beyang/public-repo"
        );
        assert!(RepoName::new("foo/bar/baz").is_ok());
        assert!(RepoName::new("gitlab.com/a/repo.github").is_ok());
    }

    #[test]
    fn rejects_invariant_violations() {
        assert_eq!(RepoName::new(""), Err(RepoNameError::Empty));
        assert_eq!(RepoName::new("  "), Err(RepoNameError::Empty));
        assert_eq!(
            RepoName::new("https://gitlab.com/a/b"),
            Err(RepoNameError::ContainsScheme)
        );
        assert_eq!(
            RepoName::new("oauth2:TOKEN@gitlab.com/a/b"),
            Err(RepoNameError::ContainsCredentials)
        );
        assert_eq!(
            RepoName::new("gitlab.com/a/b.git"),
            Err(RepoNameError::GitSuffix)
        );
    }

    #[test]
    fn at_sign_outside_first_segment_is_allowed() {
        assert!(RepoName::new("gitlab.com/team/lib@v2").is_ok());
    }

    #[test]
    fn at_sign_in_first_segment_needs_a_host_to_be_credentials() {
        assert!(RepoName::new("team@corp/repo").is_ok());
        assert!(RepoName::new("lib@v2/repo").is_ok());
        assert!(RepoName::new("@scope/pkg").is_ok());
        for name in [
            "git@gitlab.com/a/b",
            "oauth2:TOKEN@gitlab.com:8443/a/b",
            "user@[::1]/a/b",
        ] {
            assert_eq!(
                RepoName::new(name),
                Err(RepoNameError::ContainsCredentials),
                "{name}"
            );
        }
    }

    #[test]
    fn unchecked_skips_validation() {
        assert_eq!(RepoName::new_unchecked("").as_str(), "");
        assert_eq!(RepoName::new_unchecked("x.git").to_string(), "x.git");
    }
}
