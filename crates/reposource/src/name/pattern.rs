//! Repository path pattern templating.

use crate::error::ConfigError;

/// Placeholder replaced by the normalized `namespace/repo` path.
pub const PATH_WITH_NAMESPACE: &str = "{pathWithNamespace}";

/// A configured repository path pattern such as `"{pathWithNamespace}"` or
/// `"git.corp/{pathWithNamespace}"`. Unknown `{...}` text is left as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern(String);

impl PathPattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(ConfigError::EmptyPathPattern);
        }
        if !pattern.contains(PATH_WITH_NAMESPACE) {
            tracing::warn!(
                "path pattern {:?} has no {} placeholder; every repository will share one name",
                pattern,
                PATH_WITH_NAMESPACE
            );
        }
        Ok(Self(pattern))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, path_with_namespace: &str) -> String {
        self.0.replace(PATH_WITH_NAMESPACE, path_with_namespace)
    }
}
