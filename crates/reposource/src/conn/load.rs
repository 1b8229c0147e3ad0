use std::path::Path;

use serde::Deserialize;

use super::{ConnectionConfig, RawConnection};
use crate::error::ConfigError;

/// An ordered set of compiled connections, probed in configured order.
#[derive(Debug, Clone, Default)]
pub struct Connections {
    items: Vec<ConnectionConfig>,
}

#[derive(Debug, Deserialize)]
struct RawConnectionsFile {
    #[serde(default)]
    connections: Vec<RawConnection>,
}

impl Connections {
    /// Compile every record; the first invalid one aborts the whole set.
    pub fn from_raw(raw: Vec<RawConnection>) -> Result<Self, ConfigError> {
        let mut items = Vec::with_capacity(raw.len());
        for (index, conn) in raw.into_iter().enumerate() {
            let host = conn.host.clone();
            let compiled =
                ConnectionConfig::try_from(conn).map_err(|source| ConfigError::Connection {
                    index,
                    host,
                    source: Box::new(source),
                })?;
            items.push(compiled);
        }
        tracing::debug!("loaded {} connection(s)", items.len());
        Ok(Self { items })
    }

    /// Parse a TOML document with `[[connections]]` tables.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawConnectionsFile = toml::from_str(s)?;
        Self::from_raw(raw.connections)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionConfig> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<ConnectionConfig>> for Connections {
    fn from(items: Vec<ConnectionConfig>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const TOML: &str = r#"
[[connections]]
url = "https://gitlab.com"

[[connections.name_transformations]]
regex = '\.d/'
replacement = "/"

[[connections.name_transformations]]
regex = "-git$"
replacement = ""

[[connections]]
host = "https://gitlab.mycompany.com"
repository_path_pattern = "{pathWithNamespace}"
"#;

    #[test]
    fn parse_connections() {
        let conns = Connections::from_toml_str(TOML).expect("parse ok");
        assert_eq!(conns.len(), 2);
        let first = conns.iter().next().unwrap();
        assert_eq!(first.host().authority(), "gitlab.com");
        assert_eq!(first.name_transformations().len(), 2);
        let second = conns.iter().nth(1).unwrap();
        assert_eq!(
            second.path_pattern().map(|p| p.as_str()),
            Some("{pathWithNamespace}")
        );
    }

    #[test]
    fn empty_document_has_no_connections() {
        assert!(Connections::from_toml_str("").unwrap().is_empty());
    }

    #[test]
    fn invalid_rule_names_its_connection() {
        let toml = r#"
[[connections]]
url = "https://ok.example.com"

[[connections]]
url = "https://gitlab.com"
[[connections.name_transformations]]
regex = "("
"#;
        let err = Connections::from_toml_str(toml).unwrap_err();
        match err {
            ConfigError::Connection {
                index,
                host,
                source,
            } => {
                assert_eq!(index, 1);
                assert_eq!(host, "https://gitlab.com");
                assert!(matches!(*source, ConfigError::InvalidRegex { index: 0, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TOML.as_bytes()).unwrap();
        let conns = Connections::load_from_file(file.path()).unwrap();
        assert_eq!(conns.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Connections::load_from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
