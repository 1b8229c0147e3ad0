//! Error types for reposource.
//!
//! Resolution-time failures (`ParseError`) travel inside
//! [`Resolution`](crate::Resolution) values; configuration failures
//! (`ConfigError`) are returned from the load boundary and prevent a
//! connection from being built.

use std::path::PathBuf;

use thiserror::Error;

use crate::retention::{BoxError, SeriesId};

/// Why a clone URL could not be turned into a repository name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("clone URL is empty")]
    Empty,

    #[error("unrecognized clone URL {url:?}: expected scheme://host/path or [user@]host:path")]
    Unrecognized { url: String },

    #[error("invalid clone URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("clone URL has no host: {url}")]
    MissingHost { url: String },

    #[error("clone URL path is not valid percent-encoded UTF-8: {url}")]
    InvalidPathEncoding { url: String },

    #[error("clone URL has no repository path: {url}")]
    MissingPath { url: String },

    #[error("resolved name {candidate:?} is not a valid repository name: {source}")]
    InvalidName {
        candidate: String,
        #[source]
        source: RepoNameError,
    },
}

/// Violations of the [`RepoName`](crate::RepoName) invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoNameError {
    #[error("repository name cannot be empty")]
    Empty,

    #[error("repository name cannot contain a URL scheme")]
    ContainsScheme,

    #[error("repository name cannot contain credentials")]
    ContainsCredentials,

    #[error("repository name cannot end with .git")]
    GitSuffix,
}

/// Errors raised while loading or compiling connection configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid connection host {host:?}")]
    InvalidHost { host: String },

    #[error("path pattern cannot be empty")]
    EmptyPathPattern,

    #[error("name transformation #{index} has an invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("connection #{index} ({host}): {source}")]
    Connection {
        index: usize,
        host: String,
        #[source]
        source: Box<ConfigError>,
    },
}

/// Failure of a whole retention enqueue run.
#[derive(Error, Debug)]
pub enum EnqueueError {
    #[error("unable to fetch series for retention: {0}")]
    FetchSeries(#[source] BoxError),

    #[error(transparent)]
    Jobs(#[from] AggregatedJobError),
}

/// One series whose retention job could not be enqueued.
#[derive(Error, Debug)]
#[error("seriesID: {series_id}: {source}")]
pub struct JobFailure {
    pub series_id: SeriesId,
    #[source]
    pub source: BoxError,
}

/// Every per-series failure of one run. Series that failed did not prevent
/// the others from being enqueued.
#[derive(Debug)]
pub struct AggregatedJobError {
    pub attempted: usize,
    pub failures: Vec<JobFailure>,
}

impl std::fmt::Display for AggregatedJobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} retention job(s) failed to enqueue",
            self.failures.len(),
            self.attempted
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { "; " })?;
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedJobError {}
