use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use env_flags::env_flags;
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Layered;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use reposource::config::{UserConfig, expand_home, load_config_file};
use reposource::{Connections, Resolution};

type Filtered = Layered<EnvFilter, Registry>;

#[derive(Parser)]
#[command(name = "reposource")]
#[command(about = "Resolve clone URLs into canonical repository names", long_about = None)]
struct Cli {
    /// Print one JSON object per URL instead of tab-separated text
    #[arg(long)]
    json: bool,

    /// Clone URLs to resolve; read one per line from stdin when none are given
    urls: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum LogStyle {
    Json,
    Compact,
    Pretty,
    Full,
}

fn reposource_home() -> PathBuf {
    env_flags! {
        /// reposource home directory (absolute). Defaults to $HOME/.reposource
        REPOSOURCE_HOME: &str = "";
    }
    if !(*REPOSOURCE_HOME).is_empty() {
        expand_home(*REPOSOURCE_HOME)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".reposource")
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".reposource")
    }
}

fn fmt_layer<W>(
    style: LogStyle,
    writer: W,
    ansi: bool,
) -> Box<dyn Layer<Filtered> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    match style {
        LogStyle::Json => base.json().boxed(),
        LogStyle::Compact => base.compact().boxed(),
        LogStyle::Pretty => base.pretty().boxed(),
        LogStyle::Full => base.boxed(),
    }
}

fn init_tracing(home: &std::path::Path, user_cfg: Option<&UserConfig>) {
    env_flags! {
        /// Tracing filter, e.g. "info", "debug", or targets format.
        RUST_LOG: &str = "warn";
        /// Preferred filter env (alias). If set, overrides RUST_LOG.
        TRACING_FILTER: &str = "";
        /// Pretty formatting for logs (ignored if TRACING_JSON=true).
        TRACING_PRETTY: bool = false;
        /// Compact single-line formatting for logs (ignored if TRACING_JSON=true)
        TRACING_COMPACT: bool = true;
        /// JSON formatting for logs
        TRACING_JSON: bool = false;
        /// If true, also log to file under <REPOSOURCE_HOME>/logs or LOG_DIR
        LOG_TO_FILE: bool = false;
        /// Optional explicit log directory (absolute). Defaults to <REPOSOURCE_HOME>/logs
        LOG_DIR: &str = "";
    }

    use tracing_subscriber::prelude::*;

    let env_set = |k: &str| std::env::var_os(k).is_some();

    let mut rust_log = if !(*TRACING_FILTER).is_empty() {
        (*TRACING_FILTER).to_string()
    } else {
        (*RUST_LOG).to_string()
    };
    let mut tracing_json = *TRACING_JSON;
    let mut tracing_compact = *TRACING_COMPACT;
    let mut tracing_pretty = *TRACING_PRETTY;
    let mut log_to_file = *LOG_TO_FILE;
    let mut log_dir: Option<PathBuf> = if !(*LOG_DIR).is_empty() {
        Some(PathBuf::from((*LOG_DIR).to_string()))
    } else {
        None
    };

    // Config file values apply only where the env var is unset.
    if let Some(cfg) = user_cfg.and_then(|c| c.logging.as_ref()) {
        if !(env_set("TRACING_FILTER") || env_set("RUST_LOG"))
            && let Some(level) = cfg.level.as_ref()
        {
            rust_log = level.clone();
        }
        if !env_set("TRACING_JSON")
            && let Some(v) = cfg.json
        {
            tracing_json = v;
        }
        if !env_set("TRACING_COMPACT")
            && let Some(v) = cfg.compact
        {
            tracing_compact = v;
        }
        if !env_set("TRACING_PRETTY")
            && let Some(v) = cfg.pretty
        {
            tracing_pretty = v;
        }
        if !env_set("LOG_TO_FILE")
            && let Some(v) = cfg.to_file
        {
            log_to_file = v;
        }
        if !env_set("LOG_DIR")
            && let Some(dir) = cfg.dir.as_ref()
        {
            log_dir = Some(expand_home(dir));
        }
    }

    let style = if tracing_json {
        LogStyle::Json
    } else if tracing_compact {
        LogStyle::Compact
    } else if tracing_pretty {
        LogStyle::Pretty
    } else {
        LogStyle::Full
    };

    let filter = EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs always go to stderr; stdout carries resolution output.
    let mut layers = vec![fmt_layer(style, std::io::stderr, true)];

    static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
    let mut file_error = None;
    if log_to_file {
        let dir = log_dir.unwrap_or_else(|| home.join("logs"));
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(&dir, "reposource.log");
                let (nb, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                layers.push(fmt_layer(style, nb, false));
            }
            Err(e) => file_error = Some((dir, e)),
        }
    }

    let subscriber = tracing_subscriber::registry().with(filter).with(layers);
    if let Err(e) = subscriber.try_init() {
        tracing::debug!("tracing already set: {:?}", e);
    }
    if let Some((dir, e)) = file_error {
        tracing::warn!("failed to create log dir {}: {}", dir.display(), e);
    }
}

#[derive(Debug, Serialize)]
struct ResolutionRecord<'a> {
    clone_url: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> ResolutionRecord<'a> {
    fn new(clone_url: &'a str, resolution: &'a Resolution) -> Self {
        match resolution {
            Resolution::Matched(name) => Self {
                clone_url,
                status: "matched",
                name: Some(name.as_str()),
                error: None,
            },
            Resolution::Unmatched => Self {
                clone_url,
                status: "unmatched",
                name: None,
                error: None,
            },
            Resolution::ParseError(e) => Self {
                clone_url,
                status: "parse_error",
                name: None,
                error: Some(e.to_string()),
            },
        }
    }
}

fn print_resolution(clone_url: &str, resolution: &Resolution, json: bool) -> anyhow::Result<()> {
    if json {
        let line = serde_json::to_string(&ResolutionRecord::new(clone_url, resolution))?;
        println!("{line}");
        return Ok(());
    }
    match resolution {
        Resolution::Matched(name) => println!("{clone_url}\t{name}"),
        Resolution::Unmatched => println!("{clone_url}\t(unmatched)"),
        Resolution::ParseError(e) => eprintln!("{clone_url}: {e}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_flags! {
        /// Config file path. Defaults to <REPOSOURCE_HOME>/config.toml
        REPOSOURCE_CONFIG: &str = "";
    }

    let cli = Cli::parse();
    let home = reposource_home();
    let config_path = if !(*REPOSOURCE_CONFIG).is_empty() {
        expand_home(*REPOSOURCE_CONFIG)
    } else {
        home.join(reposource::config::CONFIG_FILE_NAME)
    };

    // Read the config before tracing so [logging] can shape the subscriber;
    // report the failure once tracing is up.
    let user_cfg = load_config_file(&config_path);
    init_tracing(&home, user_cfg.as_ref().ok().and_then(Option::as_ref));

    let user_cfg = user_cfg
        .with_context(|| format!("loading {}", config_path.display()))?
        .unwrap_or_default();
    let connections: Connections = user_cfg
        .connections()
        .with_context(|| format!("invalid connection in {}", config_path.display()))?;
    if connections.is_empty() {
        tracing::warn!(
            "no connections configured in {}; every URL will be unmatched",
            config_path.display()
        );
    }

    let Cli { json, mut urls } = cli;
    if urls.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            if !line.trim().is_empty() {
                urls.push(line.trim().to_string());
            }
        }
    }

    let mut failed = 0usize;
    for url in &urls {
        let resolution = connections.resolve(url);
        if matches!(resolution, Resolution::ParseError(_)) {
            failed += 1;
        }
        print_resolution(url, &resolution, json)?;
    }

    if failed > 0 {
        anyhow::bail!("{} of {} clone URL(s) could not be parsed", failed, urls.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_json_flag_and_urls() {
        let cli = Cli::try_parse_from([
            "reposource",
            "--json",
            "git@gitlab.com:a/b.git",
            "https://gitlab.com/c/d.git",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(
            cli.urls,
            vec!["git@gitlab.com:a/b.git", "https://gitlab.com/c/d.git"]
        );
    }

    #[test]
    fn unknown_flag_is_rejected_not_resolved() {
        let err = Cli::try_parse_from(["reposource", "--jsn", "git@gitlab.com:a/b.git"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn no_urls_means_stdin() {
        let cli = Cli::try_parse_from(["reposource"]).unwrap();
        assert!(!cli.json);
        assert!(cli.urls.is_empty());
    }
}
