use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_NAME: &str = "app.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unsupported log format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    pub log_dir: String,
    pub format: LogFormat,
    pub verbose: bool,
    /// Explicit filter directive; `RUST_LOG` still wins when set.
    pub filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            format: LogFormat::Text,
            verbose: false,
            filter: None,
        }
    }
}

impl LoggerConfig {
    pub fn log_path(&self) -> PathBuf {
        Path::new(&self.log_dir).join(LOG_FILE_NAME)
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = match (&self.filter, self.verbose) {
            (Some(directive), _) => directive.clone(),
            (None, true) => "cep_fleet=debug,info".to_string(),
            (None, false) => "cep_fleet=info".to_string(),
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Installs the process-wide subscriber: a timestamped line log appended to
/// `{log_dir}/app.log`, plus compact stderr output when verbose.
///
/// Call once at start-up. Library code only emits `tracing` events, so tests
/// run without any subscriber installed.
pub fn init_cli_logger(config: &LoggerConfig) -> std::io::Result<PathBuf> {
    fs::create_dir_all(&config.log_dir)?;
    let path = config.log_path();
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);
    let file_layer = match config.format {
        LogFormat::Text => file_layer.boxed(),
        LogFormat::Json => file_layer.json().boxed(),
    };

    let stderr_layer = config.verbose.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(path)
}
