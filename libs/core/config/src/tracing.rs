use crate::{env_or_default, ConfigError, Environment, FromEnv};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in the main() before any fallible operations to ensure
/// colored error output. Safe to call multiple times.
///
/// Configuration:
/// - Shows file:line where errors occur
/// - Hides environment variables (less noise)
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Optional file sink for logs.
///
/// When `LOG_DIR` is set, two daily-rolling JSON files are written there:
/// `<prefix>.<date>.log` with everything the console filter lets through and
/// `<prefix>-error.<date>.log` with errors only.
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "application".to_string(),
        }
    }
}

impl FromEnv for LogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let directory = env::var("LOG_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            directory,
            file_prefix: env_or_default("LOG_FILE_PREFIX", "application"),
        })
    }
}

/// Keeps the non-blocking file writers alive. Dropping it flushes them.
#[must_use = "dropping the guard stops file logging"]
pub struct TracingGuard {
    _guards: Vec<WorkerGuard>,
}

/// `RUST_LOG` wins; otherwise `info` in production, which keeps the
/// per-request access lines, and `debug` in development.
fn default_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if environment.is_production() {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("debug")
        }
    })
}

fn daily_file(
    log: &LogConfig,
    directory: &Path,
    suffix: &str,
) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(format!("{}{}", log.file_prefix, suffix))
        .filename_suffix("log")
        .build(directory)
}

/// Initialize tracing with environment-aware configuration and error span capture.
///
/// - **Production** (`APP_ENV=production`): JSON console output at `info`.
/// - **Development** (default): pretty console output at `debug`.
///
/// Both include the `ErrorLayer` so color-eyre reports carry span traces.
/// When `log.directory` is set, daily-rolling files are added (see [`LogConfig`]).
///
/// Safe to call more than once: if a global subscriber is already installed
/// (common in tests) the call is a no-op apart from the returned guard.
pub fn init_tracing(environment: &Environment, log: &LogConfig) -> Result<TracingGuard, InitError> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guards = Vec::new();

    let console: BoxedLayer = if environment.is_production() {
        fmt::layer()
            .json()
            .with_target(false)
            .flatten_event(true)
            .with_filter(default_filter(environment))
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .pretty()
            .with_filter(default_filter(environment))
            .boxed()
    };
    layers.push(console);

    if let Some(directory) = &log.directory {
        let (writer, guard) = tracing_appender::non_blocking(daily_file(log, directory, "")?);
        guards.push(guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(default_filter(environment))
                .boxed(),
        );

        let (writer, guard) = tracing_appender::non_blocking(daily_file(log, directory, "-error")?);
        guards.push(guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(LevelFilter::ERROR)
                .boxed(),
        );
    }

    layers.push(tracing_error::ErrorLayer::default().boxed());

    match tracing_subscriber::registry().with(layers).try_init() {
        Ok(_) => info!(
            "Tracing initialized with ErrorLayer. Environment: {:?}, log dir: {:?}",
            environment, log.directory
        ),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }

    Ok(TracingGuard { _guards: guards })
}
