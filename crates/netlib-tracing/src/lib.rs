//! Shared tracing configuration for the netlib workspace.
//!
//! Library crates only emit events through `tracing`; binaries, tests and
//! benches that want to see backend resolution install a subscriber through
//! [`init_global_tracing`] so the output format is the same everywhere.

mod timer;

pub use timer::ResolutionTimer;

use std::env;

use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter, Registry};

/// How the shared subscriber should behave
#[derive(Clone, Debug)]
pub struct TracingConfig {
    /// Optional directives (e.g. `netlib_blas=debug,info`). When absent the
    /// crate falls back to `RUST_LOG` and finally to [`Self::default_directive`].
    pub directives: Option<String>,
    /// Fallback directive when neither `directives` nor `RUST_LOG` parse
    pub default_directive: String,
    /// Show event targets (module paths)
    pub include_targets: bool,
    /// ANSI colours; disable for collected logs
    pub ansi: bool,
    /// Span lifecycle events to emit
    pub span_events: FmtSpan,
    pub output: TracingOutput,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_local()
    }
}

impl TracingConfig {
    /// Pretty, coloured output for local development
    pub fn for_local() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: true,
            span_events: FmtSpan::NONE,
            output: TracingOutput::Pretty,
        }
    }

    /// JSON without colour for CI and log collection
    pub fn for_ci() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: false,
            span_events: FmtSpan::NONE,
            output: TracingOutput::Json,
        }
    }

    /// Compact output with resolution internals at debug level
    pub fn for_resolution_debugging() -> Self {
        Self {
            directives: Some("netlib_core=debug,netlib_blas=debug,netlib_arpack=debug,info".to_string()),
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: false,
            span_events: FmtSpan::CLOSE,
            output: TracingOutput::Compact,
        }
    }

    /// Build a configuration from environment hints.
    ///
    /// # Environment Variables
    ///
    /// - `NETLIB_TRACING_PROFILE` - `local` (default), `ci` or `resolution`
    /// - `NETLIB_TRACING_DIRECTIVES` - overrides the filter directives
    /// - `NETLIB_TRACING_FORMAT` - `pretty`, `compact` or `json`
    pub fn from_env() -> Self {
        let profile = env::var("NETLIB_TRACING_PROFILE")
            .unwrap_or_else(|_| "local".to_string())
            .to_ascii_lowercase();

        let mut config = match profile.as_str() {
            "ci" => Self::for_ci(),
            "resolution" => Self::for_resolution_debugging(),
            _ => Self::for_local(),
        };

        if let Ok(directives) = env::var("NETLIB_TRACING_DIRECTIVES") {
            if !directives.trim().is_empty() {
                config.directives = Some(directives);
            }
        }

        if let Ok(format) = env::var("NETLIB_TRACING_FORMAT") {
            if let Some(parsed) = TracingOutput::from_env_value(&format) {
                config.output = parsed;
                if matches!(config.output, TracingOutput::Json) {
                    config.ansi = false;
                }
            }
        }

        config
    }

    fn resolve_filter(&self) -> Result<EnvFilter, TracingSetupError> {
        match &self.directives {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|err| TracingSetupError::InvalidFilter(err.to_string()))
            }
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_directive))),
        }
    }
}

/// Output format of the formatter layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TracingOutput {
    Compact,
    Pretty,
    Json,
}

impl TracingOutput {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Errors raised while installing the shared subscriber
#[derive(Debug, thiserror::Error)]
pub enum TracingSetupError {
    /// The directive string could not be parsed
    #[error("invalid tracing directive: {0}")]
    InvalidFilter(String),
    /// A global subscriber is usually already installed
    #[error("failed to install global tracing subscriber: {0}")]
    SubscriberInit(#[from] tracing_subscriber::util::TryInitError),
}

/// Build a subscriber from `config` without installing it
pub fn build_subscriber(config: &TracingConfig) -> Result<impl Subscriber + Send + Sync, TracingSetupError> {
    let filter = config.resolve_filter()?;
    Ok(Registry::default().with(format_layer(config)).with(filter))
}

fn format_layer(config: &TracingConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let base = tracing_fmt::layer()
        .with_target(config.include_targets)
        .with_span_events(config.span_events.clone());

    match config.output {
        TracingOutput::Compact => Box::new(base.compact().with_ansi(config.ansi)),
        TracingOutput::Pretty => Box::new(base.pretty().with_ansi(config.ansi)),
        TracingOutput::Json => Box::new(base.json().with_ansi(false)),
    }
}

/// Install the configured subscriber as the process-wide default
pub fn init_global_tracing(config: &TracingConfig) -> Result<(), TracingSetupError> {
    build_subscriber(config)?.try_init()?;
    Ok(())
}

/// Install a test-friendly subscriber once; later calls are no-ops
pub fn init_for_tests() {
    let config = TracingConfig {
        ansi: false,
        output: TracingOutput::Compact,
        ..TracingConfig::from_env()
    };
    if let Ok(subscriber) = build_subscriber(&config) {
        let _ = subscriber.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serializes tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn reset_env() {
        for key in [
            "NETLIB_TRACING_PROFILE",
            "NETLIB_TRACING_DIRECTIVES",
            "NETLIB_TRACING_FORMAT",
            "RUST_LOG",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn rejects_invalid_directive() {
        let _guard = ENV_LOCK.lock().unwrap();
        reset_env();
        let config = TracingConfig {
            directives: Some("=::invalid".to_string()),
            ..TracingConfig::default()
        };
        assert!(matches!(build_subscriber(&config), Err(TracingSetupError::InvalidFilter(_))));
    }

    #[test]
    fn builds_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        reset_env();
        assert!(build_subscriber(&TracingConfig::default()).is_ok());
    }

    #[test]
    fn from_env_respects_profile_and_format() {
        let _guard = ENV_LOCK.lock().unwrap();
        reset_env();
        env::set_var("NETLIB_TRACING_PROFILE", "ci");
        env::set_var("NETLIB_TRACING_FORMAT", "compact");
        env::set_var("NETLIB_TRACING_DIRECTIVES", "netlib_blas=trace");

        let config = TracingConfig::from_env();
        assert_eq!(config.directives.as_deref(), Some("netlib_blas=trace"));
        assert!(!config.ansi);
        assert_eq!(config.output, TracingOutput::Compact);
        reset_env();
    }

    #[test]
    fn resolution_profile_enables_debug_directives() {
        let _guard = ENV_LOCK.lock().unwrap();
        reset_env();
        env::set_var("NETLIB_TRACING_PROFILE", "resolution");
        let config = TracingConfig::from_env();
        assert!(config.directives.as_deref().is_some_and(|d| d.contains("netlib_core=debug")));
        reset_env();
    }

    #[test]
    fn json_format_disables_ansi() {
        let _guard = ENV_LOCK.lock().unwrap();
        reset_env();
        env::set_var("NETLIB_TRACING_FORMAT", "json");
        let config = TracingConfig::from_env();
        assert_eq!(config.output, TracingOutput::Json);
        assert!(!config.ansi);
        reset_env();
    }
}
