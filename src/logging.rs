//=========================================================================
// Logging
//=========================================================================
//
// Optional `env_logger` installation for hosts that have no logger of
// their own. The crate itself only talks to the `log` facade.
//
// Targets:
//   bridge, lifecycle, render, input, input::queue,
//   platform, platform::input, ffi
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Once;

use env_logger::WriteStyle;
use log::LevelFilter;

//=== LoggingConfig =======================================================

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax, e.g.
/// `"info,surface_bridge=debug"` or `"warn,render=trace"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: WriteStyle,
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: WriteStyle::Auto,
        }
    }
}

//=== init_logging ========================================================

static INIT: Once = Once::new();

/// Installs the global logger once. Later calls are no-ops.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then `info`.
/// If the host already installed a different logger, that one stays.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(LevelFilter::Info);
            }
        }
        builder.write_style(config.write_style);

        match builder.try_init() {
            Ok(()) => log::debug!(target: "bridge", "Logging initialized"),
            Err(_) => log::debug!(target: "bridge", "Logger already installed by host"),
        }
    });
}

/// Whether [`init_logging`] has run.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::with_filter("debug"));
        init_logging(LoggingConfig::default());

        assert!(is_initialized());
        log::info!(target: "bridge", "logging still works after repeated init");
    }

    #[test]
    fn config_defaults() {
        let config = LoggingConfig::default();

        assert!(config.env_filter.is_none());
        assert!(matches!(config.write_style, WriteStyle::Auto));
    }

    #[test]
    fn with_filter_sets_filter() {
        let config = LoggingConfig::with_filter("warn,render=trace");

        assert_eq!(config.env_filter.as_deref(), Some("warn,render=trace"));
    }
}
