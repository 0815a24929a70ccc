//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Build the filter: `RUST_LOG` wins, otherwise the configured level is
/// applied to this crate and tower-http.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| config_filter(config))
}

/// Filter from the config alone. A value holding full directives is used
/// as is.
fn config_filter(config: &ObservabilityConfig) -> EnvFilter {
    let level = config.log_level.trim();
    if level.contains('=') || level.contains(',') {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(format!("kernel_bridge={level},tower_http={level}"))
    }
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let config = ObservabilityConfig::default();
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }

    #[test]
    fn test_full_directive_passes_through() {
        let config = ObservabilityConfig {
            log_level: "kernel_bridge=trace,hyper=warn".into(),
        };
        let filter = config_filter(&config).to_string();
        assert!(filter.contains("kernel_bridge=trace"), "{filter}");
        assert!(filter.contains("hyper=warn"), "{filter}");
        assert!(!filter.contains("tower_http"), "{filter}");
    }

    #[test]
    fn test_bare_level_applies_to_crate_and_tower_http() {
        let filter = config_filter(&ObservabilityConfig::default()).to_string();
        assert!(filter.contains("kernel_bridge=info"), "{filter}");
        assert!(filter.contains("tower_http=info"), "{filter}");
    }
}
