//! Logging setup.
//!
//! Log output goes to stderr so that reports written to stdout stay
//! machine-readable.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build filter directives string from LoggingConfig
///
/// The result has the form `base_level,quota_audit::component=level,...`,
/// with components in name order.
///
/// # Examples
///
/// ```
/// use quota_audit::config::LoggingConfig;
/// use quota_audit::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     component_levels: Some(HashMap::from([(
///         "clients".to_string(),
///         "debug".to_string(),
///     )])),
///     ..Default::default()
/// };
///
/// assert_eq!(build_filter_directives(&config), "info,quota_audit::clients=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",quota_audit::{}={}", component, level));
        }
    }

    filter_str
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured levels.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = build_filter_directives(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_level_only() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_components_sorted() {
        let config = LoggingConfig {
            level: "info".to_string(),
            component_levels: Some(HashMap::from([
                ("reconcile".to_string(), "trace".to_string()),
                ("clients".to_string(), "debug".to_string()),
            ])),
            ..Default::default()
        };
        assert_eq!(
            build_filter_directives(&config),
            "info,quota_audit::clients=debug,quota_audit::reconcile=trace"
        );
    }
}
