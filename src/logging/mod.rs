//! Structured logging helpers
//!
//! Filter construction for `tracing-subscriber` and the request-id
//! middleware that tags every HTTP request.

pub mod middleware;

pub use middleware::{generate_request_id, request_id, REQUEST_ID_HEADER};

use crate::config::LoggingConfig;

/// Build filter directives string from LoggingConfig
///
/// Produces `base_level,engine_twin::component=level,...`, sorted by
/// component so the result is stable.
///
/// # Examples
///
/// ```
/// use engine_twin::config::LoggingConfig;
/// use engine_twin::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     component_levels: Some(HashMap::from([(
///         "dataset".to_string(),
///         "debug".to_string(),
///     )])),
///     ..LoggingConfig::default()
/// };
///
/// assert_eq!(build_filter_directives(&config), "info,engine_twin::dataset=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",engine_twin::{}={}", component, level));
        }
    }

    filter_str
}
