use std::sync::Once;

use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Fails when a global subscriber is already installed.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "techmentor_cache_hit_total",
            Unit::Count,
            "Total number of cache hits, labelled by entry kind."
        );
        describe_counter!(
            "techmentor_cache_miss_total",
            Unit::Count,
            "Total number of cache misses, labelled by entry kind."
        );
        describe_counter!(
            "techmentor_link_store_fallback_total",
            Unit::Count,
            "Total number of category-link sets loaded from the link store."
        );
        describe_counter!(
            "techmentor_category_created_total",
            Unit::Count,
            "Total number of categories discovered through profile changes."
        );
        describe_gauge!(
            "techmentor_event_queue_len",
            Unit::Count,
            "Current number of undelivered profile events."
        );
        describe_histogram!(
            "techmentor_search_ms",
            Unit::Milliseconds,
            "Profile search latency in milliseconds."
        );
    });
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn second_install_is_reported() {
        let settings = LoggingSettings {
            level: LevelFilter::WARN,
            format: LogFormat::Compact,
        };

        // The first call may lose to another test that installed a subscriber.
        let _ = init(&settings);
        let err = init(&settings).expect_err("subscriber already installed");
        assert!(matches!(err, InfraError::Telemetry(_)));
    }
}
