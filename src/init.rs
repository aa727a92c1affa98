//! Initialization helpers for the binary's startup.

use crate::config::Config;

/// Sets up the tracing subscriber with the configured level and format.
pub fn setup_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = config.logging.level.clone();

        // Keep the HTTP stack quiet unless explicitly enabled/overridden
        for noisy in ["hyper", "reqwest", "rustls"] {
            if !filter.contains(noisy) {
                filter.push_str(&format!(",{}=warn", noisy));
            }
        }

        tracing_subscriber::EnvFilter::new(filter)
    });

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
