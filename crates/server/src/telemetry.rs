use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ServerConfig};

/// `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                "recon-server".to_string(),
                std::io::stdout,
            ))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}
