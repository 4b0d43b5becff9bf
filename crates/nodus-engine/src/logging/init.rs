use std::sync::Once;

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "nodus_engine=debug"). When unset, the `RUST_LOG` environment variable
/// applies, then an info-level default.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub filter: Option<String>,
    pub write_style: Option<env_logger::WriteStyle>,
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; later calls are ignored. Intended usage is early in `main`.
pub fn init_logging(options: LogOptions) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = options.filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(options.write_style.unwrap_or(env_logger::WriteStyle::Auto));
        builder.init();

        log::debug!("logging initialized");
    });
}
