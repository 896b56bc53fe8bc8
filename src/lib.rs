pub mod classify;
pub mod error;
pub mod gateway;
pub mod labels;
pub mod preprocess;
pub mod server;
pub mod settings;

/// Compile-time defaults. Everything here can be overridden at runtime
/// through `settings::Settings`
pub mod config {
    /// Side length (pixels) of the square input the model was trained on
    pub const TARGET_SIZE: u32 = 28;

    /// Maximum representable pixel intensity of an 8-bit channel
    pub const MAX_INTENSITY: f32 = 255.0;

    /// Pick `TOP_N` largest probabilities in a classifier model
    pub const TOP_N: usize = 5;

    /// The class names file, one name per line
    pub const CLASSES_PATH: &str = "all_classes.txt";

    /// Default config file looked up in the working directory
    pub const CONFIG_FILE: &str = "symbolize.toml";

    /// Prefix of environment variable overrides, e.g. `SYMBOLIZE__SERVER__PORT`
    pub const ENV_PREFIX: &str = "SYMBOLIZE";

    /// Default log filter when `RUST_LOG` is unset
    pub const RUST_LOG: &str = "info,actix_web=info,symbolize=debug";

    /// Timeout for a single round-trip to the inference endpoint
    pub const GATEWAY_TIMEOUT_SECS: u64 = 30;
}

/// Small helpers shared by the pipeline and the binaries
pub mod util {
    use tracing_subscriber::EnvFilter;

    /// Install the global fmt subscriber. `RUST_LOG` wins over `default_filter`
    pub fn init_tracing(default_filter: &str) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    /// Strip a browser data-URL header (`data:image/png;base64,`) if present
    pub fn strip_data_url(raw: &str) -> &str {
        let raw = raw.trim();
        match raw.strip_prefix("data:") {
            Some(rest) => match rest.split_once(',') {
                Some((_, payload)) => payload,
                None => rest,
            },
            None => raw,
        }
    }


    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn strips_data_url_header() {
            assert_eq!(strip_data_url("data:image/png;base64,AAAA"), "AAAA");
            assert_eq!(strip_data_url("  AAAA\n"), "AAAA");
            assert_eq!(strip_data_url("AAAA"), "AAAA");
        }
    }
}
