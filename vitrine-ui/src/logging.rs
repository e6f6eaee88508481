//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events; binaries call [`init_tracing`]
//! once at startup to print them.

const DEFAULT_FILTER: &str = "error,vitrine_ui=info,vitrine_components=info";

/// Installs a formatted `tracing` subscriber.
///
/// The filter is read from `RUST_LOG`; without it, vitrine crates log at
/// `info` and everything else at `error`. Calling this more than once, or
/// after another subscriber was installed, has no effect.
pub fn init_tracing() {
    init_tracing_with_default(DEFAULT_FILTER);
}

/// Like [`init_tracing`], with `directives` used when `RUST_LOG` is unset.
///
/// Invalid directives fall back to logging errors only.
pub fn init_tracing_with_default(directives: &str) {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(directives) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("tracing initialised twice without panicking");
    }

    #[test]
    fn invalid_directives_do_not_panic() {
        init_tracing_with_default("vitrine_ui=loudest");
    }

    #[test]
    fn default_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
