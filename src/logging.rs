use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize diagnostic logging via `tracing`.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over the
/// default `warn`. Logs go to stderr so they never mix with report output.
pub fn init(verbose: bool) {
    INIT.get_or_init(|| {
        let fallback = if verbose { "git_release=debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        let subscriber = Registry::default().with(filter).with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        );
        if tracing::subscriber::set_global_default(subscriber).is_err() {}
    });
}
