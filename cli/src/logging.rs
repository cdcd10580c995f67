use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` applies, defaulting to
/// `info` so the request summary is always shown.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // A second call (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
