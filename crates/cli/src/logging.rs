use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Diagnostics go to stderr so they never interleave with the session
/// log on stdout. `RUST_LOG` overrides everything; otherwise `-v` turns
/// on debug output for this tool's own targets only.
pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,tether=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr.with_max_level(tracing::Level::TRACE))
        .with_target(true)
        .without_time()
        .compact()
        .init();
}
