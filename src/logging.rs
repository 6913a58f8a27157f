use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `RUST_LOG` wins over the CLI flags.
pub fn init(verbose: bool, quiet: bool) {
    let default = if verbose {
        "a11yplan=debug"
    } else if quiet {
        "a11yplan=error"
    } else {
        "a11yplan=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
