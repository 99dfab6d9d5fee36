use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,ec2_instances=info";
const VERBOSE_DIRECTIVES: &str = "info,ec2_instances=debug";

/// Installs the global subscriber. `RUST_LOG` overrides the defaults.
/// Output goes to stderr; stdout carries the JSON state.
pub fn init_logging(verbose: bool) {
    let _ = try_init_logging(verbose);
}

pub fn try_init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default = if verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}
