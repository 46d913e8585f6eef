mod cli;

use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so `inspect` can pipe clean JSON on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(cli::run_from_env());
}
