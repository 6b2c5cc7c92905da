mod cli;
mod config;
mod project;

use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so `-` output stays a clean document.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::run();
}
