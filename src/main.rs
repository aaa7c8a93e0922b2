use clap::Parser;
use requirements_filter::{run, Args};
use tracing::Level;

/// Logs go to stderr; stdout carries only the filtered manifest.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        // Single line, e.g. error: Could not locate requirements file: foo: entity not found
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
