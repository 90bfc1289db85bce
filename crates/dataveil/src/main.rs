use clap::Parser;
use dataveil::{run, ShellOptions};
use std::path::PathBuf;
use tracing::error;

/// dataveil: define a tabular dataset, bind a masking policy to each
/// field, and produce a de-identified copy while keeping the original
/// available for re-masking.
#[derive(Parser, Debug)]
#[command(name = "dataveil", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory where export files are written
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("dataveil=debug,dataveil_store=debug,dataveil_engine=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dataveil=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = ShellOptions {
        output_dir: cli.output_dir,
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    if let Err(e) = run(&mut input, &mut output, &options) {
        error!("{}", e);
        std::process::exit(1);
    }
}
