mod cli;
mod commands;
mod output;
mod signal;

use clap::Parser;
use cli::Cli;
use latexd_core::LatexdError;
use latexd_core::viewer::SystemViewer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let viewer = SystemViewer::for_host();
    let result = match signal::Shutdown::install() {
        Ok(mut shutdown) => commands::build::run(cli, &mut shutdown, &viewer).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Warnings by default, debug output for our own crates with `--verbose`;
/// `RUST_LOG` overrides both
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,latexd=debug,latexd_core=debug,latexd_latexmk=debug"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<LatexdError>()
        .map_or(1, LatexdError::exit_code)
}
