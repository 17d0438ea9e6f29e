//! `swanclock`: countdown with a gated restart code.

use clap::Parser;

use swanclock::cli::args::Cli;
use swanclock::cli::commands;
use swanclock::error::ExitCode;
use swanclock::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() {
            ExitCode::USAGE_ERROR
        } else {
            ExitCode::SUCCESS
        };
        let _ = e.print();
        std::process::exit(code);
    });

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    let result = commands::dispatch(cli).await;

    // exit directly: a blocked stdin reader would otherwise hold up runtime shutdown
    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
