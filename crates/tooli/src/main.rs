//! tooli command-line entry point.

use std::time::Duration;
use tooli::cli::{self, CliError, EXIT_FAILURE, EXIT_OK, exit_code_for, render_error};
use tooli::commands::{self, Context};
use tooli::tracing::{TracingConfig, init_tracing};

fn main() {
    // The tracing subscriber may be unusable while panicking, so write directly.
    #[allow(clippy::print_stderr)]
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with --level debug for more information.");
    }));

    let cli = cli::parse();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            }
            std::process::exit(EXIT_FAILURE);
        }
    };

    let exit_code = rt.block_on(run(cli));
    std::process::exit(exit_code);
}

async fn run(cli: cli::Cli) -> i32 {
    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        ..Default::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        render_error(&CliError::other(e.to_string()));
        return EXIT_FAILURE;
    }

    let result = match Context::new(cli.config, Duration::from_secs(cli.timeout)) {
        Ok(ctx) => commands::dispatch(cli.command, &ctx).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => EXIT_OK,
        Err(e) => {
            tracing::debug!(error = %e, "Command failed");
            render_error(&e);
            exit_code_for(&e)
        }
    }
}
