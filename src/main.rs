use anyhow::Result;
use clap::Parser;

use natlang::{
    cli::Cli,
    runtime::{build_controller, resolve_config, NonInteractiveRunner, Orchestrator},
    utils::{init_logger, LogTarget},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Check if running in non-interactive mode
    if let Some(prompt) = cli.prompt.clone() {
        run_non_interactive(cli, prompt).await
    } else {
        let orchestrator = Orchestrator::new(cli)?;
        orchestrator.run().await
    }
}

/// Send one message and print the result
async fn run_non_interactive(cli: Cli, prompt: String) -> Result<()> {
    let config = resolve_config(&cli)?;

    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    init_logger(level, LogTarget::Stderr)?;

    let controller = build_controller(&config, cli.ephemeral)?;
    let mut runner = NonInteractiveRunner::new(controller, config.ui.show_metadata);

    let result = runner.execute(prompt).await?;

    let formatted = runner.format_result(&result, cli.output_format);
    println!("{}", formatted);

    // Exit with appropriate code
    if !result.ok {
        std::process::exit(1);
    }

    Ok(())
}
