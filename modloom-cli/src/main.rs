use clap::Parser;

mod commands;
mod updates;

use commands::Commands;

#[derive(Parser)]
#[command(name = "modloom")]
#[command(about = "ModLoom: load-order planning for SMAPI mod folders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
