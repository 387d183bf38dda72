use anyhow::Result;
use sigscan::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
