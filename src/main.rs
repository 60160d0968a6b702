use clap::Parser;
use fnrouter::cli::{run_cli, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    fnrouter::logging::init_logging()?;
    run_cli(cli)
}
