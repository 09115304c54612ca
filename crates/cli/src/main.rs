use clap::Parser;

use prodplan_cli::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    prodplan_observability::init(cli.log_format);

    let stdout = std::io::stdout();
    prodplan_cli::commands::run(&cli, &mut stdout.lock())
}
