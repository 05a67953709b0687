//! Plantilla CLI — pre-build template rendering for native-extension modules.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "plantilla",
    version,
    about = "Pre-build mustache rendering of typed binding sources from YAML type definitions"
)]
struct Cli {
    #[command(subcommand)]
    command: plantilla::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = plantilla::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
