//! umlgen CLI - Generate PlantUML class diagrams from type manifests

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // logging is initialized by the app once flags are known
    let app = cli::UmlgenApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
