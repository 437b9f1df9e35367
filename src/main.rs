mod carrier;
mod cli;
mod db;
mod error;
mod exporter;
mod fmt;
mod ingest;
mod normalizer;
mod reports;
mod settings;
mod sheet;
mod stats;

use clap::Parser;

use cli::{Cli, Commands, ReportCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { file, carrier } => cli::import::run(&file, carrier.as_deref()),
        Commands::Detect { file } => cli::detect::run(&file),
        Commands::Carriers { headers } => cli::carriers::run(headers),
        Commands::Records {
            carrier,
            agent,
            limit,
        } => cli::records::run(carrier.as_deref(), agent.as_deref(), limit),
        Commands::Report { command } => match command {
            ReportCommands::Summary => cli::report::summary(),
            ReportCommands::Types => cli::report::types(),
            ReportCommands::Agents => cli::report::agents(),
        },
        Commands::Export { output, carrier } => cli::export::run(&output, carrier.as_deref()),
        Commands::Status => cli::status::run(),
        Commands::Wipe { yes } => cli::wipe::run(yes),
        Commands::Completions { shell } => cli::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
