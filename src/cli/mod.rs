pub mod carriers;
pub mod completions;
pub mod detect;
pub mod export;
pub mod import;
pub mod init;
pub mod records;
pub mod report;
pub mod status;
pub mod wipe;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "commish", about = "Commission report tracker for independent insurance agencies.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up commish: choose a data directory and initialize the database.
    Init {
        /// Path for commish data (default: ~/Documents/commish)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a carrier commission report (CSV or XLSX).
    Import {
        /// Path to the report file
        file: String,
        /// Carrier code (MOLINA, AMBETTER, AETNA, OSCAR); auto-detected when omitted
        #[arg(long)]
        carrier: Option<String>,
    },
    /// Detect which carrier a report file belongs to, without importing.
    Detect {
        /// Path to the report file
        file: String,
    },
    /// List supported carriers and their expected report headers.
    Carriers {
        /// Also print each carrier's expected headers
        #[arg(long)]
        headers: bool,
    },
    /// List stored commission records.
    Records {
        /// Filter by carrier code
        #[arg(long)]
        carrier: Option<String>,
        /// Filter by assigned agent
        #[arg(long)]
        agent: Option<String>,
        /// Maximum rows to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// Summary reports over the stored records.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export stored records to a CSV file.
    Export {
        /// Output file path
        output: String,
        /// Filter by carrier code
        #[arg(long)]
        carrier: Option<String>,
    },
    /// Show current database and summary statistics.
    Status,
    /// Delete every stored record and import batch.
    Wipe {
        /// Confirm the wipe; without this flag nothing is deleted
        #[arg(long)]
        yes: bool,
    },
    /// Generate shell completions.
    Completions {
        /// Shell: bash, zsh, fish, ...
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Overall totals plus carrier breakdown.
    Summary,
    /// Commission totals per transaction type.
    Types,
    /// Commission totals per assigned agent.
    Agents,
}
