use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "catalog-cmd")]
#[command(about = "Command-line utility for course catalog keys")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Key schema
    Schema {
        /// Print the parsing canonical form instead of the full schema
        #[arg(long, conflicts_with = "fingerprint")]
        canonical: bool,

        /// Print the 64-bit schema fingerprint
        #[arg(long)]
        fingerprint: bool,
    },

    /// Encode a key and print the bytes as hex
    Encode {
        /// Course id; omit for an absent id
        #[arg(long, allow_negative_numbers = true)]
        id: Option<i32>,

        /// Emit a single-object message instead of the plain body
        #[arg(long)]
        single_object: bool,
    },

    /// Decode hex bytes into a key and print it as JSON
    Decode {
        /// Hex-encoded input, whitespace allowed
        hex: String,

        /// Input is a single-object message instead of the plain body
        #[arg(long)]
        single_object: bool,

        /// Reject union indexes other than 0 and 1
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema {
            canonical,
            fingerprint,
        } => commands::schema::run(canonical, fingerprint),
        Commands::Encode { id, single_object } => commands::encode::run(id, single_object),
        Commands::Decode {
            hex,
            single_object,
            strict,
        } => commands::decode::run(&hex, single_object, strict),
    }
}
