//! KingbaseES type-mapping command-line interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use kingbase_sql::cli::literal::LiteralConfig;
use kingbase_sql::cli::map::MapConfig;
use kingbase_sql::cli::output::{self, ColorMode, OutputFormat};
use kingbase_sql::cli::{literal, map, parse_type, types};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// KingbaseES type-mapping tool
#[derive(Parser)]
#[command(name = "kbsql")]
#[command(author, version, about = "KingbaseES type mapping tools", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Mapping options file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
    format: OutputFormat,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a type mapping
    Map {
        /// Store type name, e.g. varchar(20)
        #[arg(short, long)]
        store_type: Option<String>,

        /// Host type, e.g. Int32 or Array<String>
        #[arg(short = 'H', long)]
        host_type: Option<String>,

        #[arg(long)]
        size: Option<u32>,

        #[arg(long)]
        precision: Option<u32>,

        #[arg(long)]
        scale: Option<u32>,

        /// Request a fixed-length store type
        #[arg(long)]
        fixed_length: bool,

        /// Accepted for provider parity; has no effect, character types are always Unicode
        #[arg(long)]
        unicode: Option<bool>,

        /// The member is part of a key or index
        #[arg(short, long)]
        key: bool,
    },

    /// Render a host value as SQL literals
    Literal {
        /// Store type name
        #[arg(short, long)]
        store_type: Option<String>,

        /// Host type; defaults to the type of the value
        #[arg(short = 'H', long)]
        host_type: Option<String>,

        /// Host value as tagged JSON, e.g. {"type":"Int32","value":5}
        #[arg(long)]
        value: String,
    },

    /// Parse a store type name
    ParseType {
        /// Raw store type name, e.g. numeric(10,2)
        raw: String,
    },

    /// List registered store types
    Types,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Map {
            store_type,
            host_type,
            size,
            precision,
            scale,
            fixed_length,
            unicode,
            key,
        } => map::run(MapConfig {
            store_type,
            host_type,
            size,
            precision,
            scale,
            fixed_length,
            unicode,
            key,
            options_file: cli.config,
            output_format: cli.format,
        }),
        Commands::Literal {
            store_type,
            host_type,
            value,
        } => literal::run(LiteralConfig {
            store_type,
            host_type,
            value,
            options_file: cli.config,
            output_format: cli.format,
        }),
        Commands::ParseType { raw } => parse_type::run(&raw, cli.format),
        Commands::Types => types::run(cli.config.as_deref(), cli.format),
    }
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    output::setup_colors(cli.color);
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
