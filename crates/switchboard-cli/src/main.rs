use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{Context, DecodeOptions};

#[derive(Parser)]
#[command(name = "switchboard", about = "Encode, decode, and inspect circuit layouts")]
struct Cli {
    /// Settings file (.ron, .toml, or .json). Defaults to ./switchboard.* if present
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON circuit document into a bitstream
    Encode {
        /// Input JSON document
        file: PathBuf,
        /// Output file (default: <file> with a .swc extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode a bitstream into a JSON circuit document
    Decode {
        /// Input bitstream
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Never fail: bad headers give an empty document
        #[arg(long)]
        lenient: bool,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print header, size, cell count, and id of a bitstream
    Inspect {
        /// Input bitstream
        file: PathBuf,
    },
    /// Print the render plan for a bitstream as JSON
    Plan {
        /// Input bitstream
        file: PathBuf,
        /// Atlas table (.ron, .toml, or .json). Defaults to the stock tileset
        #[arg(long)]
        atlas: Option<PathBuf>,
        /// Never fail: a bad header prints null
        #[arg(long)]
        lenient: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let ctx = match Context::load(cli.settings.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Encode { file, output } => ctx.encode(&file, output).map(|path| {
            eprintln!("  Written to {}", path.display());
        }),
        Commands::Decode {
            file,
            output,
            lenient,
            pretty,
        } => ctx
            .decode(&file, DecodeOptions { lenient, pretty })
            .and_then(|json| commands::emit(&json, output.as_deref())),
        Commands::Inspect { file } => ctx.inspect(&file).map(|report| print!("{report}")),
        Commands::Plan {
            file,
            atlas,
            lenient,
        } => ctx
            .plan(&file, atlas.as_deref(), lenient)
            .map(|json| println!("{json}")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
