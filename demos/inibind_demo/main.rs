//! # inibind demo application
//!
//! A sample CLI tool that loads an INI file into [`DemoConfig`] and shows
//! each stage of the mapping. It exists purely to demonstrate and manually
//! verify inibind's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example inibind_demo -- show
//! RUST_LOG=inibind=trace cargo run --example inibind_demo -- show
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                 | How to exercise it                                                   |
//! |-------------------------|----------------------------------------------------------------------|
//! | Decode / encode         | `cargo run --example inibind_demo -- show`                           |
//! | Registry miss           | `cargo run --example inibind_demo -- --no-converters show`           |
//! | `config list`           | `cargo run --example inibind_demo -- config list`                    |
//! | `config lines`          | `cargo run --example inibind_demo -- config lines`                   |
//! | `config get`            | `cargo run --example inibind_demo -- config get Server.Port`         |
//! | Model default via get   | `cargo run --example inibind_demo -- config get Server.Host`         |
//! | `config set` / `unset`  | `cargo run --example inibind_demo -- --file /tmp/a.ini config set Server.Port 99` |
//! | Trace logging           | `RUST_LOG=inibind=trace cargo run --example inibind_demo -- show`    |

mod config;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use inibind::{BindError, ConfigArgs, Inibind, Mapper};

use config::{DemoConfig, Level};

// ---------------------------------------------------------------------------
// CLI definitions
// ---------------------------------------------------------------------------

/// inibind demo: map an INI file onto a typed struct and back.
#[derive(Parser, Debug)]
#[command(name = "inibind-demo")]
struct Cli {
    /// INI file to load.
    #[arg(long, global = true, default_value = "demos/inibind_demo/example.ini")]
    file: PathBuf,

    /// Skip registering the `Level` converter to see a registry miss.
    #[arg(long, global = true)]
    no_converters: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the text input, decoded model, encoded table, and output lines.
    Show,
    /// Inspect or edit the file (list, lines, get, set, unset).
    Config(ConfigArgs),
}

// ---------------------------------------------------------------------------
// Mapper helper
// ---------------------------------------------------------------------------

fn make_mapper(cli: &Cli) -> Result<Mapper<DemoConfig>, BindError> {
    let builder = Inibind::builder::<DemoConfig>();
    let builder = if cli.no_converters {
        builder
    } else {
        builder.converter(|raw: &str| raw.parse::<Level>())
    };
    builder.load_path(&cli.file)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn banner(title: &str) {
    println!("================================ {title}");
}

fn show(file: &Path, mapper: &mut Mapper<DemoConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let config = mapper.decode()?;
    let table = mapper.encode_to_table(&config)?;

    banner("Text Input");
    println!("{}", std::fs::read_to_string(file)?);
    banner("Decoded");
    println!("{}", serde_json::to_string_pretty(&config)?);
    banner("Entries");
    println!("{}", serde_json::to_string_pretty(mapper.entries())?);
    banner("To Table");
    println!("{}", serde_json::to_string_pretty(&table)?);
    banner("Output Content");
    println!("{}", table.to_lines().join("\n"));
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    Registry::default()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let mut mapper = make_mapper(&cli).unwrap_or_else(|e| {
        eprintln!("Failed to load {}:\n{e}", cli.file.display());
        std::process::exit(1);
    });

    let outcome = match cli.command {
        Commands::Show => show(&cli.file, &mut mapper),
        Commands::Config(args) => mapper
            .handle_and_print(&args.into_action())
            .map_err(Into::into),
    };
    if let Err(e) = outcome {
        eprintln!("Error:\n{e}");
        std::process::exit(1);
    }
}
