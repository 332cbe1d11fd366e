//! zipstrap - build self-contained executable Python zipapps.
//!
//! Installs packages with pip into a scratch directory, records where the
//! compiled extensions live, and writes everything plus a bootstrap into a
//! single archive that starts with an interpreter line.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use zipstrap::commands::{self, BuildArgs};
use zipstrap::config::Config;
use zipstrap::logging;
use zipstrap::preflight::Blacklist;

#[derive(Parser)]
#[command(name = "zipstrap")]
#[command(about = "Build self-contained executable Python zipapps")]
#[command(
    after_help = "QUICK START:\n  zipstrap build -e app:main -o app.pyz app   Build app.pyz from the 'app' package\n  ./app.pyz                                   Run it\n  zipstrap info app.pyz                       Show what it runs"
)]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install packages and write them into an executable archive
    Build {
        /// Entry point to run, as module:callable
        #[arg(short = 'e', long = "entry-point")]
        entry_point: Option<String>,

        /// Console script (from the installed packages) to run
        #[arg(short = 'c', long = "console-script")]
        console_script: Option<String>,

        /// Archive to write
        #[arg(short = 'o', long = "output-file")]
        output_file: Option<PathBuf>,

        /// Interpreter for the shebang (default: /usr/bin/env <host python>)
        #[arg(short = 'p', long = "python")]
        python: Option<PathBuf>,

        /// Existing site-packages tree to include (repeatable)
        #[arg(long = "site-packages", value_name = "DIR")]
        site_packages: Vec<PathBuf>,

        /// Store entries without compression
        #[arg(long, overrides_with = "compressed")]
        uncompressed: bool,

        /// Deflate entries (default)
        #[arg(long, overrides_with = "uncompressed")]
        compressed: bool,

        /// Arguments passed to the installer (packages, requirement files, ...)
        #[arg(
            value_name = "INSTALLER_ARGS",
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        installer_args: Vec<String>,
    },

    /// Show the interpreter, entry point and native extensions of an archive
    Info {
        archive: PathBuf,

        /// Print the raw bootstrap descriptor
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration
    Config,
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Build {
            entry_point,
            console_script,
            output_file,
            python,
            site_packages,
            uncompressed,
            compressed: _,
            installer_args,
        } => {
            let blacklist = Blacklist::pip();
            let args = BuildArgs {
                entry_point,
                console_script,
                output: output_file,
                python,
                site_packages,
                uncompressed,
                installer_args,
            };
            commands::cmd_build(args, config, &blacklist)
        }
        Commands::Info { archive, json } => commands::cmd_info(&archive, json),
        Commands::Config => {
            config.print();
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();
    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("[WARN] {:#}", e);
    }
    let config = Config::load();

    if let Err(err) = run(cli, &config) {
        eprintln!("{}", commands::error_message(&err));
        std::process::exit(commands::exit_code(&err));
    }
}
