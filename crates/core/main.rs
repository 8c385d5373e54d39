#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process};

mod app;
mod commands;
mod file;

use app::CredentialSource;
use commands::Commands;

use clap::{Args, Parser};
use log::{error, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                verbosity,
                quiet,
                id_file,
                key_file,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let credentials = CredentialSource::new(id_file, key_file);
    trace!("Using credentials from {credentials:?}");

    let message = command.execute(&credentials, quiet)?;
    if !quiet && !message.is_empty() {
        println!("{message}");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 1 } else { verbosity + 2 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "bookrank")]
#[clap(about = "Look up the best price and sales rank of books by ISBN")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from writing to stdout, errors will still be printed to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,

    /// File containing the access id [default: ~/.amazon-id]
    #[clap(long, parse(from_os_str), env = "BOOKRANK_ID_FILE", global = true)]
    id_file: Option<PathBuf>,

    /// File containing the secret key [default: ~/.amazon-key]
    #[clap(long, parse(from_os_str), env = "BOOKRANK_KEY_FILE", global = true)]
    key_file: Option<PathBuf>,
}
