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
mod interact;
mod window;

use commands::Commands;

use isbnpc::Config;

use clap::{Args, Parser};
use eyre::Context;
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        command,
        global_opts,
    } = Cli::parse();

    setup_errlog(global_opts.verbosity as usize, global_opts.quiet)?;

    let config = load_config(global_opts)?;
    let message = command.execute(config)?;
    println!("{message}");
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new()
        .module("isbnpc")
        .verbosity(verbosity)
        .init()
        .wrap_err("Cannot set up logging")
}

fn load_config(opts: GlobalOpts) -> eyre::Result<Config> {
    let GlobalOpts {
        config,
        endpoint,
        provider,
        timeout_ms,
        ..
    } = opts;

    let mut config = if let Some(path) = config {
        trace!("'config' option used with value of '{}'", path.display());
        Config::from_path(path)?
    } else {
        Config::default()
    };

    if let Some(endpoint) = endpoint {
        config.lookup.endpoint_url = endpoint;
    }
    if let Some(provider) = provider {
        config.lookup.provider_filter = provider;
    }
    if let Some(timeout_ms) = timeout_ms {
        config.lookup.timeout_ms = timeout_ms;
    }

    config.validate()?;
    Ok(config)
}

#[derive(Parser)]
#[clap(name = "isbnpc")]
#[clap(about = "Look up a book by ISBN and open its retailer and marketplace pages")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// A TOML configuration file
    #[clap(short, long, parse(from_os_str), global = true)]
    config: Option<PathBuf>,

    /// Base URL of the catalog search endpoint
    #[clap(long, global = true)]
    endpoint: Option<String>,

    /// Catalog identifier every search is restricted to
    #[clap(long, global = true)]
    provider: Option<String>,

    /// Request timeout for catalog searches, in milliseconds
    #[clap(long, global = true)]
    timeout_ms: Option<u64>,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from logging anything but errors.
    #[clap(short, long, global = true)]
    quiet: bool,
}
