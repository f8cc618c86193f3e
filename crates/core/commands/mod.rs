use std::io::{self, Write};

use crate::{
    app::{App, Submission},
    interact::{self, Line, LineSource, Piped, Prompt},
    window::{Browser, Launcher, Window},
};

use isbnpc::{Catalog, Client, Config};

use clap::{Args, Subcommand};
use eyre::{eyre, Context};
use log::{error, info, trace};

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Print the ISBN-10 used for the retailer page
    ///
    /// An ISBN-13 is converted, an ISBN-10 is printed unchanged.
    #[clap(arg_required_else_help = true)]
    Convert {
        /// The ISBN to convert
        isbn: String,
    },

    /// Look up the title and creator of a book in the NDL catalog
    #[clap(arg_required_else_help = true)]
    Lookup {
        /// The ISBN to search for
        isbn: String,

        /// Print the result as a JSON object with the title, creator and isbn fields
        #[clap(long)]
        json: bool,
    },

    /// Open the retailer product page and the marketplace search page for a single ISBN
    #[clap(arg_required_else_help = true)]
    Open {
        /// The ISBN to open pages for
        isbn: String,

        #[clap(flatten)]
        pages: PageOpts,
    },

    /// Read ISBNs one per line and open the pages for each
    ///
    /// Press Enter to submit an ISBN, a barcode scanner can be used to type it. The following
    /// commands are also accepted at the prompt:
    ///
    /// - `:r` toggles the retailer page
    ///
    /// - `:m` toggles the marketplace page
    ///
    /// - `:q` quits
    Watch {
        #[clap(flatten)]
        pages: PageOpts,

        /// Choose the pages to open from a checklist before starting
        #[clap(short, long)]
        select: bool,
    },

    /// Print the configuration in use as TOML
    Config,
}

#[derive(Debug, Args)]
pub struct PageOpts {
    /// Do not open the retailer product page
    #[clap(long)]
    no_retailer: bool,

    /// Do not open the marketplace search page
    #[clap(long)]
    no_marketplace: bool,
}

impl Commands {
    pub fn execute(self, config: Config) -> eyre::Result<String> {
        match self {
            Commands::Convert { isbn } => {
                let isbn = isbnpc::validate(&isbn)?;
                Ok(isbn.to_isbn10()?)
            }
            Commands::Lookup { isbn, json } => {
                let isbn = isbnpc::validate(&isbn)?;
                let book = Catalog::new(config.lookup)?.lookup(isbn.as_str())?;
                if json {
                    serde_json::to_string_pretty(&book).wrap_err("Cannot serialize book as JSON")
                } else {
                    Ok(format!("{}\n{}", book.title(), book.creator()))
                }
            }
            Commands::Open { isbn, pages } => {
                let mut app = build_app(config, &pages)?;
                let submission = app.submit(&isbn)?;
                let report = report(&submission);
                match submission.failure() {
                    Some(failure) => Err(eyre!("{report}\n{failure}")),
                    None => Ok(report),
                }
            }
            Commands::Watch { pages, select } => {
                let mut app = build_app(config, &pages)?;
                if select {
                    let (retailer, marketplace) =
                        interact::user_select_windows(app.retailer.enabled(), app.marketplace.enabled())?;
                    app.retailer.set_enabled(retailer);
                    app.marketplace.set_enabled(marketplace);
                }
                let mut out = io::stdout();
                if interact::is_interactive() {
                    watch(&mut app, &mut Prompt("ISBN"), &mut out)?;
                } else {
                    info!("No terminal attached - reading ISBNs from standard input");
                    watch(&mut app, &mut Piped(io::stdin().lock()), &mut out)?;
                }
                Ok("Stopped watching".to_owned())
            }
            Commands::Config => Ok(config.to_toml_string()?),
        }
    }
}

fn build_app(config: Config, pages: &PageOpts) -> eyre::Result<App<impl Client, Browser>> {
    let Config { lookup, links } = config;
    let catalog = Catalog::new(lookup)?;
    Ok(App::new(
        catalog,
        links,
        Window::new("retailer", Browser, !pages.no_retailer),
        Window::new("marketplace", Browser, !pages.no_marketplace),
    ))
}

/// Handles one line at a time until the user quits or the input ends.
///
/// A submission is fully resolved before the next line is read, so a slow lookup can never
/// update a window after a newer ISBN was entered. Neither an invalid ISBN nor a failed page
/// stops the loop.
fn watch<C, L, S, W>(app: &mut App<C, L>, lines: &mut S, out: &mut W) -> eyre::Result<()>
where
    C: Client,
    L: Launcher,
    S: LineSource,
    W: Write,
{
    writeln!(
        out,
        "Enter an ISBN (10 or 13 characters). :r toggles the retailer page, :m the marketplace page, :q quits."
    )?;
    loop {
        match lines.next_line()? {
            Line::Quit => return Ok(()),
            Line::Empty => trace!("Ignoring empty line"),
            Line::ToggleRetailer => {
                let enabled = app.retailer.toggle();
                writeln!(out, "Retailer page {}", on_off(enabled))?;
            }
            Line::ToggleMarketplace => {
                let enabled = app.marketplace.toggle();
                writeln!(out, "Marketplace page {}", on_off(enabled))?;
            }
            Line::Isbn(raw) => match app.submit(&raw) {
                Ok(submission) => {
                    writeln!(out, "{}", report(&submission))?;
                    if let Some(failure) = submission.failure() {
                        error!("{failure}");
                    }
                }
                Err(err) => error!("{err}"),
            },
        }
    }
}

fn report(submission: &Submission) -> String {
    let heading = match &submission.book {
        Ok(book) => {
            info!("'{}' found for {}", book.title(), submission.isbn);
            format!("{}: {} / {}", submission.isbn, book.title(), book.creator())
        }
        Err(err) => format!("{}: {err}", submission.isbn),
    };
    format!(
        "{heading}\n  retailer: {}\n  marketplace: {}",
        submission.retailer, submission.marketplace
    )
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
