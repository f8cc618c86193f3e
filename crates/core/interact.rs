use std::io::{self, BufRead, IsTerminal};

use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use eyre::{eyre, Context, Result};
use log::trace;

/// A line entered at the watch prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Isbn(String),
    ToggleRetailer,
    ToggleMarketplace,
    Quit,
    Empty,
}

impl From<&str> for Line {
    fn from(input: &str) -> Self {
        match input.trim() {
            "" => Line::Empty,
            ":q" | ":quit" => Line::Quit,
            ":r" | ":retailer" => Line::ToggleRetailer,
            ":m" | ":marketplace" => Line::ToggleMarketplace,
            isbn => Line::Isbn(isbn.to_owned()),
        }
    }
}

/// Asks which of the two pages should be opened, returning `(retailer, marketplace)`.
pub fn user_select_windows(retailer: bool, marketplace: bool) -> Result<(bool, bool)> {
    let items = [
        "Open the retailer product page",
        "Open the marketplace search results",
    ];
    let selection = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Pages to open (space to toggle)")
        .items(&items)
        .defaults(&[retailer, marketplace])
        .interact_opt()
        .wrap_err_with(|| eyre!("Page selection cancelled"))?
        .ok_or_else(|| eyre!("No selection made - cancelling operation"))?;

    Ok((selection.contains(&0), selection.contains(&1)))
}

/// Where the watch loop takes its lines from.
pub trait LineSource {
    /// The next line, with the end of the input reported as [`Line::Quit`].
    fn next_line(&mut self) -> Result<Line>;
}

/// Reads lines at an interactive prompt.
pub struct Prompt(pub &'static str);

impl LineSource for Prompt {
    fn next_line(&mut self) -> Result<Line> {
        user_input(self.0)
    }
}

/// Reads lines from a pipe or file, one ISBN or command per line.
pub struct Piped<R: BufRead>(pub R);

impl<R: BufRead> LineSource for Piped<R> {
    fn next_line(&mut self) -> Result<Line> {
        let mut buf = String::new();
        let read = self
            .0
            .read_line(&mut buf)
            .wrap_err("Cannot read the next line of input")?;
        if read == 0 {
            trace!("End of input reached");
            return Ok(Line::Quit);
        }
        Ok(Line::from(buf.as_str()))
    }
}

/// Whether the prompt can be shown, which needs a terminal on both stdin and stderr.
///
/// Without one the prompt answers every read with an empty line, so piped input is read
/// through [`Piped`] instead.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && console::user_attended_stderr()
}

pub fn user_input(prompt: &str) -> Result<Line> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map(|s| Line::from(s.as_str()))
        .wrap_err_with(|| eyre!("User input cancelled"))
}
