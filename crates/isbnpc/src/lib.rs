#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
#![doc = include_str!("../README.md")]

mod api;
mod book;
pub mod config;
mod error;
mod isbn;
mod xml;

pub use api::{ndl::Catalog, Client};
pub use book::BookInfo;
pub use config::Config;
pub use error::{Error, ErrorKind};
pub use isbn::{isbn10_check_digit, to_isbn10, validate, Isbn, IsbnKind};

use log::trace;

/// Look up the title and creator of `isbn` in the NDL catalog using the default configuration.
///
/// The `isbn` is sent as given; use [`validate`] first for user input.
///
/// # Errors
///
/// An `Err` of [`ErrorKind::Network`] is returned when the catalog cannot be reached.
/// An `Err` of [`ErrorKind::MalformedResponse`] is returned when no record is found or the
/// record lacks a title or creator.
#[inline]
pub fn lookup(isbn: &str) -> Result<BookInfo, Error> {
    trace!("Search book by ISBN of '{isbn}'");
    Catalog::new(config::LookupConfig::default())?.lookup(isbn)
}
