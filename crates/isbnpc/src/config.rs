//! Settings for the catalog lookup and the two shopping links.
//!
//! Every field has a default so a TOML file only needs to name what it changes:
//!
//! ```toml
//! [lookup]
//! timeout_ms = 5000
//!
//! [links]
//! retailer_url = "https://www.amazon.co.jp/dp/"
//! ```

use std::{fs, path::Path, time::Duration};

use log::trace;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{error::DynError, BookInfo, Error, ErrorKind, Isbn};

/// Query parameter carrying the title in the marketplace search URL.
const KEYWORD_PARAM: &str = "keyword";

/// All settings, as read from a TOML file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Settings for the bibliographic search service.
    pub lookup: LookupConfig,
    /// Base URLs for the pages opened after a lookup.
    pub links: LinkConfig,
}

/// Settings for the bibliographic search service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    /// Base URL of the SRU search endpoint.
    pub endpoint_url: String,
    /// Catalog identifier (`dpid`) every query is restricted to.
    pub provider_filter: String,
    /// Upper bound for the whole request, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "https://iss.ndl.go.jp/api/sru".to_owned(),
            provider_filter: "iss-ndl-opac".to_owned(),
            timeout_ms: 10_000,
        }
    }
}

impl LookupConfig {
    /// The request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Base URLs for the retailer product page and the marketplace search page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// Prefix the ISBN-10 is appended to.
    pub retailer_url: String,
    /// Search page receiving the title as its `keyword` parameter.
    pub marketplace_url: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            retailer_url: "https://www.amazon.co.jp/dp/".to_owned(),
            marketplace_url: "https://jp.mercari.com/search".to_owned(),
        }
    }
}

impl LinkConfig {
    /// The retailer product page for `isbn`, always addressed by its ISBN-10 form.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when an ISBN-13 cannot be converted, see [`crate::to_isbn10`].
    pub fn retailer_link(&self, isbn: &Isbn) -> Result<String, Error> {
        let isbn10 = isbn.to_isbn10()?;
        Ok(format!("{}{isbn10}", self.retailer_url))
    }

    /// The marketplace search page for the title of `book`.
    ///
    /// # Errors
    ///
    /// An `Err` of [`ErrorKind::Config`] is returned when `marketplace_url` is not a valid URL.
    pub fn marketplace_link(&self, book: &BookInfo) -> Result<String, Error> {
        Url::parse_with_params(&self.marketplace_url, &[(KEYWORD_PARAM, book.title())])
            .map(String::from)
            .map_err(|e| invalid_url("marketplace_url", &self.marketplace_url, e))
    }
}

impl Config {
    /// Parses a configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// An `Err` of [`ErrorKind::Config`] is returned when the text is not valid TOML, has unknown
    /// keys, or fails [`Config::validate`].
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(s)
            .map_err(|e| Error::wrap_with(ErrorKind::Config, "cannot parse configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the TOML configuration file at `path`.
    ///
    /// # Errors
    ///
    /// An `Err` of [`ErrorKind::Config`] is returned when the file cannot be read or parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        trace!("Reading configuration from '{}'", path.display());
        let text = fs::read_to_string(path).map_err(|e| {
            Error::wrap_with(
                ErrorKind::Config,
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&text)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// An `Err` of [`ErrorKind::Config`] is returned when serialization fails.
    pub fn to_toml_string(&self) -> Result<String, Error> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::wrap_with(ErrorKind::Config, "cannot render configuration", e))
    }

    /// Checks that every URL parses and that the timeout is not zero.
    ///
    /// # Errors
    ///
    /// An `Err` of [`ErrorKind::Config`] names the first invalid setting.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("endpoint_url", &self.lookup.endpoint_url),
            ("retailer_url", &self.links.retailer_url),
            ("marketplace_url", &self.links.marketplace_url),
        ] {
            Url::parse(value).map_err(|e| invalid_url(name, value, e))?;
        }

        if self.lookup.timeout_ms == 0 {
            return Err(Error::new(
                ErrorKind::Config,
                "timeout_ms must be greater than zero",
            ));
        }

        Ok(())
    }
}

pub(crate) fn invalid_url<E: Into<DynError>>(name: &str, value: &str, err: E) -> Error {
    Error::wrap_with(
        ErrorKind::Config,
        format!("{name} '{value}' is not a valid URL"),
        err,
    )
}
