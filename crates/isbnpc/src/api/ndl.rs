use log::{debug, info, trace, warn};
use reqwest::Url;

use crate::{
    config::{invalid_url, LookupConfig},
    xml::{self, Element},
    BookInfo, Error, ErrorKind,
};

use super::Client;

/// Fixed SRU parameters, the query itself is added per lookup.
const SRU_PARAMS: [(&str, &str); 5] = [
    ("operation", "searchRetrieve"),
    ("version", "1.2"),
    ("recordSchema", "dcndl"),
    ("onlyBib", "true"),
    ("recordPacking", "xml"),
];

const ROOT: &str = "searchRetrieveResponse";
const RECORD_PATH: [&str; 2] = ["records", "record"];
const RESOURCE_PATH: [&str; 3] = ["recordData", "rdf:RDF", "dcndl:BibResource"];
const TITLE: &str = "dcterms:title";
const CREATOR: &str = "dc:creator";
const CREATOR_SEPARATOR: &str = " / ";

/// Client for the NDL search (SRU) API.
///
/// Holds no state besides its configuration and transport, so one instance can serve any number
/// of lookups.
pub struct Catalog<C: Client = reqwest::blocking::Client> {
    client: C,
    config: LookupConfig,
}

impl Catalog {
    /// Creates a [`Catalog`] over a reqwest client using the timeout from `config`.
    ///
    /// # Errors
    ///
    /// An `Err` of [`ErrorKind::Config`] is returned when the HTTP client cannot be built.
    pub fn new(config: LookupConfig) -> Result<Self, Error> {
        let client = super::http_client(config.timeout())?;
        Ok(Self { client, config })
    }
}

impl<C: Client> Catalog<C> {
    /// Creates a [`Catalog`] over any transport.
    pub const fn with_client(client: C, config: LookupConfig) -> Self {
        Self { client, config }
    }

    /// The transport requests are made with.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// The configuration this catalog was built with.
    #[must_use]
    pub const fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// The request URL for a lookup of `isbn`.
    ///
    /// # Errors
    ///
    /// An `Err` of [`ErrorKind::Config`] is returned when the configured endpoint is not a URL.
    pub fn query_url(&self, isbn: &str) -> Result<String, Error> {
        let query = format!(
            "isbn=\"{isbn}\" AND dpid={}",
            self.config.provider_filter
        );

        let mut url = Url::parse(&self.config.endpoint_url)
            .map_err(|e| invalid_url("endpoint_url", &self.config.endpoint_url, e))?;
        url.query_pairs_mut()
            .extend_pairs(SRU_PARAMS)
            .append_pair("query", &query);

        Ok(url.into())
    }

    /// Looks up `isbn` with a single request and extracts its title and creator.
    ///
    /// # Errors
    ///
    /// An `Err` of [`ErrorKind::Network`] is returned when the request fails.
    /// An `Err` of [`ErrorKind::MalformedResponse`] is returned when no record matches or the
    /// record does not hold a title and a creator.
    pub fn lookup(&self, isbn: &str) -> Result<BookInfo, Error> {
        info!("Searching for ISBN '{isbn}' in the NDL catalog");
        let url = self.query_url(isbn)?;
        trace!("GET {url}");

        let body = self.client.get_text(&url)?;
        trace!("Request was successful");

        let book = book_from_response(&body, isbn)?;
        debug!(
            "Found '{}' by '{}' for ISBN '{isbn}'",
            book.title(),
            book.creator()
        );
        Ok(book)
    }
}

/// Extracts a [`BookInfo`] from an SRU `searchRetrieveResponse` document.
fn book_from_response(body: &str, isbn: &str) -> Result<BookInfo, Error> {
    let root = xml::parse(body)?;
    if root.name() != ROOT {
        return Err(Error::new(
            ErrorKind::MalformedResponse,
            format!("expected <{ROOT}> but the document starts with <{}>", root.name()),
        ));
    }

    if let Some(diagnostics) = root.child("diagnostics") {
        return Err(Error::new(
            ErrorKind::MalformedResponse,
            format!("the catalog rejected the query: {}", diagnostic_message(diagnostics)),
        ));
    }

    let record = root.descend(&RECORD_PATH).map_err(|e| {
        let count = root.child("numberOfRecords").map(Element::text);
        if count == Some("0") || root.child("records").is_some() {
            Error::new(
                ErrorKind::MalformedResponse,
                format!("no record found for ISBN '{isbn}'"),
            )
        } else {
            e
        }
    })?;

    let records = root
        .child("records")
        .map_or(0, |r| r.children_named("record").count());
    if records > 1 {
        warn!("{records} records match ISBN '{isbn}' - using the first one");
    }

    let resource = record.descend(&RESOURCE_PATH)?;
    let title = required_text(resource, TITLE)?;

    let creators: Vec<&str> = resource
        .children_named(CREATOR)
        .map(Element::text)
        .filter(|s| !s.is_empty())
        .collect();
    if creators.is_empty() {
        return Err(missing(resource, CREATOR));
    }

    Ok(BookInfo::new(title, creators.join(CREATOR_SEPARATOR), isbn))
}

fn required_text<'a>(parent: &'a Element, name: &str) -> Result<&'a str, Error> {
    parent
        .child(name)
        .map(Element::text)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing(parent, name))
}

fn missing(parent: &Element, name: &str) -> Error {
    Error::new(
        ErrorKind::MalformedResponse,
        format!("no <{name}> text under <{}>", parent.name()),
    )
}

fn diagnostic_message(diagnostics: &Element) -> String {
    let messages: Vec<String> = diagnostics
        .children_named("diagnostic")
        .map(|d| {
            let message = d.child("message").map_or("", Element::text);
            match d.child("details").map(Element::text) {
                Some(details) if !details.is_empty() => format!("{message} ({details})"),
                _ => message.to_owned(),
            }
        })
        .filter(|m| !m.is_empty())
        .collect();

    if messages.is_empty() {
        "no diagnostic message".to_owned()
    } else {
        messages.join("; ")
    }
}
