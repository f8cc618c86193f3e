use isbnpc::{config::LinkConfig, BookInfo, Catalog, Client, Isbn};
use log::{trace, warn};

use crate::window::{Launcher, Window};

/// What happened to one of the two pages of a submission.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    Opened(String),
    Disabled,
    Failed(String),
}

impl std::fmt::Display for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatch::Opened(url) => write!(f, "opened {url}"),
            Dispatch::Disabled => f.write_str("disabled"),
            Dispatch::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// The outcome of a valid ISBN submission.
#[derive(Debug)]
pub struct Submission {
    pub isbn: Isbn,
    pub retailer: Dispatch,
    pub book: Result<BookInfo, isbnpc::Error>,
    pub marketplace: Dispatch,
}

impl Submission {
    /// The first failure of the submission, if any.
    pub fn failure(&self) -> Option<String> {
        if let Dispatch::Failed(message) = &self.retailer {
            return Some(message.clone());
        }
        match (&self.book, &self.marketplace) {
            (Err(err), _) => Some(err.to_string()),
            (_, Dispatch::Failed(message)) => Some(message.clone()),
            _ => None,
        }
    }
}

/// Takes ISBNs from the user and drives the retailer and marketplace windows.
pub struct App<C: Client, L: Launcher> {
    catalog: Catalog<C>,
    links: LinkConfig,
    pub retailer: Window<L>,
    pub marketplace: Window<L>,
}

impl<C: Client, L: Launcher> App<C, L> {
    pub const fn new(
        catalog: Catalog<C>,
        links: LinkConfig,
        retailer: Window<L>,
        marketplace: Window<L>,
    ) -> Self {
        Self {
            catalog,
            links,
            retailer,
            marketplace,
        }
    }

    /// Validates `raw` and dispatches both pages.
    ///
    /// Only a validation failure is returned as an `Err`; each page reports its own outcome in the
    /// [`Submission`] and a failure of one never stops the other.
    pub fn submit(&mut self, raw: &str) -> Result<Submission, isbnpc::Error> {
        let isbn = isbnpc::validate(raw)?;
        trace!("Dispatching pages for ISBN '{isbn}'");

        let retailer = self.open_retailer(&isbn);

        // the catalog is always queried with the ISBN as entered
        let book = self.catalog.lookup(isbn.as_str());
        let marketplace = match &book {
            Ok(book) => self.open_marketplace(book),
            Err(err) => {
                warn!("Lookup of '{isbn}' failed: {err}");
                if self.marketplace.enabled() {
                    Dispatch::Failed(err.to_string())
                } else {
                    Dispatch::Disabled
                }
            }
        };

        Ok(Submission {
            isbn,
            retailer,
            book,
            marketplace,
        })
    }

    fn open_retailer(&mut self, isbn: &Isbn) -> Dispatch {
        if !self.retailer.enabled() {
            return Dispatch::Disabled;
        }
        let url = match self.links.retailer_link(isbn) {
            Ok(url) => url,
            Err(err) => return Dispatch::Failed(err.to_string()),
        };
        open(&mut self.retailer, url)
    }

    fn open_marketplace(&mut self, book: &BookInfo) -> Dispatch {
        if !self.marketplace.enabled() {
            return Dispatch::Disabled;
        }
        let url = match self.links.marketplace_link(book) {
            Ok(url) => url,
            Err(err) => return Dispatch::Failed(err.to_string()),
        };
        open(&mut self.marketplace, url)
    }
}

fn open<L: Launcher>(window: &mut Window<L>, url: String) -> Dispatch {
    match window.open(&url) {
        Ok(true) => Dispatch::Opened(url),
        Ok(false) => Dispatch::Disabled,
        Err(err) => Dispatch::Failed(format!("{err:#}")),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use isbnpc::{config::LookupConfig, Error, ErrorKind};

    use super::*;
    use crate::window::tests::Recorder;

    /// Answers with a fixed body, or fails when there is none, and counts the requests.
    pub(crate) struct StubClient {
        body: Option<&'static str>,
        requests: Cell<usize>,
    }

    impl StubClient {
        const fn new(body: Option<&'static str>) -> Self {
            Self {
                body,
                requests: Cell::new(0),
            }
        }
    }

    impl Client for StubClient {
        fn get_text(&self, _url: &str) -> Result<String, Error> {
            self.requests.set(self.requests.get() + 1);
            self.body
                .map(str::to_owned)
                .ok_or_else(|| Error::new(ErrorKind::Network, "connection refused"))
        }
    }

    pub(crate) const BODY: &str = "<searchRetrieveResponse><numberOfRecords>1</numberOfRecords><records><record>\
        <recordData><rdf:RDF><dcndl:BibResource>\
        <dcterms:title>Example Title</dcterms:title><dc:creator>Example Author</dc:creator>\
        </dcndl:BibResource></rdf:RDF></recordData></record></records></searchRetrieveResponse>";

    pub(crate) fn app(
        body: Option<&'static str>,
        retailer: bool,
        marketplace: bool,
    ) -> (App<StubClient, Recorder>, Recorder) {
        let recorder = Recorder::default();
        let catalog = Catalog::with_client(StubClient::new(body), LookupConfig::default());
        let app = App::new(
            catalog,
            LinkConfig::default(),
            Window::new("retailer", recorder.clone(), retailer),
            Window::new("marketplace", recorder.clone(), marketplace),
        );
        (app, recorder)
    }

    #[test]
    fn both_pages_are_opened() {
        let (mut app, recorder) = app(Some(BODY), true, true);

        let submission = app.submit(" 9784873113685 ").unwrap();

        assert_eq!(
            Dispatch::Opened("https://www.amazon.co.jp/dp/4873113687".to_owned()),
            submission.retailer
        );
        assert_eq!(
            Dispatch::Opened("https://jp.mercari.com/search?keyword=Example+Title".to_owned()),
            submission.marketplace
        );
        assert_eq!("9784873113685", submission.book.unwrap().isbn());
        assert_eq!(2, recorder.0.borrow().len());
        assert!(app.retailer.current().is_some());
    }

    #[test]
    fn invalid_length_dispatches_nothing() {
        let (mut app, recorder) = app(Some(BODY), true, true);

        let err = app.submit("123").unwrap_err();

        assert_eq!(ErrorKind::InvalidLength, err.kind());
        assert!(recorder.0.borrow().is_empty());
        assert_eq!(0, app.catalog.client().requests.get());
    }

    #[test]
    fn lookup_failure_still_opens_retailer() {
        let (mut app, recorder) = app(None, true, true);

        let submission = app.submit("4873113687").unwrap();

        assert_eq!(
            Dispatch::Opened("https://www.amazon.co.jp/dp/4873113687".to_owned()),
            submission.retailer
        );
        assert!(matches!(submission.marketplace, Dispatch::Failed(_)));
        assert!(submission.failure().unwrap().contains("connection refused"));
        assert_eq!(1, recorder.0.borrow().len());
    }

    #[test]
    fn retailer_failure_still_looks_up() {
        let (mut app, _) = app(Some(BODY), true, true);

        let submission = app.submit("978ABCDEFGHIJ").unwrap();

        assert!(matches!(submission.retailer, Dispatch::Failed(_)));
        assert!(submission.book.is_ok());
        assert!(matches!(submission.marketplace, Dispatch::Opened(_)));
    }

    #[test]
    fn disabled_windows_are_skipped_but_lookup_runs() {
        let (mut app, recorder) = app(Some(BODY), false, false);

        let submission = app.submit("9784873113685").unwrap();

        assert_eq!(Dispatch::Disabled, submission.retailer);
        assert_eq!(Dispatch::Disabled, submission.marketplace);
        assert!(submission.book.is_ok());
        assert!(submission.failure().is_none());
        assert!(recorder.0.borrow().is_empty());
        assert_eq!(1, app.catalog.client().requests.get());
    }

    #[test]
    fn gates_are_read_at_dispatch_time() {
        let (mut app, recorder) = app(Some(BODY), true, true);

        app.marketplace.toggle();
        let submission = app.submit("9784873113685").unwrap();

        assert!(matches!(submission.retailer, Dispatch::Opened(_)));
        assert_eq!(Dispatch::Disabled, submission.marketplace);
        assert_eq!(1, recorder.0.borrow().len());
    }
}
