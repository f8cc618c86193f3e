use std::time::Duration;

use log::trace;

pub(crate) mod ndl;

use crate::{Error, ErrorKind};

/// The transport used to reach the catalog.
///
/// A single call is a single request; implementations must not retry.
pub trait Client {
    /// Performs a GET request on `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// An `Err` of [`ErrorKind::Network`] is returned when the request fails or the response
    /// status is not a success. An `Err` of [`ErrorKind::MalformedResponse`] is returned when
    /// the body cannot be read as text or is empty.
    fn get_text(&self, url: &str) -> Result<String, Error>;
}

impl Client for reqwest::blocking::Client {
    fn get_text(&self, url: &str) -> Result<String, Error> {
        let resp = self
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::wrap(ErrorKind::Network, e))?;
        trace!("Response status {}", resp.status());

        let text = resp
            .text()
            .map_err(|e| Error::wrap(ErrorKind::MalformedResponse, e))?;

        if text.trim().is_empty() {
            Err(Error::new(
                ErrorKind::MalformedResponse,
                "Response text is empty",
            ))
        } else {
            Ok(text)
        }
    }
}

/// Builds the blocking reqwest client with an explicit request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, Error> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::wrap_with(ErrorKind::Config, "cannot build the HTTP client", e))
}

#[cfg(test)]
pub(crate) use test::{assert_url, MockClient};

#[cfg(test)]
mod test {

    use std::cell::RefCell;

    use super::*;

    /// Asserts that the expected URL is the same as the last one requested from a [`MockClient`].
    macro_rules! assert_url {
        ($client: expr, $expected: expr) => {
            assert_url!($client, $expected, "");
        };
        ($client: expr, $expected: expr, $($arg: tt)+) => {
            let url = $client.last_url().unwrap_or_default();
            assert_eq!($expected, url, $($arg)+);
        };
    }

    /// A fake transport answering every request with the same canned body or error.
    pub(crate) struct MockClient {
        response: Result<String, ErrorKind>,
        urls: RefCell<Vec<String>>,
    }

    impl MockClient {
        pub(crate) fn text<S: Into<String>>(body: S) -> Self {
            Self {
                response: Ok(body.into()),
                urls: RefCell::default(),
            }
        }

        pub(crate) fn failing(kind: ErrorKind) -> Self {
            Self {
                response: Err(kind),
                urls: RefCell::default(),
            }
        }

        pub(crate) fn last_url(&self) -> Option<String> {
            self.urls.borrow().last().cloned()
        }

        pub(crate) fn requests(&self) -> usize {
            self.urls.borrow().len()
        }
    }

    impl Client for MockClient {
        fn get_text(&self, url: &str) -> Result<String, Error> {
            self.urls.borrow_mut().push(url.to_owned());
            match &self.response {
                Ok(body) => Ok(body.clone()),
                Err(kind) => Err(Error::new(*kind, "mock transport failure")),
            }
        }
    }

    pub(crate) use assert_url;
}
