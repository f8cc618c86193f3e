use serde::Serialize;

/// The fields taken from a catalog record.
///
/// Every field is text exactly as it appeared in the response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookInfo {
    title: String,
    creator: String,
    isbn: String,
}

impl BookInfo {
    /// Creates a new [`BookInfo`].
    pub fn new<T, C, I>(title: T, creator: C, isbn: I) -> Self
    where
        T: Into<String>,
        C: Into<String>,
        I: Into<String>,
    {
        Self {
            title: title.into(),
            creator: creator.into(),
            isbn: isbn.into(),
        }
    }

    /// The title of the book.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The creator (author, editor, translator..) of the book.
    #[must_use]
    pub fn creator(&self) -> &str {
        &self.creator
    }

    /// The ISBN the lookup was made with.
    #[must_use]
    pub fn isbn(&self) -> &str {
        &self.isbn
    }
}
