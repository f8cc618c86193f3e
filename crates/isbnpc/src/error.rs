pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when validating, converting or looking up an ISBN.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The ISBN is not 10 or 13 characters long once trimmed.
    InvalidLength,
    /// A character that must be a decimal digit is not one.
    InvalidDigit,
    /// The catalog could not be reached or did not answer with a success status.
    Network,
    /// The catalog answered but the expected fields are absent or unreadable.
    MalformedResponse,
    /// The configuration could not be read or holds an invalid value.
    Config,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Wraps an existing error as the source of [`Error`] with a message giving context.
    pub fn wrap_with<E, S>(kind: ErrorKind, message: S, source: E) -> Self
    where
        E: Into<DynError>,
        S: Into<String>,
    {
        Self {
            kind,
            message: Some(message.into()),
            source: Some(source.into()),
        }
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns true when the error was raised while validating or converting user input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidLength | ErrorKind::InvalidDigit)
    }

    /// Returns true when the error was raised by a catalog lookup.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(self.kind, ErrorKind::Network | ErrorKind::MalformedResponse)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::InvalidLength => f.write_str("Invalid ISBN length")?,
            ErrorKind::InvalidDigit => f.write_str("Invalid ISBN digit")?,
            ErrorKind::Network => f.write_str("Network error")?,
            ErrorKind::MalformedResponse => f.write_str("Malformed response")?,
            ErrorKind::Config => f.write_str("Config error")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}
