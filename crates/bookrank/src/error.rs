pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when calling the bookrank functions.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    url: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The cleaned identifier, or its root, has a length no ISBN form uses.
    InvalidLength,
    /// A character other than an ASCII digit was found where a digit is required.
    InvalidDigit,
    /// The request could not be delivered or the service answered with a non-success status.
    Transport,
    /// The request parameters could not be encoded or signed.
    Encoding,
    /// An error caused when parsing/deserialization fails.
    Deserialize,
    /// The service rejected the item identifier.
    InvalidItem,
    /// The configuration could not be determined.
    Config,
    /// The error is associated with an underlying IO error.
    IO,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            url: None,
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
            url: None,
            source: Some(source.into()),
        }
    }

    /// Creates a new [`Error`] with a message describing the error and the error that caused it.
    pub fn with_source<S, E>(kind: ErrorKind, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<DynError>,
    {
        Self {
            kind,
            message: Some(message.into()),
            url: None,
            source: Some(source.into()),
        }
    }

    /// Attaches the URL of the request that produced this error.
    #[must_use]
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the URL of the failed request, if the error came from one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::InvalidLength => f.write_str("Invalid length error")?,
            ErrorKind::InvalidDigit => f.write_str("Invalid digit error")?,
            ErrorKind::Transport => f.write_str("Transport error")?,
            ErrorKind::Encoding => f.write_str("Encoding error")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
            ErrorKind::InvalidItem => f.write_str("Invalid item error")?,
            ErrorKind::Config => f.write_str("Config error")?,
            ErrorKind::IO => f.write_str("IO error")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }

        if let Some(url) = &self.url {
            write!(f, "\nURL: {url}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}
