//! Item lookups against the Product Advertising API and the collaborators they rely on.

pub mod extract;
pub mod item_lookup;

use crate::{Error, ErrorKind};

/// The status and body of a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl Response {
    /// The only status a lookup accepts.
    pub const OK: u16 = 200;

    /// Creates a successful [`Response`] with `body`.
    pub fn ok<S: Into<String>>(body: S) -> Self {
        Self {
            status: Self::OK,
            body: body.into(),
        }
    }

    /// Whether the status is [`Response::OK`].
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

/// Sends a GET request for a signed URL.
///
/// Only a failure to get any response is an error, a non-success status is a valid [`Response`].
pub trait Client {
    /// Fetches `url` returning the status and body of the response.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Transport`] error is returned when no response is received.
    fn fetch(&self, url: &str) -> Result<Response, Error>;
}

impl Client for reqwest::blocking::Client {
    fn fetch(&self, url: &str) -> Result<Response, Error> {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::Transport, e).with_url(url))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| Error::wrap(ErrorKind::Transport, e).with_url(url))?;

        Ok(Response { status, body })
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_response_producer, MockClient, NetworkErrorProducer, Producer, URL_SINK,
};
