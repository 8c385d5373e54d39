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

//! # bookrank
//!
//! bookrank is a library which looks up the best price, sales rank and title of a book by ISBN
//! using the Product Advertising API.
//!
//! ISBNs are normalized locally before any request is made, see [`isbn`], and each request is
//! signed with HMAC-SHA256, see [`sign`]. The [`api`] module exposes the lookup itself with the
//! HTTP client and response extraction as replaceable collaborators.

pub mod api;
pub mod config;
mod error;
pub mod isbn;
pub mod sign;

pub use api::item_lookup::LookupResult;
pub use error::{Error, ErrorKind};

use api::extract::XmlExtractor;
use config::Credentials;
use log::trace;
use sign::SignedRequest;

type Client = reqwest::blocking::Client;

/// Look up the best price, sales rank and title of `isbn` using the default HTTP client.
///
/// The title is only requested when the ISBN had to be corrected or converted to an ISBN-10.
///
/// # Errors
///
/// An `Err` is returned when `isbn` is not a 9, 10 or 13 digit ISBN.
/// An `Err` is returned when the request fails or the response status is not 200.
/// An `Err` is returned when the response cannot be parsed or the service rejects the ISBN.
#[inline]
pub fn lookup_isbn(isbn: &str, credentials: &Credentials) -> Result<LookupResult, Error> {
    trace!("Look up ISBN '{isbn}'");
    api::item_lookup::lookup_metadata(isbn, credentials, &Client::new(), &XmlExtractor)
}

/// Sign the request that [`lookup_isbn`] would send for `isbn` without sending it.
///
/// # Errors
///
/// An `Err` is returned when `isbn` is not a 9, 10 or 13 digit ISBN.
#[inline]
pub fn signed_lookup_request(isbn: &str, credentials: &Credentials) -> Result<SignedRequest, Error> {
    trace!("Sign lookup request for ISBN '{isbn}'");
    api::item_lookup::signed_request(isbn, credentials, chrono::Utc::now()).map(|(_, req)| req)
}
