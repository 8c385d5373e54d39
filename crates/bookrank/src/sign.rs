//! Query string canonicalization and HMAC-SHA256 request signing.
//!
//! The string to sign is:
//!
//! ```text
//! GET\n
//! webservices.amazon.com\n
//! /onca/xml\n
//! CanonicalQueryString
//! ```
//!
//! Where `CanonicalQueryString` is every `key=value` pair percent-encoded, sorted as whole strings
//! and joined with `&`. The request carries `Signature = Base64(HMAC-SHA256(SecretKey,
//! StringToSign))` as one more query parameter, which is never part of what it signs.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;

use crate::{Error, ErrorKind};

type HmacSha256 = Hmac<Sha256>;

/// The endpoint every signed request is sent to.
pub const ROOT_URL: &str = "http://webservices.amazon.com/onca/xml";
/// The host line of the string to sign.
pub const HOST: &str = "webservices.amazon.com";
/// The path line of the string to sign.
pub const PATH: &str = "/onca/xml";
/// The name of the query parameter holding the signature.
pub const SIGNATURE: &str = "Signature";

/// Everything except RFC 3986 unreserved characters (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) is
/// percent-encoded, so a space is always `%20` and never `+`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A request whose parameters have been canonicalized and signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    parameters: BTreeMap<String, String>,
    canonical_query: String,
    string_to_sign: String,
    signature: String,
    url: String,
}

impl SignedRequest {
    /// The parameters that were signed, without the signature itself.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// The sorted, percent-encoded query string covered by the signature.
    #[must_use]
    pub fn canonical_query(&self) -> &str {
        &self.canonical_query
    }

    /// The exact bytes given to HMAC-SHA256.
    #[must_use]
    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }

    /// The base64 encoded signature.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The complete URL, signature included.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Percent-encodes a query string key or value.
///
/// ```
/// assert_eq!("SalesRank%2COfferSummary", bookrank::sign::encode("SalesRank,OfferSummary"));
/// assert_eq!("a%20b~c", bookrank::sign::encode("a b~c"));
/// ```
#[must_use]
pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).to_string()
}

/// Builds the canonical query string: encoded `key=value` pairs sorted lexicographically and
/// joined with `&`.
///
/// Pairs are sorted as whole strings rather than by key, so `a-b=..` sorts before `a=..` (`-` is
/// lower than `=`).
#[must_use]
pub fn canonical_query_string(parameters: &BTreeMap<String, String>) -> String {
    let mut pairs = encode_pairs(parameters);
    pairs.sort_unstable();
    pairs.join("&")
}

/// Builds the string to sign for a canonical query string.
#[must_use]
pub fn string_to_sign(canonical_query: &str) -> String {
    format!("GET\n{HOST}\n{PATH}\n{canonical_query}")
}

/// Signs `parameters` with `secret_key` and assembles the request URL.
///
/// # Errors
///
/// An [`ErrorKind::Encoding`] error is returned when `parameters` already holds a `Signature`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// let parameters = BTreeMap::from([("ItemId".to_owned(), "1573980137".to_owned())]);
/// let request = bookrank::sign::sign(parameters, "secret").unwrap();
///
/// assert_eq!("ItemId=1573980137", request.canonical_query());
/// assert!(request.url().contains("&Signature="));
/// ```
pub fn sign(parameters: BTreeMap<String, String>, secret_key: &str) -> Result<SignedRequest, Error> {
    if parameters.contains_key(SIGNATURE) {
        return Err(Error::new(
            ErrorKind::Encoding,
            format!("'{SIGNATURE}' is added when signing and cannot be signed itself"),
        ));
    }

    let canonical_query = canonical_query_string(&parameters);
    let string_to_sign = string_to_sign(&canonical_query);
    debug!("Built string to sign {string_to_sign:?}");

    let signature = compute_signature(secret_key, &string_to_sign)?;

    let mut signed = parameters.clone();
    signed.insert(SIGNATURE.to_owned(), signature.clone());
    let url = format!("{ROOT_URL}?{}", encode_pairs(&signed).join("&"));

    Ok(SignedRequest {
        parameters,
        canonical_query,
        string_to_sign,
        signature,
        url,
    })
}

fn compute_signature(secret_key: &str, string_to_sign: &str) -> Result<String, Error> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|_| Error::new(ErrorKind::Encoding, "Secret key rejected by HMAC-SHA256"))?;
    mac.update(string_to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

fn encode_pairs(parameters: &BTreeMap<String, String>) -> Vec<String> {
    parameters
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect()
}
