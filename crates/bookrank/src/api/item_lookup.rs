//! Building, signing and sending `ItemLookup` requests.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{info, trace};

use crate::{
    config::Credentials,
    isbn::{self, NormalizedIsbn},
    sign::{self, SignedRequest},
    Error, ErrorKind,
};

use super::{
    extract::{Extract, Metadata},
    Client,
};

/// Shown in place of a price or sales rank the service did not send.
pub const NONE: &str = "(None)";

const SERVICE: &str = "AWSECommerceService";
const OPERATION: &str = "ItemLookup";
const VERSION: &str = "2010-09-01";
const RESPONSE_GROUP: &str = "SalesRank,OfferSummary";
const RESPONSE_GROUP_WITH_TITLE: &str = "SalesRank,OfferSummary,ItemAttributes";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The price, sales rank and notes found for an ISBN.
///
/// Price and rank are kept as text, [`NONE`] when the service left them out, since turning them
/// into numbers is a matter of presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupResult {
    /// The ISBN-10 that was looked up.
    pub isbn: String,
    /// The lowest offered price in dollars, e.g. `12.50`.
    pub best_price: String,
    /// The sales rank.
    pub sales_rank: String,
    /// The title, only asked for when the ISBN had to be changed, otherwise empty.
    pub notes: String,
}

impl LookupResult {
    fn new(isbn: NormalizedIsbn, metadata: Metadata) -> Self {
        let Metadata {
            sales_rank,
            best_price_cents,
            title,
        } = metadata;

        Self {
            isbn: isbn.into_string(),
            best_price: best_price_cents.map_or_else(|| NONE.to_owned(), format_cents),
            sales_rank: sales_rank.unwrap_or_else(|| NONE.to_owned()),
            notes: title.unwrap_or_default(),
        }
    }
}

fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Builds the `ItemLookup` parameters for `isbn`.
///
/// The title is only asked for when the ISBN was transformed, so the user can confirm the
/// corrected ISBN is the book they meant.
#[must_use]
pub fn lookup_parameters(
    isbn: &NormalizedIsbn,
    access_id: &str,
    timestamp: DateTime<Utc>,
) -> BTreeMap<String, String> {
    let response_group = if isbn.was_transformed() {
        RESPONSE_GROUP_WITH_TITLE
    } else {
        RESPONSE_GROUP
    };

    BTreeMap::from([
        ("AWSAccessKeyId".to_owned(), access_id.to_owned()),
        ("ItemId".to_owned(), isbn.as_str().to_owned()),
        ("Operation".to_owned(), OPERATION.to_owned()),
        ("ResponseGroup".to_owned(), response_group.to_owned()),
        ("Service".to_owned(), SERVICE.to_owned()),
        (
            "Timestamp".to_owned(),
            timestamp.format(TIMESTAMP_FORMAT).to_string(),
        ),
        ("Version".to_owned(), VERSION.to_owned()),
    ])
}

/// Normalizes `raw_isbn` and signs the lookup request for it.
///
/// # Errors
///
/// An [`ErrorKind::InvalidLength`] error is returned when `raw_isbn` is not an ISBN.
pub fn signed_request(
    raw_isbn: &str,
    credentials: &Credentials,
    timestamp: DateTime<Utc>,
) -> Result<(NormalizedIsbn, SignedRequest), Error> {
    let isbn = isbn::normalize(raw_isbn)?;
    let parameters = lookup_parameters(&isbn, credentials.access_id(), timestamp);
    let request = sign::sign(parameters, credentials.secret_key())?;
    Ok((isbn, request))
}

/// Looks up the best price, sales rank and (for transformed ISBNs) title of `raw_isbn`.
///
/// A single request is made, there are no retries.
///
/// # Errors
///
/// An [`ErrorKind::InvalidLength`] error is returned when `raw_isbn` is not an ISBN.
/// An [`ErrorKind::Transport`] error is returned when no response is received or the response
/// status is not 200 - the error holds the URL of the request.
/// Any error from `extractor` is returned as is.
pub fn lookup_metadata<C, X>(
    raw_isbn: &str,
    credentials: &Credentials,
    client: &C,
    extractor: &X,
) -> Result<LookupResult, Error>
where
    C: Client + ?Sized,
    X: Extract + ?Sized,
{
    let (isbn, request) = signed_request(raw_isbn, credentials, Utc::now())?;
    info!("Looking up ISBN '{isbn}'");

    let response = client.fetch(request.url())?;
    if !response.is_ok() {
        return Err(Error::new(
            ErrorKind::Transport,
            format!("Error looking up ISBN. Error code: {}", response.status),
        )
        .with_url(request.url()));
    }

    trace!("Request was successful");

    let metadata = extractor.extract(&response.body)?;
    Ok(LookupResult::new(isbn, metadata))
}
