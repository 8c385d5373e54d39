//! Pulling the sales rank, best price and title out of an `ItemLookup` response.

use std::borrow::Cow;

use log::{trace, warn};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;

use crate::{Error, ErrorKind};

const INVALID_ITEM_ID: &str = "is not a valid value for ItemId";

/// The fields of interest in a lookup response, each of which the service may leave out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    /// The sales rank as sent by the service.
    pub sales_rank: Option<String>,
    /// The lowest of the offered prices, in cents.
    pub best_price_cents: Option<u64>,
    /// The title of the item.
    pub title: Option<String>,
}

/// Turns a response body into [`Metadata`].
pub trait Extract {
    /// Extracts [`Metadata`] from `body`.
    ///
    /// # Errors
    ///
    /// When the body cannot be understood or reports that the item does not exist.
    fn extract(&self, body: &str) -> Result<Metadata, Error>;
}

impl<F> Extract for F
where
    F: Fn(&str) -> Result<Metadata, Error>,
{
    fn extract(&self, body: &str) -> Result<Metadata, Error> {
        self(body)
    }
}

/// Reads [`Metadata`] from the XML body of an `ItemLookup` response.
///
/// - the sales rank is the first `SalesRank` element,
/// - the best price is the lowest `Amount` inside `OfferSummary`,
/// - the title is the first `Title` inside `ItemAttributes`.
///
/// A service error saying the `ItemId` is not valid is returned as an
/// [`ErrorKind::InvalidItem`] error.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlExtractor;

impl Extract for XmlExtractor {
    fn extract(&self, body: &str) -> Result<Metadata, Error> {
        let mut reader = Reader::from_str(body);
        let mut fields = Fields::default();
        let mut path: Vec<String> = Vec::new();
        let mut text = String::new();

        loop {
            match reader
                .read_event()
                .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?
            {
                Event::Start(e) => {
                    path.push(element_name(e.local_name().as_ref())?);
                    text.clear();
                }
                Event::Text(e) => {
                    let decoded = e.decode().map_err(parse_error)?;
                    text.push_str(&unescape(&decoded).map_err(parse_error)?);
                }
                Event::CData(e) => text.push_str(&e.decode().map_err(parse_error)?),
                Event::GeneralRef(e) => text.push_str(&resolve_reference(&e)?),
                Event::End(_) => {
                    if let Some(name) = path.pop() {
                        let value = std::mem::take(&mut text);
                        fields.collect(&name, &path, value.trim())?;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        fields.finish()
    }
}

#[derive(Default)]
struct Fields {
    metadata: Metadata,
    amounts: Vec<u64>,
    service_errors: Vec<String>,
}

impl Fields {
    fn collect(&mut self, name: &str, parents: &[String], value: &str) -> Result<(), Error> {
        let within = |parent: &str| parents.iter().any(|p| p == parent);

        match name {
            "SalesRank" if self.metadata.sales_rank.is_none() => {
                self.metadata.sales_rank = Some(value.to_owned());
            }
            "Amount" if within("OfferSummary") => {
                let cents = value.parse::<u64>().map_err(|e| {
                    Error::with_source(
                        ErrorKind::Deserialize,
                        format!("Offer amount '{value}' is not a whole number of cents"),
                        e,
                    )
                })?;
                self.amounts.push(cents);
            }
            "Title" if within("ItemAttributes") && self.metadata.title.is_none() => {
                self.metadata.title = Some(value.to_owned());
            }
            "Message" if within("Error") => self.service_errors.push(value.to_owned()),
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Metadata, Error> {
        let Self {
            mut metadata,
            amounts,
            service_errors,
        } = self;

        for message in service_errors {
            if message.contains(INVALID_ITEM_ID) {
                return Err(Error::new(ErrorKind::InvalidItem, message));
            }
            warn!("Service reported an error: {message}");
        }

        metadata.best_price_cents = amounts.into_iter().min();
        trace!("Extracted {metadata:?}");
        Ok(metadata)
    }
}

fn element_name(name: &[u8]) -> Result<String, Error> {
    std::str::from_utf8(name)
        .map(str::to_owned)
        .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<Cow<'static, str>, Error> {
    let name = reference.decode().map_err(parse_error)?;
    if let Some(resolved) = resolve_predefined_entity(&name) {
        return Ok(Cow::Borrowed(resolved));
    }
    match reference.resolve_char_ref().map_err(parse_error)? {
        Some(c) => Ok(Cow::Owned(c.to_string())),
        None => Err(Error::new(
            ErrorKind::Deserialize,
            format!("Unknown entity '&{name};'"),
        )),
    }
}

fn parse_error<E: std::fmt::Display>(e: E) -> Error {
    Error::new(ErrorKind::Deserialize, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(body: &str) -> Result<Metadata, Error> {
        XmlExtractor.extract(body)
    }

    #[test]
    fn full_response_is_extracted() {
        let body = include_str!("../../../../tests/data/item_lookup_attributes.xml");
        let metadata = extract(body).unwrap();

        assert_eq!(Some("12345".to_owned()), metadata.sales_rank);
        assert_eq!(Some(1250), metadata.best_price_cents);
        assert_eq!(
            Some("Programming Perl & Friends".to_owned()),
            metadata.title
        );
    }

    #[test]
    fn missing_fields_are_none() {
        let body = include_str!("../../../../tests/data/item_lookup_empty.xml");
        assert_eq!(Metadata::default(), extract(body).unwrap());
    }

    #[test]
    fn only_offer_summary_amounts_count() {
        let body = "<Item><Offers><Offer><Amount>1</Amount></Offer></Offers>\
                    <OfferSummary><LowestNewPrice><Amount>2599</Amount></LowestNewPrice>\
                    <LowestUsedPrice><Amount>899</Amount></LowestUsedPrice></OfferSummary></Item>";
        assert_eq!(Some(899), extract(body).unwrap().best_price_cents);
    }

    #[test]
    fn title_outside_item_attributes_is_ignored() {
        let body = "<Item><Title>Not this</Title><SalesRank>7</SalesRank></Item>";
        let metadata = extract(body).unwrap();
        assert_eq!(None, metadata.title);
        assert_eq!(Some("7".to_owned()), metadata.sales_rank);
    }

    #[test]
    fn first_sales_rank_wins() {
        let body = "<Items><Item><SalesRank>1</SalesRank></Item>\
                    <Item><SalesRank>2</SalesRank></Item></Items>";
        assert_eq!(Some("1".to_owned()), extract(body).unwrap().sales_rank);
    }

    #[test]
    fn invalid_item_id_is_an_error() {
        let body = include_str!("../../../../tests/data/item_lookup_invalid.xml");
        assert_eq!(ErrorKind::InvalidItem, extract(body).unwrap_err().kind());
    }

    #[test]
    fn non_numeric_amount_is_an_error() {
        let body = "<OfferSummary><Amount>12.50</Amount></OfferSummary>";
        assert_eq!(ErrorKind::Deserialize, extract(body).unwrap_err().kind());
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let body = "<ItemLookupResponse><SalesRank>1</Items>";
        assert_eq!(ErrorKind::Deserialize, extract(body).unwrap_err().kind());
    }

    #[test]
    fn closures_extract() {
        let stub = |_: &str| -> Result<Metadata, Error> {
            Ok(Metadata {
                sales_rank: Some("3".to_owned()),
                ..Metadata::default()
            })
        };
        assert_eq!(Some("3".to_owned()), stub.extract("").unwrap().sales_rank);
    }
}
