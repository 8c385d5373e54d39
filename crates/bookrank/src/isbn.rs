//! ISBN cleaning, check digit computation and conversion to ISBN-10.
//!
//! Three input forms are accepted once every non-digit has been stripped:
//!
//! - 9 digits: an old style SBN, which becomes an ISBN-10 by prefixing `0`.
//! - 10 characters: an ISBN-10, whose last character may be `X` for the value ten.
//! - 13 digits: an ISBN-13, whose three digit EAN prefix is dropped.
//!
//! In every case the check digit is recomputed, so an identifier with a wrong check digit comes
//! back corrected and flagged as transformed.

use std::fmt;

use log::{trace, warn};

use crate::{Error, ErrorKind};

/// The check character representing the value ten in an ISBN-10.
pub const CHECK_TEN: char = 'X';

const EAN_BOOKLAND_PREFIX: &str = "978";

/// An ISBN-10 produced by [`normalize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedIsbn {
    isbn: String,
    transformed: bool,
}

impl NormalizedIsbn {
    /// The canonical ISBN-10.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.isbn
    }

    /// Whether the canonical form differs from the cleaned input, ignoring case.
    ///
    /// A transformed identifier is worth confirming against a human readable title.
    #[must_use]
    pub const fn was_transformed(&self) -> bool {
        self.transformed
    }

    /// Consumes `self` returning the canonical ISBN-10.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // can't be const
    pub fn into_string(self) -> String {
        self.isbn
    }
}

impl fmt::Display for NormalizedIsbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.isbn)
    }
}

/// The outcome of checking an identifier with [`validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    /// The identifier with every non-digit removed.
    pub cleaned: String,
    /// The identifier with its check digit fixed, when the supplied one was wrong.
    pub corrected: Option<String>,
    /// The ISBN-10 form, when the identifier was not already an ISBN-10.
    pub isbn10: Option<String>,
}

/// Removes every character that is not an ASCII digit.
///
/// A trailing `x` or `X` in `raw` is kept (as given) since only the last position of an ISBN-10
/// may hold the check character for ten.
///
/// ```
/// assert_eq!("080442957X", bookrank::isbn::clean("0-8044-2957-X"));
/// assert_eq!("1573980137", bookrank::isbn::clean("ISBN 1-57398-013-7"));
/// ```
#[must_use]
pub fn clean(raw: &str) -> String {
    let mut cleaned: String = raw.chars().filter(char::is_ascii_digit).collect();
    if let Some(last) = raw.chars().last().filter(|c| c.eq_ignore_ascii_case(&CHECK_TEN)) {
        cleaned.push(last);
    }
    cleaned
}

/// Computes the check digit of an ISBN root.
///
/// A 9 digit root is an ISBN-10 without its check digit and a 12 digit root is an ISBN-13
/// without its check digit.
///
/// # Errors
///
/// An [`ErrorKind::InvalidLength`] error is returned when the root is not 9 or 12 characters.
/// An [`ErrorKind::InvalidDigit`] error is returned when the root holds anything but digits.
pub fn check_digit(root: &str) -> Result<char, Error> {
    let digits = root
        .chars()
        .map(|c| {
            c.to_digit(10).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidDigit,
                    format!("'{c}' is not a digit in ISBN root '{root}'"),
                )
            })
        })
        .collect::<Result<Vec<u32>, Error>>()?;

    match digits.len() {
        9 => {
            let sum = digits.iter().zip(1_u32..).map(|(d, w)| d * w).sum::<u32>() % 11;
            // only a sum of ten has no single digit
            Ok(char::from_digit(sum, 10).unwrap_or(CHECK_TEN))
        }
        12 => {
            let sum = digits
                .iter()
                .zip([1_u32, 3].iter().cycle())
                .map(|(d, w)| d * w)
                .sum::<u32>();
            Ok(char::from_digit((10 - sum % 10) % 10, 10).unwrap_or('0'))
        }
        len => Err(Error::new(
            ErrorKind::InvalidLength,
            format!("Invalid ISBN root length {len}: '{root}'"),
        )),
    }
}

/// Normalizes an identifier to an ISBN-10 with a recomputed check digit.
///
/// # Errors
///
/// An [`ErrorKind::InvalidLength`] error is returned when the cleaned identifier is not 9, 10 or
/// 13 characters long.
///
/// # Examples
///
/// ```
/// let isbn = bookrank::isbn::normalize("978-0-306-40615-7").unwrap();
/// assert_eq!("0306406152", isbn.as_str());
/// assert!(isbn.was_transformed());
/// ```
pub fn normalize(raw: &str) -> Result<NormalizedIsbn, Error> {
    let cleaned = clean(raw);
    trace!("Normalizing ISBN '{cleaned}'");

    // `cleaned` only holds ASCII so byte slicing is safe
    let root = match cleaned.len() {
        // An SBN is an ISBN-10 missing its leading zero.
        9 => format!("0{}", &cleaned[..8]),
        10 => cleaned[..9].to_owned(),
        13 => {
            if !cleaned.starts_with(EAN_BOOKLAND_PREFIX) {
                warn!("ISBN-13 '{cleaned}' has no ISBN-10 equivalent - converting it anyway");
            }
            cleaned[3..12].to_owned()
        }
        len => {
            return Err(Error::new(
                ErrorKind::InvalidLength,
                format!("Invalid ISBN (wrong length {len}): '{cleaned}'"),
            ))
        }
    };

    let mut isbn = root;
    isbn.push(check_digit(&isbn)?);
    let transformed = !isbn.eq_ignore_ascii_case(&cleaned);

    if transformed {
        trace!("ISBN '{cleaned}' normalized to '{isbn}'");
    }

    Ok(NormalizedIsbn { isbn, transformed })
}

/// Checks the check digit of an ISBN-10 or ISBN-13 and reports the ISBN-10 form of an ISBN-13.
///
/// # Errors
///
/// An [`ErrorKind::InvalidLength`] error is returned when the cleaned identifier is not 10 or 13
/// characters long.
pub fn validate(raw: &str) -> Result<Validation, Error> {
    let cleaned = clean(raw);
    if !matches!(cleaned.len(), 10 | 13) {
        return Err(Error::new(
            ErrorKind::InvalidLength,
            format!(
                "Only ISBN-10 and ISBN-13 can be validated (wrong length {}): '{cleaned}'",
                cleaned.len()
            ),
        ));
    }

    let (root, supplied) = cleaned.split_at(cleaned.len() - 1);
    let check = check_digit(root)?;
    let corrected = (!supplied.eq_ignore_ascii_case(&check.to_string()))
        .then(|| format!("{root}{check}"));

    let isbn10 = if cleaned.len() == 10 {
        None
    } else {
        Some(normalize(&cleaned)?.into_string())
    };

    Ok(Validation {
        cleaned,
        corrected,
        isbn10,
    })
}
