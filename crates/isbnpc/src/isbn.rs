//! Validation of user entered ISBNs and conversion from ISBN-13 to ISBN-10.

use std::fmt;

use log::trace;

use crate::{Error, ErrorKind};

/// Number of characters in the EAN prefix of an ISBN-13 (`978` or `979`).
const EAN_PREFIX_LEN: usize = 3;
/// Number of characters shared by both forms (group, registrant and publication).
const BODY_LEN: usize = 9;

/// The two fixed lengths an ISBN may have.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IsbnKind {
    /// 10 characters, the last being a modulo-11 check character.
    Isbn10,
    /// 13 characters, starting with a 3-digit EAN prefix.
    Isbn13,
}

/// An ISBN that has passed [`validate`].
///
/// Only the length is guaranteed, the characters themselves are not checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Isbn {
    value: String,
    kind: IsbnKind,
}

impl Isbn {
    /// The trimmed ISBN as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Which of the two lengths this ISBN has.
    #[must_use]
    pub const fn kind(&self) -> IsbnKind {
        self.kind
    }

    /// Returns the ISBN-10 form, converting when this is an ISBN-13.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when an ISBN-13 contains a non-digit in the part carried over to the
    /// ISBN-10, see [`to_isbn10`].
    pub fn to_isbn10(&self) -> Result<String, Error> {
        match self.kind {
            IsbnKind::Isbn10 => Ok(self.value.clone()),
            IsbnKind::Isbn13 => to_isbn10(&self.value),
        }
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Trims `raw` and checks that it is 10 or 13 characters long.
///
/// # Errors
///
/// An `Err` of [`ErrorKind::InvalidLength`] is returned for any other length.
pub fn validate(raw: &str) -> Result<Isbn, Error> {
    let value = raw.trim();
    let kind = match value.chars().count() {
        10 => IsbnKind::Isbn10,
        13 => IsbnKind::Isbn13,
        len => {
            return Err(Error::new(
                ErrorKind::InvalidLength,
                format!("enter 10 or 13 characters, '{value}' has {len}"),
            ))
        }
    };

    trace!("'{value}' accepted as {kind:?}");
    Ok(Isbn {
        value: value.to_owned(),
        kind,
    })
}

/// Converts an ISBN-13 to its ISBN-10 form.
///
/// The EAN prefix and the ISBN-13 check digit are dropped and a new modulo-11 check character is
/// computed over the remaining nine digits.
///
/// # Errors
///
/// An `Err` of [`ErrorKind::InvalidLength`] is returned when `isbn13` is not 13 characters long.
/// An `Err` of [`ErrorKind::InvalidDigit`] is returned when one of the nine carried over
/// characters is not a decimal digit.
pub fn to_isbn10(isbn13: &str) -> Result<String, Error> {
    let len = isbn13.chars().count();
    if len != 13 {
        return Err(Error::new(
            ErrorKind::InvalidLength,
            format!("an ISBN-13 has 13 characters, '{isbn13}' has {len}"),
        ));
    }

    let body: String = isbn13
        .chars()
        .skip(EAN_PREFIX_LEN)
        .take(BODY_LEN)
        .collect();

    let mut digits = [0; BODY_LEN];
    for (i, (slot, c)) in digits.iter_mut().zip(body.chars()).enumerate() {
        *slot = c.to_digit(10).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidDigit,
                format!(
                    "'{c}' at position {} of '{isbn13}' is not a digit",
                    EAN_PREFIX_LEN + i + 1
                ),
            )
        })?;
    }

    let mut isbn10 = body;
    isbn10.push(isbn10_check_digit(&digits));
    trace!("converted '{isbn13}' to '{isbn10}'");
    Ok(isbn10)
}

/// Computes the ISBN-10 check character for the nine leading digits.
///
/// Each digit is weighted from 10 down to 2; the check value is `11 - (sum mod 11)` where 10 is
/// written as `X` and 11 as `0`.
#[must_use]
pub fn isbn10_check_digit(digits: &[u32; BODY_LEN]) -> char {
    let sum: u32 = digits
        .iter()
        .zip((2..=10).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();

    match 11 - sum % 11 {
        10 => 'X',
        11 => '0',
        value => char::from_digit(value, 10).expect("check value is always within 1..=9"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Weighted sum over all ten characters of an ISBN-10, counting `X` as 10.
    fn isbn10_sum(isbn10: &str) -> u32 {
        isbn10
            .chars()
            .zip((1..=10).rev())
            .map(|(c, weight)| {
                let value = if c == 'X' { 10 } else { c.to_digit(10).unwrap() };
                value * weight
            })
            .sum()
    }

    #[test]
    fn validate_rejects_lengths_other_than_10_and_13() {
        for raw in ["", "123", "123456789012", "12345678901234", "   "] {
            let err = validate(raw).unwrap_err();
            assert_eq!(ErrorKind::InvalidLength, err.kind(), "{raw:?}");
        }
    }

    #[test]
    fn validate_accepts_10_and_13_characters() {
        let isbn = validate("1234567890").unwrap();
        assert_eq!(IsbnKind::Isbn10, isbn.kind());
        assert_eq!("1234567890", isbn.as_str());

        let isbn = validate("1234567890123").unwrap();
        assert_eq!(IsbnKind::Isbn13, isbn.kind());
    }

    #[test]
    fn validate_trims_surrounding_whitespace() {
        let isbn = validate("  9784873113685\n").unwrap();
        assert_eq!("9784873113685", isbn.as_str());
    }

    #[test]
    fn validate_only_checks_length() {
        // character content is not checked, only the length
        assert!(validate("abcdefghij").is_ok());
        assert!(validate("978-4-87311").is_err());
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        assert_eq!(
            IsbnKind::Isbn10,
            validate("１２３４５６７８９０").unwrap().kind()
        );
    }

    #[test]
    fn known_conversions() {
        assert_eq!("4873113687", to_isbn10("9784873113685").unwrap());
        assert_eq!("0306406152", to_isbn10("9780306406157").unwrap());
        assert_eq!("4062639246", to_isbn10("9784062639242").unwrap());
        assert_eq!("4101010013", to_isbn10("9784101010014").unwrap());
    }

    #[test]
    fn check_value_of_ten_is_written_as_x() {
        assert_eq!("400000008X", to_isbn10("9784000000080").unwrap());
    }

    #[test]
    fn check_value_of_eleven_is_written_as_zero() {
        assert_eq!("4000000020", to_isbn10("9784000000020").unwrap());
    }

    #[test]
    fn converted_isbns_satisfy_the_isbn10_checksum() {
        let mut seed: u64 = 0x2545_f491;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let isbn13 = format!("978{:010}", seed % 10_000_000_000);

            let isbn10 = to_isbn10(&isbn13).unwrap();

            assert_eq!(10, isbn10.len());
            assert_eq!(&isbn13[3..12], &isbn10[..9]);
            assert_eq!(0, isbn10_sum(&isbn10) % 11, "{isbn13} -> {isbn10}");
        }
    }

    #[test]
    fn non_digit_in_body_is_an_error() {
        let err = to_isbn10("978487311A685").unwrap_err();
        assert_eq!(ErrorKind::InvalidDigit, err.kind());
        assert!(err.to_string().contains("position 10"), "{err}");
    }

    #[test]
    fn prefix_and_old_check_digit_are_not_inspected() {
        assert_eq!("4873113687", to_isbn10("ABC487311368Z").unwrap());
    }

    #[test]
    fn to_isbn10_requires_13_characters() {
        let err = to_isbn10("4873113687").unwrap_err();
        assert_eq!(ErrorKind::InvalidLength, err.kind());
    }

    #[test]
    fn isbn10_passes_through_unchanged() {
        let isbn = validate("4873113687").unwrap();
        assert_eq!("4873113687", isbn.to_isbn10().unwrap());

        let isbn = validate("9784873113685").unwrap();
        assert_eq!("4873113687", isbn.to_isbn10().unwrap());
    }
}
