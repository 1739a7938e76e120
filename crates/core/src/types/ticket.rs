//! Ticket identifiers issued on registration.
//!
//! A ticket id is `uppercase(first 4 chars of the event id + "-" + token)`,
//! where the token is 8 random alphanumeric characters. Generating the token
//! needs randomness, which lives in the server; this module only assembles
//! and validates ticket ids.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building or parsing a [`TicketId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketIdError {
    /// No `-` separating the event prefix from the token.
    #[error("ticket id must contain a '-' separator")]
    MissingSeparator,
    /// The event prefix is empty or longer than four characters.
    #[error("ticket prefix must be 1 to {max} characters")]
    BadPrefix {
        /// Maximum prefix length.
        max: usize,
    },
    /// The token is not exactly eight uppercase alphanumeric characters.
    #[error("ticket token must be {len} uppercase alphanumeric characters")]
    BadToken {
        /// Required token length.
        len: usize,
    },
}

/// A registration ticket identifier such as `ABCD-7Q2M9XKE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketId(String);

impl TicketId {
    /// Characters taken from the event id.
    pub const PREFIX_LEN: usize = 4;
    /// Length of the random token.
    pub const TOKEN_LEN: usize = 8;

    /// Assemble a ticket id from an event id and a random token.
    ///
    /// # Errors
    ///
    /// Returns `TicketIdError` when the event id is empty or the token is not
    /// eight ASCII alphanumeric characters.
    pub fn from_parts(event_id: &str, token: &str) -> Result<Self, TicketIdError> {
        let prefix: String = event_id.chars().take(Self::PREFIX_LEN).collect();
        Self::parse(&format!("{prefix}-{token}").to_uppercase())
    }

    /// Parse a ticket id.
    ///
    /// # Errors
    ///
    /// Returns `TicketIdError` when the input does not have the
    /// `PREFIX-TOKEN` shape.
    pub fn parse(s: &str) -> Result<Self, TicketIdError> {
        let (prefix, token) = s.rsplit_once('-').ok_or(TicketIdError::MissingSeparator)?;

        let prefix_len = prefix.chars().count();
        if prefix_len == 0 || prefix_len > Self::PREFIX_LEN {
            return Err(TicketIdError::BadPrefix {
                max: Self::PREFIX_LEN,
            });
        }

        let token_ok = token.len() == Self::TOKEN_LEN
            && token
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !token_ok {
            return Err(TicketIdError::BadToken {
                len: Self::TOKEN_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the ticket id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The event prefix part (before the `-`).
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.rsplit_once('-').map_or("", |(prefix, _)| prefix)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TicketId {
    type Error = TicketIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TicketId> for String {
    fn from(ticket: TicketId) -> Self {
        ticket.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for TicketId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TicketId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for TicketId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_uppercases_and_truncates() {
        let ticket = TicketId::from_parts("abcd1234", "x7k2m9qa").unwrap();
        assert_eq!(ticket.as_str(), "ABCD-X7K2M9QA");
        assert_eq!(ticket.prefix(), "ABCD");
    }

    #[test]
    fn test_from_parts_uuid_event_id() {
        let ticket =
            TicketId::from_parts("9f1c2d3e-0000-4000-8000-000000000000", "00000000").unwrap();
        assert_eq!(ticket.as_str(), "9F1C-00000000");
    }

    #[test]
    fn test_from_parts_short_event_id() {
        let ticket = TicketId::from_parts("1", "abcdefgh").unwrap();
        assert_eq!(ticket.as_str(), "1-ABCDEFGH");
    }

    #[test]
    fn test_from_parts_rejects_bad_token() {
        assert_eq!(
            TicketId::from_parts("abcd", "short"),
            Err(TicketIdError::BadToken { len: 8 })
        );
        assert_eq!(
            TicketId::from_parts("abcd", "has-dash"),
            Err(TicketIdError::BadPrefix { max: 4 })
        );
        assert_eq!(
            TicketId::from_parts("", "abcdefgh"),
            Err(TicketIdError::BadPrefix { max: 4 })
        );
    }

    #[test]
    fn test_parse() {
        assert!(TicketId::parse("ABCD-12345678").is_ok());
        assert_eq!(
            TicketId::parse("ABCD12345678"),
            Err(TicketIdError::MissingSeparator)
        );
        assert!(TicketId::parse("ABCD-abcdefgh").is_err());
    }
}
