//! Product identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::line_item::LineItemError;

/// An opaque product identifier.
///
/// The cart only compares IDs for equality; their content is owned by the
/// catalog that issued them. The only constraint is that an ID is not empty.
///
/// ## Examples
///
/// ```
/// use pocket_cart_core::ProductId;
///
/// assert!(ProductId::parse("sku-1234").is_ok());
/// assert!(ProductId::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Parse a `ProductId` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::EmptyId`] if the input is empty or whitespace.
    pub fn parse(s: &str) -> Result<Self, LineItemError> {
        Self::try_from(s.to_owned())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ProductId {
    type Error = LineItemError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(LineItemError::EmptyId);
        }
        Ok(Self(s))
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = LineItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
