use std::fmt;

use serde::Deserialize;

/// Marketplace search response body.
///
/// The listing array shows up under `listings` or `results` depending on the
/// endpoint revision; either is accepted, checked in that order. Any other
/// object decodes as `Absent` and means "no listings", not an error.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListingsPayload {
    Listings { listings: Vec<RawListing> },
    Results { results: Vec<RawListing> },
    Absent {},
}

impl ListingsPayload {
    /// Resolve the payload into normalized listings, in API order.
    pub fn into_listings(self) -> Vec<Listing> {
        let raw = match self {
            Self::Listings { listings } => listings,
            Self::Results { results } => results,
            Self::Absent {} => Vec::new(),
        };
        raw.into_iter().map(Listing::from).collect()
    }
}

/// One listing as returned by the marketplace, before normalization.
///
/// Everything except the identifier is optional; the API omits fields freely.
#[derive(Debug, Clone, Deserialize)]
pub struct RawListing {
    pub id: ListingId,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub ships_from: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Listing identifier, numeric or string on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListingId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Price field, either a `{value, currency}` object or a bare amount.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Detailed {
        #[serde(default)]
        value: Option<Amount>,
        #[serde(default)]
        currency: Option<String>,
    },
    Bare(Amount),
}

/// Monetary amount, numeric or string on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A marketplace listing after normalization. Identity is the `id` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    pub price: Price,
    pub condition: String,
    pub ships_from: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: String,
    pub currency: String,
}

impl From<RawListing> for Listing {
    fn from(raw: RawListing) -> Self {
        let price = match raw.price {
            Some(RawPrice::Detailed { value, currency }) => Price {
                amount: value.map_or_else(|| "0".to_string(), |v| v.to_string()),
                currency: currency.unwrap_or_else(|| "USD".to_string()),
            },
            Some(RawPrice::Bare(amount)) => Price {
                amount: amount.to_string(),
                currency: "USD".to_string(),
            },
            None => Price {
                amount: "0".to_string(),
                currency: "USD".to_string(),
            },
        };

        Self {
            id: raw.id.to_string(),
            price,
            condition: raw.condition.unwrap_or_else(|| "Not specified".to_string()),
            ships_from: raw
                .ships_from
                .or(raw.location)
                .unwrap_or_else(|| "Unknown".to_string()),
            url: raw.uri.or(raw.url),
        }
    }
}
