//! Core of the Pokémon finder: reference data, selections, the response
//! cache and the intersection engine. The Yew front end in `main.rs` is a
//! thin layer over these modules.

use std::fmt;

pub mod bindings;
pub mod cache;
pub mod config;
pub mod finder;
pub mod http;
pub mod logger;
pub mod reference;
pub mod search;
pub mod selection;

pub use cache::{Fetch, FailurePolicy, ResponseCache, SharedResponse};
pub use finder::{find_pokemon, intersect, ResourceResponse};
pub use http::HttpFetcher;
pub use reference::{Category, ReferenceData};
pub use search::{display_name, filter_candidates, Typeahead};
pub use selection::Selection;

/// A named API resource: a type, ability, move, generation or Pokémon,
/// together with the endpoint that describes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ApiData {
    pub name: String,
    pub url: String,
}

impl ApiData {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Failure of a single GET. Cloneable so a shared fetch can hand the same
/// failure to every waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response.
    Transport { url: String, message: String },
    /// The server answered with a non-success status.
    Status { url: String, status: u16 },
    /// The body was not valid JSON.
    Decode { url: String, message: String },
    /// No response within the configured time.
    Timeout { url: String, after_ms: u32 },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. }
            | FetchError::Timeout { url, .. } => url,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport { url, message } => {
                write!(f, "Request to {} failed: {}", url, message)
            }
            FetchError::Status { url, status } => {
                write!(f, "Request to {} returned HTTP {}", url, status)
            }
            FetchError::Decode { url, message } => {
                write!(f, "Response from {} is not valid JSON: {}", url, message)
            }
            FetchError::Timeout { url, after_ms } => {
                write!(f, "Request to {} timed out after {} ms", url, after_ms)
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Errors from a Pokémon search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindError {
    /// One of the endpoints could not be fetched.
    Fetch(FetchError),
    /// An endpoint answered with JSON that lists no Pokémon in a known shape.
    UnrecognizedShape { url: String },
    /// Nothing is selected, so there is nothing to intersect.
    NoFilters,
}

impl fmt::Display for FindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindError::Fetch(e) => write!(f, "{}", e),
            FindError::UnrecognizedShape { url } => {
                write!(f, "Response from {} has no Pokémon list in a known format", url)
            }
            FindError::NoFilters => write!(f, "Pick at least one type, ability or move"),
        }
    }
}

impl std::error::Error for FindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FindError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FetchError> for FindError {
    fn from(e: FetchError) -> Self {
        FindError::Fetch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_data_equality_uses_name_and_url() {
        let a = ApiData::new("fire", "u1");
        assert_eq!(a, ApiData::new("fire", "u1"));
        assert_ne!(a, ApiData::new("fire", "u2"));
        assert_ne!(a, ApiData::new("water", "u1"));
    }

    #[test]
    fn find_error_wraps_fetch_error() {
        let fetch = FetchError::Status {
            url: "u1".to_string(),
            status: 404,
        };
        let err: FindError = fetch.clone().into();
        assert_eq!(err, FindError::Fetch(fetch));
        assert_eq!(err.to_string(), "Request to u1 returned HTTP 404");
        assert!(std::error::Error::source(&err).is_some());
    }
}
