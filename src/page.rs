//! Paginated collection responses
//!
//! Graph returns collections as `{"value": [...]}` with an optional
//! `@odata.nextLink` continuation cursor when more results exist.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode a page from a response body.
    ///
    /// # Errors
    ///
    /// A missing `value` array or malformed entry is reported as
    /// [`Error::Malformed`] naming `path`.
    pub fn from_json(body: Value, path: &str) -> Result<Self> {
        serde_json::from_value(body)
            .map_err(|e| Error::Malformed(format!("{path}: {e}")))
    }
}

impl<T> Page<T> {
    /// The continuation cursor as a path relative to `service_root`.
    ///
    /// Links outside the service root are returned unchanged.
    #[must_use]
    pub fn next_path<'a>(&'a self, service_root: &str) -> Option<&'a str> {
        self.next_link
            .as_deref()
            .map(|link| relative_to(link, service_root))
    }
}

/// A message entry from a `$select=id` delta listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

/// Strip `service_root` from the front of `link`.
#[must_use]
pub fn relative_to<'a>(link: &'a str, service_root: &str) -> &'a str {
    link.strip_prefix(service_root).unwrap_or(link)
}
