//! Share URLs: embedding a token in, and extracting it from, a page URL.
//!
//! A share URL is the page's origin and path plus a single query parameter:
//!
//! ```text
//! http://localhost:3000/?config=JTdCJTIy...RA%3D%3D
//! ```
//!
//! Any query string or fragment already present on the page is dropped.

use std::str::FromStr;

use url::Url;

use super::codec::{encode_token, ShareError};
use crate::domain::configuration::CarConfiguration;

/// Name of the query parameter that carries the share token.
pub const SHARE_QUERY_PARAM: &str = "config";

/// Origin and path of the page share links point back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    base: Url,
}

impl PageLocation {
    /// Parses a page URL, discarding credentials, query and fragment.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Url`] if `url` is not an absolute URL.
    pub fn parse(url: &str) -> Result<Self, ShareError> {
        let mut base = Url::parse(url)?;
        base.set_query(None);
        base.set_fragment(None);
        // Cannot fail for URLs that have a host; cannot-be-a-base URLs carry no credentials.
        let _ = base.set_username("");
        let _ = base.set_password(None);
        Ok(Self { base })
    }

    /// Serialised origin, e.g. `"http://localhost:3000"`.
    pub fn origin(&self) -> String {
        self.base.origin().ascii_serialization()
    }

    /// Path component, e.g. `"/"`.
    pub fn path(&self) -> &str {
        self.base.path()
    }
}

impl FromStr for PageLocation {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Builds the full share URL for `config`.
///
/// # Errors
///
/// Propagates encoding errors from [`encode_token`].
pub fn share_url(location: &PageLocation, config: &CarConfiguration) -> Result<String, ShareError> {
    let token = encode_token(config)?;
    let mut url = location.base.clone();
    url.query_pairs_mut().append_pair(SHARE_QUERY_PARAM, &token);
    Ok(url.into())
}

/// Extracts the share token from a page URL.
///
/// Returns `Ok(None)` when the parameter is absent or empty.  When the
/// parameter appears more than once the first occurrence wins.
///
/// Links written by the browser front end embed the raw base64 token without
/// query escaping, so a `+` in the token arrives here decoded as a space.
/// Base64 never contains spaces, which makes the repair unambiguous.
///
/// # Errors
///
/// Returns [`ShareError::Url`] if `url` cannot be parsed.
pub fn token_from_url(url: &str) -> Result<Option<String>, ShareError> {
    let parsed = Url::parse(url)?;
    let token = parsed
        .query_pairs()
        .find(|(key, _)| key == SHARE_QUERY_PARAM)
        .map(|(_, value)| value.replace(' ', "+"))
        .filter(|value| !value.is_empty());
    Ok(token)
}
