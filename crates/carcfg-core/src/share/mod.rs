//! Share-link encoding: how a configuration travels inside a URL.
//!
//! # Pipeline (for beginners)
//!
//! ```text
//! CarConfiguration ──serde_json──► JSON text
//!                  ──encodeURIComponent──► ASCII-only text
//!                  ──base64──► share token
//!                  ──query-component encoding──► ?config=<token>
//! ```
//!
//! Decoding runs the same steps backwards.  The byte layout matches links
//! created by the browser front end, so old links keep working.
//!
//! - **`codec`** – token ⇄ configuration.
//! - **`url`**   – token ⇄ full share URL.

pub mod codec;
pub mod url;

pub use codec::{decode_token, encode_token, ShareError};
pub use url::{share_url, token_from_url, PageLocation, SHARE_QUERY_PARAM};
