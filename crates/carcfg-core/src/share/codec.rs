//! Share-token codec.
//!
//! Token format:
//! ```text
//! token = base64_standard( encodeURIComponent( json ) )
//! ```
//! `encodeURIComponent` leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` untouched and
//! percent-encodes every other UTF-8 byte, so the base64 input is pure ASCII.
//!
//! Decoding is lenient the way browser `atob` is: padding may be missing and
//! ASCII whitespace anywhere in the token is ignored.  The percent-decoding
//! step is strict like `decodeURIComponent`: a `%` not followed by two hex
//! digits is an error.  Everything that does not parse is reported as a
//! [`ShareError`]; callers decide whether to swallow it.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use percent_encoding::{percent_decode, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use tracing::trace;

use crate::domain::configuration::CarConfiguration;

/// Bytes that `encodeURIComponent` escapes: everything except the unreserved marks.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Standard alphabet, padded output, padding-agnostic input.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Errors that can occur while encoding or decoding a share token or URL.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The token is not valid base64.
    #[error("share token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload contains a `%` that does not start a `%XX` escape.
    #[error("share token payload has a malformed percent escape at byte {offset}")]
    PercentEncoding { offset: usize },

    /// The percent-decoded payload is not valid UTF-8.
    #[error("share token payload is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The payload is not a configuration record.
    #[error("share token payload is not a configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A page or share URL could not be parsed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Encodes `config` into a share token.
///
/// # Errors
///
/// Returns [`ShareError::Json`] if the configuration cannot be serialised.
///
/// # Examples
///
/// ```rust
/// use carcfg_core::{decode_token, encode_token, CarConfiguration};
///
/// let token = encode_token(&CarConfiguration::default()).unwrap();
/// assert_eq!(decode_token(&token).unwrap(), CarConfiguration::default());
/// ```
pub fn encode_token(config: &CarConfiguration) -> Result<String, ShareError> {
    let json = serde_json::to_string(config)?;
    let escaped = utf8_percent_encode(&json, URI_COMPONENT).to_string();
    let token = TOKEN_ENGINE.encode(escaped.as_bytes());
    trace!(json_len = json.len(), token_len = token.len(), "encoded share token");
    Ok(token)
}

/// Decodes a share token back into a configuration.
///
/// # Errors
///
/// Returns [`ShareError::Base64`], [`ShareError::PercentEncoding`],
/// [`ShareError::Utf8`] or [`ShareError::Json`] depending on which stage
/// rejected the input.
pub fn decode_token(token: &str) -> Result<CarConfiguration, ShareError> {
    let compact: String = token.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let escaped = TOKEN_ENGINE.decode(compact)?;
    check_escapes(&escaped)?;
    let bytes: Vec<u8> = percent_decode(&escaped).collect();
    let json = std::str::from_utf8(&bytes)?;
    let config = serde_json::from_str(json)?;
    Ok(config)
}

/// Rejects a `%` that is not followed by two hex digits.
fn check_escapes(escaped: &[u8]) -> Result<(), ShareError> {
    let mut i = 0;
    while i < escaped.len() {
        if escaped[i] == b'%' {
            let valid = escaped
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(ShareError::PercentEncoding { offset: i });
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
