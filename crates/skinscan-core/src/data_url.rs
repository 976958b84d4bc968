//! `data:` URL encoding and decoding.
//!
//! Images travel between the editor, the classifier and the history store
//! as base64 `data:` URLs. Decoding is lenient in the same ways the
//! classifier is: anything up to and including `base64,` is treated as a
//! header, surrounding whitespace is ignored, and missing `=` padding is
//! restored.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Errors from decoding a `data:` URL.
#[derive(Debug, thiserror::Error)]
pub enum DataUrlError {
    /// The payload was empty after stripping the header.
    #[error("data URL has no payload")]
    Empty,

    /// The payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    /// MIME type from the header, if one was present.
    pub mime: Option<String>,
    /// Decoded payload bytes.
    pub bytes: Vec<u8>,
}

/// Encode `bytes` as `data:<mime>;base64,<payload>`.
#[must_use]
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Decode a `data:` URL, or a bare base64 string.
///
/// # Errors
///
/// Returns [`DataUrlError::Empty`] if there is no payload and
/// [`DataUrlError::Base64`] if the payload does not decode.
pub fn decode(url: &str) -> Result<DecodedDataUrl, DataUrlError> {
    let (mime, payload) = match url.split_once("base64,") {
        Some((header, payload)) => (parse_mime(header), payload),
        None => match url.trim_start().strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').unwrap_or((rest, ""));
                (parse_mime(&format!("data:{header}")), payload)
            }
            None => (None, url),
        },
    };

    let payload = payload.trim();
    if payload.is_empty() {
        return Err(DataUrlError::Empty);
    }

    let bytes = match payload.len() % 4 {
        0 => STANDARD.decode(payload)?,
        rem => {
            let mut padded = String::with_capacity(payload.len() + 4 - rem);
            padded.push_str(payload);
            padded.extend(std::iter::repeat_n('=', 4 - rem));
            STANDARD.decode(padded)?
        }
    };

    Ok(DecodedDataUrl { mime, bytes })
}

/// Pull `image/jpeg` out of a header like `data:image/jpeg;`.
fn parse_mime(header: &str) -> Option<String> {
    let rest = header.trim().strip_prefix("data:")?;
    let mime = rest.split(';').next()?.trim();
    (!mime.is_empty()).then(|| mime.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encode_has_header() {
        assert_eq!(encode("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn decode_full_url() {
        let decoded = decode("data:image/jpeg;base64,YWJj").unwrap();
        assert_eq!(decoded.mime.as_deref(), Some("image/jpeg"));
        assert_eq!(decoded.bytes, b"abc");
    }

    #[test]
    fn decode_bare_payload() {
        let decoded = decode("YWJjZA==").unwrap();
        assert_eq!(decoded.mime, None);
        assert_eq!(decoded.bytes, b"abcd");
    }

    #[test]
    fn decode_restores_missing_padding() {
        let decoded = decode("data:image/png;base64,YWJjZA").unwrap();
        assert_eq!(decoded.bytes, b"abcd");
    }

    #[test]
    fn decode_trims_whitespace() {
        let decoded = decode("data:image/png;base64,  YWJj\n").unwrap();
        assert_eq!(decoded.bytes, b"abc");
    }

    #[test]
    fn decode_empty_payload() {
        assert!(matches!(decode("data:,"), Err(DataUrlError::Empty)));
        assert!(matches!(
            decode("data:image/jpeg;base64,"),
            Err(DataUrlError::Empty)
        ));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode("data:image/png;base64,@@@@"),
            Err(DataUrlError::Base64(_))
        ));
    }
}
