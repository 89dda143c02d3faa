//! Unpadded URL-safe base64, used for every `data=`/`username=` value
//! on the wire (§4.6, GLOSSARY "Unpadded base64url").
//!
//! The source implementation strips `=` on encode and re-pads to a
//! multiple of four on decode via `"=" * (len(encoded) % 4)` — which is
//! backwards (`len % 4` is the *already-correct* remainder, not the
//! padding count; it happens to work only because
//! `urlsafe_b64decode` tolerates trailing garbage padding on most
//! inputs). Rather than reproduce that, we use `base64`'s own
//! padding-free engine, which never needs a re-padding step at all.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

pub fn encode(decoded: &str) -> String {
    URL_SAFE_NO_PAD.encode(decoded.as_bytes())
}

pub fn decode(encoded: &str) -> Result<String, base64::DecodeError> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded)?;
    String::from_utf8(bytes).map_err(|_| base64::DecodeError::InvalidByte(0, b'\0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_without_padding() {
        let encoded = encode("skyspark");
        assert!(!encoded.contains('='));
        assert_eq!(decode(&encoded).unwrap(), "skyspark");
    }
}
