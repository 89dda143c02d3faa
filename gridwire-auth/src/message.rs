//! Auth header wire format: `scheme k1=v1, k2=v2, …` for `Authorization`
//! and `WWW-Authenticate`, and the scheme-less `k1=v1, k2=v2, …` for
//! `Authentication-Info` (§4.6, §6).
//!
//! Parameter keys are case-folded to lowercase on both insert and
//! lookup, matching `MessageParameters`'s overridden `__setitem__` /
//! `__getitem__`. Values are split on the first `=` only — the
//! protocol's values never contain `=`, but a value that did would
//! otherwise silently truncate rather than fail to parse.

use std::collections::BTreeMap;

use gridwire_util::AuthError;

/// Case-insensitive `k=v` parameter bag, encoded/decoded the same way
/// on both sides of the `Authorization` / `WWW-Authenticate` /
/// `Authentication-Info` headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Params(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into().to_lowercase(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn require<'a>(&'a self, key: &'static str, step: &'static str) -> Result<&'a str, AuthError> {
        self.get(key).ok_or(AuthError::MissingParameter { step, key })
    }

    fn decode(encoded: &str) -> Result<Params, AuthError> {
        let mut params = Params::new();
        for pair in encoded.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').ok_or_else(|| AuthError::MalformedHeader {
                reason: format!("parameter {pair:?} is missing '='"),
            })?;
            params.insert(key.trim(), value.trim());
        }
        Ok(params)
    }

    fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A scheme-carrying auth message: `Authorization` and
/// `WWW-Authenticate` both use this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMsg {
    pub scheme: String,
    pub params: Params,
}

impl AuthMsg {
    pub fn make(scheme: impl Into<String>, params: Params) -> AuthMsg {
        AuthMsg { scheme: scheme.into(), params }
    }

    pub fn decode(encoded: &str) -> Result<AuthMsg, AuthError> {
        let (scheme, rest) = encoded.trim().split_once(' ').ok_or_else(|| AuthError::MalformedHeader {
            reason: format!("{encoded:?} has no scheme/params separator"),
        })?;
        Ok(AuthMsg { scheme: scheme.to_string(), params: Params::decode(rest)? })
    }

    pub fn encode(&self) -> String {
        format!("{} {}", self.scheme, self.params.encode())
    }
}

/// The scheme-less `Authentication-Info` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthInfo {
    pub params: Params,
}

impl AuthInfo {
    pub fn decode(encoded: &str) -> Result<AuthInfo, AuthError> {
        Ok(AuthInfo { params: Params::decode(encoded)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scram_challenge() {
        let msg = AuthMsg::decode("scram handshakeToken=abc123, hash=SHA-256").unwrap();
        assert_eq!(msg.scheme, "scram");
        assert_eq!(msg.params.get("handshaketoken"), Some("abc123"));
        assert_eq!(msg.params.get("HASH"), Some("SHA-256"));
    }

    #[test]
    fn encode_lowercases_keys() {
        let mut params = Params::new();
        params.insert("Username", "dXNlcg");
        let msg = AuthMsg::make("hello", params);
        assert_eq!(msg.encode(), "hello username=dXNlcg");
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(AuthMsg::decode("hello").is_err());
    }
}
