//! The handshake state machine itself (§4.6): `INIT` → `AWAIT_CHALLENGE`
//! → `CHALLENGED` → `AWAIT_SERVER_FIRST` → `SERVER_FIRST` →
//! `AWAIT_SERVER_FINAL` → `VERIFY` → `AUTHED`.
//!
//! Each step here mirrors one `async with self.session.get(...)` block
//! of `Client.authenticate`, minus the GET itself: the caller performs
//! the HTTP round-trip and feeds the response status/headers back in,
//! since the transport is an external collaborator (§6) and this crate
//! has no HTTP client dependency of its own.

use gridwire_util::AuthError;
use tracing::debug;

use crate::base64url;
use crate::message::{AuthInfo, AuthMsg, Params};
use crate::scram::{self, AwaitingServerFinal, AwaitingServerFirst, HashAlgo};

/// Carried from `receive_challenge` to `receive_server_first`.
pub struct Challenged {
    handshake_token: String,
    scram: AwaitingServerFirst,
}

/// Carried from `receive_server_first` to `receive_server_final`.
pub struct Negotiated {
    handshake_token: String,
    scram: AwaitingServerFinal,
}

/// `INIT` → `AWAIT_CHALLENGE`: the `hello` message, username-only.
pub fn send_hello(username: &str) -> AuthMsg {
    debug!(username, "sending SCRAM hello");
    let mut params = Params::new();
    params.insert("username", base64url::encode(username));
    AuthMsg::make("hello", params)
}

/// `AWAIT_CHALLENGE` → `CHALLENGED` → (send) → `AWAIT_SERVER_FIRST`.
pub fn receive_challenge(
    status: u16,
    www_authenticate: Option<&str>,
    username: &str,
    password: &str,
) -> Result<(AuthMsg, Challenged), AuthError> {
    const STEP: &str = "hello";
    if status != 401 {
        return Err(AuthError::UnexpectedStatus { step: STEP, expected: 401, found: status });
    }
    let header = www_authenticate
        .ok_or(AuthError::MissingHeader { step: STEP, header: "WWW-Authenticate" })?;
    let msg = AuthMsg::decode(header)?;
    if msg.scheme != "scram" {
        return Err(AuthError::UnsupportedScheme { found: msg.scheme });
    }

    let handshake_token = msg.params.require("handshaketoken", STEP)?.to_string();
    let hash = msg.params.require("hash", STEP)?;
    let algo = HashAlgo::from_protocol_name(hash)?;

    let (client_first, scram) = scram::client_first(algo, username, password);
    let mut params = Params::new();
    params.insert("handshaketoken", handshake_token.clone());
    params.insert("data", base64url::encode(&client_first));

    debug!(mechanism = algo.mechanism(), "sending SCRAM client-first");
    Ok((AuthMsg::make("scram", params), Challenged { handshake_token, scram }))
}

/// `AWAIT_SERVER_FIRST` → `SERVER_FIRST` → (send) → `AWAIT_SERVER_FINAL`.
pub fn receive_server_first(
    status: u16,
    www_authenticate: Option<&str>,
    state: Challenged,
) -> Result<(AuthMsg, Negotiated), AuthError> {
    const STEP: &str = "client-first";
    if status != 401 {
        return Err(AuthError::UnexpectedStatus { step: STEP, expected: 401, found: status });
    }
    let header = www_authenticate
        .ok_or(AuthError::MissingHeader { step: STEP, header: "WWW-Authenticate" })?;
    let msg = AuthMsg::decode(header)?;

    let handshake_token = msg.params.require("handshaketoken", STEP)?.to_string();
    let server_first_b64 = msg.params.require("data", STEP)?;
    let server_first = base64url::decode(server_first_b64)
        .map_err(|e| AuthError::MalformedHeader { reason: format!("invalid data base64: {e}") })?;

    let (client_final, scram) = scram::client_final(state.scram, &server_first)?;
    let mut params = Params::new();
    params.insert("handshaketoken", handshake_token.clone());
    params.insert("data", base64url::encode(&client_final));

    debug!("sending SCRAM client-final");
    Ok((AuthMsg::make("scram", params), Negotiated { handshake_token, scram }))
}

/// `AWAIT_SERVER_FINAL` → `VERIFY` → `AUTHED`: returns the bearer token.
pub fn receive_server_final(
    status: u16,
    authentication_info: Option<&str>,
    state: Negotiated,
) -> Result<String, AuthError> {
    const STEP: &str = "client-final";
    if status != 200 {
        return Err(AuthError::UnexpectedStatus { step: STEP, expected: 200, found: status });
    }
    let header = authentication_info
        .ok_or(AuthError::MissingHeader { step: STEP, header: "Authentication-Info" })?;
    let info = AuthInfo::decode(header)?;

    let auth_token = info.params.require("authtoken", STEP)?.to_string();
    let server_final_b64 = info.params.require("data", STEP)?;
    let server_final = base64url::decode(server_final_b64)
        .map_err(|e| AuthError::MalformedHeader { reason: format!("invalid data base64: {e}") })?;

    scram::verify_server_final(state.scram, &server_final)?;
    let _ = state.handshake_token;
    debug!("SCRAM handshake verified, session authenticated");
    Ok(auth_token)
}

/// The bearer header stored on the session once `AUTHED` is reached.
pub fn bearer_header(auth_token: &str) -> AuthMsg {
    let mut params = Params::new();
    params.insert("authtoken", auth_token.to_string());
    AuthMsg::make("bearer", params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_401_on_hello_response() {
        let err = receive_challenge(200, Some("scram handshaketoken=x, hash=SHA-256"), "u", "p")
            .unwrap_err();
        assert!(matches!(err, AuthError::UnexpectedStatus { expected: 401, found: 200, .. }));
    }

    #[test]
    fn rejects_missing_www_authenticate() {
        let err = receive_challenge(401, None, "u", "p").unwrap_err();
        assert!(matches!(err, AuthError::MissingHeader { header: "WWW-Authenticate", .. }));
    }

    #[test]
    fn rejects_non_scram_scheme() {
        let err = receive_challenge(401, Some("basic realm=x"), "u", "p").unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedScheme { .. }));
    }

    #[test]
    fn rejects_unsupported_hash() {
        let err =
            receive_challenge(401, Some("scram handshaketoken=x, hash=MD5"), "u", "p").unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedHash { .. }));
    }

    #[test]
    fn accepts_a_well_formed_challenge() {
        let (msg, _state) =
            receive_challenge(401, Some("scram handshaketoken=tok1, hash=SHA-256"), "user", "pw")
                .unwrap();
        assert_eq!(msg.scheme, "scram");
        assert_eq!(msg.params.get("handshaketoken"), Some("tok1"));
    }

    use proptest::prelude::*;

    proptest! {
        /// FSM invariant (§8): `receive_challenge` never advances past
        /// `AWAIT_CHALLENGE` on a non-401 status, for any status or
        /// header content.
        #[test]
        fn any_non_401_status_is_rejected_before_touching_headers(
            status in (0u16..1000).prop_filter("not the expected status", |s| *s != 401),
            header in proptest::option::of("[ -~]{0,40}"),
            username in "[a-z]{1,8}",
            password in "[a-z]{1,8}",
        ) {
            let err = receive_challenge(status, header.as_deref(), &username, &password).unwrap_err();
            prop_assert!(matches!(
                err,
                AuthError::UnexpectedStatus { expected: 401, found, .. } if found == status
            ));
        }

        /// FSM invariant (§8): a 401 challenge under any scheme other
        /// than `scram` is rejected, never mistaken for a SCRAM step.
        #[test]
        fn any_non_scram_scheme_at_401_is_rejected(
            scheme in "[a-z]{1,10}".prop_filter("not scram", |s| s != "scram"),
            username in "[a-z]{1,8}",
            password in "[a-z]{1,8}",
        ) {
            let header = format!("{scheme} handshaketoken=x, hash=SHA-256");
            let err = receive_challenge(401, Some(&header), &username, &password).unwrap_err();
            prop_assert!(matches!(err, AuthError::UnsupportedScheme { .. }));
        }
    }
}
