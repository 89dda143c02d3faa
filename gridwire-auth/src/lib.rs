//! SCRAM-based HTTP authentication handshake (§4.6).
//!
//! This crate owns header parsing/encoding ([`message`]), unpadded
//! base64url ([`base64url`]), the SCRAM-SHA-256/512 client math
//! ([`scram`]), and the handshake state machine itself ([`state`]). It
//! has no knowledge of HTTP transport — the caller drives each round
//! trip and feeds the response status/headers back into the next
//! `state` function.

pub mod base64url;
pub mod message;
pub mod scram;
pub mod state;

pub use gridwire_util::AuthError;
pub use message::{AuthInfo, AuthMsg, Params};
pub use scram::HashAlgo;
pub use state::{bearer_header, receive_challenge, receive_server_final, receive_server_first, send_hello, Challenged, Negotiated};
