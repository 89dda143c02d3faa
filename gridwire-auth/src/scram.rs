//! Client-side SCRAM-SHA-256 / SCRAM-SHA-512 (RFC 5802), driven by the
//! `CHALLENGED` → `SERVER_FIRST` → `VERIFY` transitions of §4.6. The
//! source delegates this entirely to the third-party `scramp` package;
//! there is no equivalent crate in this workspace's stack, so the
//! handshake math is implemented directly against `sha2`/`hmac`/
//! `pbkdf2`, the same RustCrypto family `sha2` itself belongs to.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::{Digest, Sha256, Sha512};

use gridwire_util::AuthError;

use crate::message::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgo {
    Sha256,
    Sha512,
}

impl HashAlgo {
    pub fn from_protocol_name(name: &str) -> Result<HashAlgo, AuthError> {
        match name {
            "SHA-256" => Ok(HashAlgo::Sha256),
            "SHA-512" => Ok(HashAlgo::Sha512),
            other => Err(AuthError::UnsupportedHash { found: other.to_string() }),
        }
    }

    pub fn mechanism(self) -> &'static str {
        match self {
            HashAlgo::Sha256 => "SCRAM-SHA-256",
            HashAlgo::Sha512 => "SCRAM-SHA-512",
        }
    }

    fn hash(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgo::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgo::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    fn hmac(self, key: &[u8], data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgo::Sha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            HashAlgo::Sha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    fn salted_password(self, password: &str, salt: &[u8], iterations: u32) -> Vec<u8> {
        match self {
            HashAlgo::Sha256 => {
                let mut out = vec![0u8; 32];
                pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
                out
            }
            HashAlgo::Sha512 => {
                let mut out = vec![0u8; 64];
                pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, iterations, &mut out);
                out
            }
        }
    }
}

/// RFC 5802 §5.1: `,` and `=` in a `saslname` are escaped as `=2C`/`=3D`.
fn sasl_escape(name: &str) -> String {
    name.replace('=', "=3D").replace(',', "=2C")
}

fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

fn random_nonce() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    B64.encode(bytes)
}

/// State carried from `client-first` to the server's first response.
pub struct AwaitingServerFirst {
    algo: HashAlgo,
    client_nonce: String,
    client_first_bare: String,
    password: String,
}

/// State carried from `client-final` to the server's final response.
pub struct AwaitingServerFinal {
    expected_server_signature: Vec<u8>,
}

/// Builds `client-first-message` (gs2-header + bare message) and
/// returns the state needed to process the server's reply.
pub fn client_first(algo: HashAlgo, username: &str, password: &str) -> (String, AwaitingServerFirst) {
    let client_nonce = random_nonce();
    let client_first_bare = format!("n={},r={}", sasl_escape(username), client_nonce);
    let message = format!("n,,{client_first_bare}");
    (message, AwaitingServerFirst { algo, client_nonce, client_first_bare, password: password.to_string() })
}

/// Parses `server-first-message` (`r=<nonce>,s=<salt>,i=<iterations>`),
/// computes the client proof, and returns `client-final-message`.
pub fn client_final(
    state: AwaitingServerFirst,
    server_first: &str,
) -> Result<(String, AwaitingServerFinal), AuthError> {
    let fields = parse_scram_fields(server_first)?;
    let server_nonce = fields.get("r").ok_or_else(|| malformed("server-first is missing r="))?;
    if !server_nonce.starts_with(&state.client_nonce) {
        return Err(AuthError::ScramVerificationFailed {
            reason: "server nonce does not extend the client nonce".to_string(),
        });
    }
    let salt_b64 = fields.get("s").ok_or_else(|| malformed("server-first is missing s="))?;
    let salt = B64.decode(salt_b64).map_err(|e| malformed(format!("invalid salt base64: {e}")))?;
    let iterations: u32 = fields
        .get("i")
        .ok_or_else(|| malformed("server-first is missing i="))?
        .parse()
        .map_err(|_| malformed("iteration count is not a valid integer"))?;

    let gs2_header_b64 = B64.encode("n,,");
    let client_final_without_proof = format!("c={gs2_header_b64},r={server_nonce}");
    let auth_message =
        format!("{},{},{}", state.client_first_bare, server_first, client_final_without_proof);

    let salted_password = state.algo.salted_password(&state.password, &salt, iterations);
    let client_key = state.algo.hmac(&salted_password, b"Client Key");
    let stored_key = state.algo.hash(&client_key);
    let client_signature = state.algo.hmac(&stored_key, auth_message.as_bytes());
    let client_proof = xor(&client_key, &client_signature);

    let server_key = state.algo.hmac(&salted_password, b"Server Key");
    let expected_server_signature = state.algo.hmac(&server_key, auth_message.as_bytes());

    let message = format!("{client_final_without_proof},p={}", B64.encode(client_proof));
    Ok((message, AwaitingServerFinal { expected_server_signature }))
}

/// Parses `server-final-message` (`v=<signature>`) and checks it
/// against the signature this client independently computed.
pub fn verify_server_final(state: AwaitingServerFinal, server_final: &str) -> Result<(), AuthError> {
    let fields = parse_scram_fields(server_final)?;
    let signature_b64 = fields.get("v").ok_or_else(|| malformed("server-final is missing v="))?;
    let signature = B64
        .decode(signature_b64)
        .map_err(|e| malformed(format!("invalid server signature base64: {e}")))?;

    if signature == state.expected_server_signature {
        Ok(())
    } else {
        Err(AuthError::ScramVerificationFailed { reason: "server signature mismatch".to_string() })
    }
}

fn parse_scram_fields(message: &str) -> Result<Params, AuthError> {
    let mut params = Params::new();
    for field in message.split(',') {
        let (key, value) = field.split_once('=').ok_or_else(|| malformed(format!("malformed field {field:?}")))?;
        params.insert(key, value);
    }
    Ok(params)
}

fn malformed(reason: impl Into<String>) -> AuthError {
    AuthError::MalformedHeader { reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_handshake_round_trips_against_a_reference_server() {
        let algo = HashAlgo::Sha256;
        let password = "pencil";
        let salt = b"salt1234";
        let iterations = 4096u32;
        let salted = algo.salted_password(password, salt, iterations);

        let (client_first_msg, state1) = client_first(algo, "user", password);
        assert!(client_first_msg.starts_with("n,,n=user,r="));

        let client_nonce = state1.client_nonce.clone();
        let server_nonce = format!("{client_nonce}SERVERPART");
        let server_first = format!(
            "r={server_nonce},s={},i={iterations}",
            B64.encode(salt)
        );

        let (client_final_msg, state2) = client_final(state1, &server_first).unwrap();
        assert!(client_final_msg.contains("p="));

        let auth_message = format!(
            "n={},r={client_nonce},{server_first},c={},r={server_nonce}",
            "user",
            B64.encode("n,,")
        );
        let server_key = algo.hmac(&salted, b"Server Key");
        let server_signature = algo.hmac(&server_key, auth_message.as_bytes());
        let server_final = format!("v={}", B64.encode(&server_signature));

        verify_server_final(state2, &server_final).unwrap();
    }

    #[test]
    fn rejects_server_nonce_not_extending_client_nonce() {
        let (_msg, state) = client_first(HashAlgo::Sha256, "user", "pw");
        let server_first = format!("r=totallydifferent,s={},i=4096", B64.encode("salt"));
        assert!(client_final(state, &server_first).is_err());
    }
}
