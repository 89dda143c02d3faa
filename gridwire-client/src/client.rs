//! The facade itself (§1, §6): `eval` hands a response body straight to
//! the streaming reader; `authenticate` drives the SCRAM state machine
//! across three round trips and stores the resulting bearer header for
//! every request made afterwards (§4.6, §5 "resource lifecycle").

use tracing::debug;

use gridwire_auth as auth;
use gridwire_read::Grid;

use crate::error::{ClientError, Result};
use crate::transport::{HttpTransport, ReqwestTransport};

/// A session against one project on a Grid-Language server.
///
/// Not `Sync` across concurrent tasks by design (§5: "a `Client`
/// instance must not be used by two concurrent tasks"); the transport
/// and the bearer token are private, mutable, single-owner state.
pub struct Client<T = ReqwestTransport> {
    project: String,
    transport: T,
    bearer_token: Option<String>,
}

impl Client<ReqwestTransport> {
    /// Opens a session against `base_url` for `project`, using the
    /// default `reqwest`-backed transport.
    pub fn new(base_url: impl Into<String>, project: impl Into<String>) -> Self {
        Client { project: project.into(), transport: ReqwestTransport::new(base_url), bearer_token: None }
    }
}

impl<T: HttpTransport> Client<T> {
    /// Opens a session using a caller-supplied transport, e.g. in tests.
    pub fn with_transport(transport: T, project: impl Into<String>) -> Self {
        Client { project: project.into(), transport, bearer_token: None }
    }

    fn about_path(&self) -> String {
        format!("/api/{}/about", self.project)
    }

    fn auth_header(&self) -> Vec<(&'static str, String)> {
        match &self.bearer_token {
            Some(token) => vec![("Authorization", auth::bearer_header(token).encode())],
            None => Vec::new(),
        }
    }

    /// Runs a Grid-Language query and parses the response body as it
    /// streams in, without buffering the whole document (§4.2-§4.4).
    pub async fn eval(&self, expr: &str) -> Result<Grid> {
        let path = format!("/api/{}/eval?expr={}", self.project, percent_encode_query_value(expr));
        let response = self.transport.get(&path, &self.auth_header()).await?;
        gridwire_read::read_grid(response.body).await.map_err(Into::into)
    }

    /// Runs the `hello` → `scram` → `scram` handshake of §4.6 and
    /// stores the resulting bearer token for subsequent requests.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let path = self.about_path();
        debug!(project = %self.project, "starting SCRAM authentication");

        let hello = auth::send_hello(username);
        let hello_resp = self.transport.get(&path, &[("Authorization", hello.encode())]).await?;
        let (client_first, challenged) = auth::receive_challenge(
            hello_resp.status,
            hello_resp.www_authenticate.as_deref(),
            username,
            password,
        )?;

        let first_resp =
            self.transport.get(&path, &[("Authorization", client_first.encode())]).await?;
        let (client_final, negotiated) = auth::receive_server_first(
            first_resp.status,
            first_resp.www_authenticate.as_deref(),
            challenged,
        )?;

        let final_resp =
            self.transport.get(&path, &[("Authorization", client_final.encode())]).await?;
        let bearer_token = auth::receive_server_final(
            final_resp.status,
            final_resp.authentication_info.as_deref(),
            negotiated,
        )?;

        self.bearer_token = Some(bearer_token);
        debug!("SCRAM authentication complete");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }
}

/// Minimal RFC 3986 query-value escaping: alphanumerics and `-_.~` pass
/// through verbatim, everything else is percent-encoded.
fn percent_encode_query_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpResponse;
    use gridwire_lex::VecChunkSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn percent_encodes_reserved_characters() {
        assert_eq!(percent_encode_query_value("readAll()"), "readAll%28%29");
        assert_eq!(percent_encode_query_value("a b"), "a%20b");
        assert_eq!(percent_encode_query_value("id_1.2-x~"), "id_1.2-x~");
    }

    /// Replies with one canned `HttpResponse` per call, in order.
    struct ScriptedTransport {
        calls: AtomicUsize,
        responses: Vec<(u16, Option<String>, Option<String>, String)>,
    }

    impl HttpTransport for ScriptedTransport {
        type Body = VecChunkSource;

        async fn get(
            &self,
            _path: &str,
            _headers: &[(&str, String)],
        ) -> Result<HttpResponse<Self::Body>> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            let (status, www_authenticate, authentication_info, body) = self.responses[i].clone();
            Ok(HttpResponse {
                status,
                www_authenticate,
                authentication_info,
                body: VecChunkSource::whole(body),
            })
        }
    }

    #[tokio::test]
    async fn authenticate_surfaces_an_auth_error_on_unexpected_status() {
        let transport = ScriptedTransport {
            calls: AtomicUsize::new(0),
            responses: vec![(200, None, None, String::new())],
        };
        let mut client = Client::with_transport(transport, "demo");
        let err = client.authenticate("user", "pw").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Auth(gridwire_auth::AuthError::UnexpectedStatus { expected: 401, found: 200, .. })
        ));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn eval_streams_the_response_body_through_the_reader() {
        let doc = "ver:\"3.0\"\nid\n@a\n".to_string();
        let transport = ScriptedTransport {
            calls: AtomicUsize::new(0),
            responses: vec![(200, None, None, doc)],
        };
        let client = Client::with_transport(transport, "demo");
        let grid = client.eval("readAll(site)").await.unwrap();
        assert_eq!(grid.cols.len(), 1);
        assert_eq!(grid.rows.len(), 1);
    }
}
