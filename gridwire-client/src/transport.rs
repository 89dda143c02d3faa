//! The HTTP transport boundary (§6: "the HTTP transport itself... a
//! request/response interface is assumed"). `HttpTransport` is the
//! seam a caller can swap out; [`ReqwestTransport`] is the default,
//! real-network implementation the facade uses out of the box.

use bytes::Bytes;
use gridwire_lex::ChunkSource;

use crate::error::ClientError;

/// One GET response: a status code, the headers needed to drive the
/// auth state machine, and a lazily-pulled body (§4.2, §6).
pub struct HttpResponse<B> {
    pub status: u16,
    pub www_authenticate: Option<String>,
    pub authentication_info: Option<String>,
    pub body: B,
}

/// `GET path [headers] -> (status, headers, bodyChunks)` (§6).
pub trait HttpTransport {
    type Body: ChunkSource;

    async fn get(
        &self,
        path: &str,
        headers: &[(&str, String)],
    ) -> Result<HttpResponse<Self::Body>, ClientError>;
}

/// Wraps a `reqwest::Response` as a `ChunkSource`, pulling one body
/// chunk at a time rather than buffering the whole response.
pub struct ReqwestBody(reqwest::Response);

impl ChunkSource for ReqwestBody {
    async fn next_chunk(&mut self) -> std::io::Result<Option<Bytes>> {
        self.0
            .chunk()
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

/// The default transport: plain `reqwest` GETs against a fixed base URL.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into() }
    }
}

impl HttpTransport for ReqwestTransport {
    type Body = ReqwestBody;

    async fn get(
        &self,
        path: &str,
        headers: &[(&str, String)],
    ) -> Result<HttpResponse<Self::Body>, ClientError> {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }
        let response = request.send().await?;

        let header = |name: &str| {
            response.headers().get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
        };
        let status = response.status().as_u16();
        let www_authenticate = header("WWW-Authenticate");
        let authentication_info = header("Authentication-Info");

        Ok(HttpResponse { status, www_authenticate, authentication_info, body: ReqwestBody(response) })
    }
}
