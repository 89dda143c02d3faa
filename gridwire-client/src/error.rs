//! The facade's own error type: every failure a `Client` method can
//! surface, whether it originated in the reader, the authenticator, or
//! the transport itself (§7: "all errors are surfaced to the caller;
//! none are retried locally").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Grid(#[from] gridwire_read::GridError),

    #[error(transparent)]
    Auth(#[from] gridwire_auth::AuthError),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
