//! The facade over the Grid Language reader and the SCRAM
//! authenticator (§1): a `Client` owns one project's session, evaluates
//! Grid-Language queries by streaming the response straight through
//! `gridwire-read`, and authenticates by driving `gridwire-auth`'s
//! state machine across the HTTP transport boundary.

mod client;
#[cfg(feature = "config")]
mod config;
mod error;
mod transport;

pub use client::Client;
#[cfg(feature = "config")]
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use transport::{HttpResponse, HttpTransport, ReqwestBody, ReqwestTransport};

pub use gridwire_read::Grid;
