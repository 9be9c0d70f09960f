//! Blocking client for the CloudBeaver team administration GraphQL API.
//!
//! # Overview
//! Logs in once with a username and password, keeps the `cb-session-id`
//! cookie, and runs a fixed set of team operations (list, get, create,
//! update, delete) against a single GraphQL endpoint.
//!
//! # Design
//! - `TeamClient` owns the endpoint URL, the hashed credentials and the
//!   session token. Operations take `&mut self` so the token has one writer.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (decodes body); the facade methods run both around one
//!   [`transport::exchange`].
//! - Query text is static (`operations`); only typed variables vary.
//! - The network sits behind the [`Transport`] trait, with a `ureq`-backed
//!   default. DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod operations;
pub mod session;
pub mod transport;
pub mod types;

pub use client::TeamClient;
pub use config::{ClientConfig, DEFAULT_URL};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use session::{hash_password, Credentials, Session, SESSION_COOKIE};
pub use transport::{Transport, UreqTransport};
pub use types::Team;
