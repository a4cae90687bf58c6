//! Blocking client for a mongo-api backend.
//!
//! `mongoform-client` takes documents compiled by `mongoform-query` and
//! submits them as `GET` requests whose path carries the operation, the
//! collection and the JSON documents:
//!
//! | Operation | Path | Response |
//! |-----------|------|----------|
//! | insert | `insert/{collection}/{doc}` | text |
//! | find   | `find/{collection}/{filter}` | JSON |
//! | update | `update/{collection}/{filter}/{"$set": data}` | text |
//! | delete | `delete/{collection}/{filter}` | text |
//! | empty  | `empty/{collection}` | text |
//! | drop   | `drop/{collection}` | text |
//!
//! The full URL is escaped with `encodeURI` rules (see [`encode_uri`]).
//!
//! # Configuration
//!
//! [`ClientConfig`] defaults to `http://localhost:8080/mongo-api` and a
//! 30 second timeout. `MONGOFORM_BASE_URI` and `MONGOFORM_TIMEOUT_SECS`
//! override them when loading with [`ClientConfig::from_env`].
//!
//! # Transports
//!
//! Requests go through the [`Transport`] trait. [`UreqTransport`] is the
//! network implementation; [`MockTransport`] records URLs and replays queued
//! replies for tests.

mod client;
mod config;
mod encode;
mod env;
mod error;
mod operation;
mod transport;

pub use client::BackendClient;
pub use config::{ClientConfig, BASE_URI_VAR, DEFAULT_BASE_URI, DEFAULT_TIMEOUT_SECS, TIMEOUT_VAR};
pub use encode::encode_uri;
pub use env::{EnvReader, MockEnv, RealEnv};
pub use error::{ClientError, Result};
pub use operation::Operation;
pub use transport::{MockTransport, Reply, Transport, UreqTransport};
