//! SurrealDB HTTP Client
//!
//! Client driver for SurrealDB-compatible servers speaking the CBOR rpc
//! protocol over HTTP. The transport is stateless; namespace/database
//! selection, the auth token and session variables are tracked
//! client-side and applied to every request.
//!
//! # Example
//!
//! ```rust,no_run
//! use surreal_client::SurrealClient;
//! use serde_json::json;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), surreal_client::DriverError> {
//!     let client = SurrealClient::new();
//!     client.connect(Url::parse("http://localhost:8000/rpc").unwrap()).await;
//!
//!     client.signin(json!({"user": "root", "pass": "root"})).await?;
//!     client.use_ns("app").await?;
//!     client.use_db("main").await?;
//!
//!     let people = client.query("SELECT * FROM person", None).await?;
//!     println!("People: {:?}", people);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod protocol;

pub use client::{Event, Session, Status, SurrealClient, SurrealClientBuilder};
pub use protocol::{DriverError, RpcError, RpcOutcome, RpcRequest, RpcResponse};
