//! Wire protocol definitions for the HTTP driver
//!
//! Uses CBOR for the binary request/response encoding.

pub mod codec;
pub mod envelope;
pub mod error;
pub mod method;

pub use codec::{decode, encode, CBOR_MIME};
pub use envelope::{next_id, RpcError, RpcOutcome, RpcRequest, RpcResponse};
pub use error::DriverError;
pub use method::Method;
