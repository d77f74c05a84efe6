use super::error::DriverError;
use serde::{de::DeserializeOwned, Serialize};

/// Media type used for both request and response bodies.
pub const CBOR_MIME: &str = "application/cbor";

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, DriverError> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf)
        .map_err(|e| DriverError::Protocol(format!("Serialization failed: {}", e)))?;
    Ok(buf)
}

pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, DriverError> {
    ciborium::de::from_reader(data)
        .map_err(|e| DriverError::Protocol(format!("Deserialization failed: {}", e)))
}
