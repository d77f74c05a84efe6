use super::SurrealClient;
use crate::protocol::DriverError;
use serde_json::{json, Value};

impl SurrealClient {
    /// Signs in with the given credentials and returns the server's
    /// result (normally the issued token, which the session also keeps).
    pub async fn signin(&self, credentials: Value) -> Result<Value, DriverError> {
        let response = self.rpc("signin", vec![credentials]).await?;
        Ok(response.into_result()?)
    }

    /// Registers a record-level user and returns the server's result.
    pub async fn signup(&self, credentials: Value) -> Result<Value, DriverError> {
        let response = self.rpc("signup", vec![credentials]).await?;
        Ok(response.into_result()?)
    }

    /// Authenticates with an existing token. On success the session
    /// keeps this token for subsequent requests.
    pub async fn authenticate(&self, token: &str) -> Result<(), DriverError> {
        let response = self.rpc("authenticate", vec![json!(token)]).await?;
        response.into_result()?;
        Ok(())
    }

    /// Invalidates the current authentication, clearing the session
    /// token.
    pub async fn invalidate(&self) -> Result<(), DriverError> {
        let response = self.rpc("invalidate", vec![]).await?;
        response.into_result()?;
        Ok(())
    }
}
