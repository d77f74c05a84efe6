use super::SurrealClient;
use crate::protocol::DriverError;
use serde_json::{json, Value};
use std::collections::HashMap;

impl SurrealClient {
    /// Selects the namespace for subsequent operations.
    pub async fn use_ns(&self, namespace: &str) -> Result<(), DriverError> {
        let response = self.rpc("use", vec![json!(namespace)]).await?;
        response.into_result()?;
        Ok(())
    }

    /// Selects the database for subsequent operations.
    pub async fn use_db(&self, database: &str) -> Result<(), DriverError> {
        // Positional params cannot express "namespace omitted" ahead of
        // the database, so re-assert whatever is currently selected.
        let namespace = self
            .session()
            .await
            .namespace
            .map_or(Value::Null, Value::String);
        let response = self.rpc("use", vec![namespace, json!(database)]).await?;
        response.into_result()?;
        Ok(())
    }

    /// Stores a session variable merged into every subsequent query.
    pub async fn set(&self, key: &str, value: Value) -> Result<(), DriverError> {
        let response = self.rpc("let", vec![json!(key), value]).await?;
        response.into_result()?;
        Ok(())
    }

    /// Removes a session variable.
    pub async fn unset(&self, key: &str) -> Result<(), DriverError> {
        let response = self.rpc("unset", vec![json!(key)]).await?;
        response.into_result()?;
        Ok(())
    }

    /// Runs a query with optional bindings and returns the result set.
    pub async fn query(
        &self,
        text: &str,
        bind_vars: Option<HashMap<String, Value>>,
    ) -> Result<Value, DriverError> {
        let bindings = match bind_vars {
            Some(vars) => Value::Object(vars.into_iter().collect()),
            None => json!({}),
        };
        let response = self.rpc("query", vec![json!(text), bindings]).await?;
        Ok(response.into_result()?)
    }
}
