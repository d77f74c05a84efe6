use super::SurrealClient;
use crate::protocol::DriverError;
use std::time::Duration;
use url::Url;

impl SurrealClient {
    /// Probes a server for its build version.
    ///
    /// Independent of the session state machine: the URL is taken as
    /// given and no headers or session fields are involved.
    pub async fn version(&self, endpoint: &Url, timeout: Duration) -> Result<String, DriverError> {
        let response = self
            .http
            .get(endpoint.clone())
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            let body = response.bytes().await?.to_vec();
            let message = String::from_utf8_lossy(&body).into_owned();
            return Err(DriverError::HttpConnection {
                status: status.as_u16(),
                reason,
                message,
                body,
            });
        }

        Ok(response.text().await?)
    }
}
