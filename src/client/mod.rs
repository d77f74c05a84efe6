//! HTTP session engine
//!
//! A "connection" here is purely logical: the server is contacted with
//! independent HTTP POST exchanges, and everything that makes the calls
//! feel connected (namespace/database selection, auth token, session
//! variables) lives in the [`Session`] record owned by the client.

mod auth;
mod builder;
mod events;
mod query;
mod session;
mod version;

pub use builder::SurrealClientBuilder;
pub use events::Event;
pub use session::{Session, Status};

use crate::protocol::{
    codec, next_id, DriverError, Method, RpcOutcome, RpcRequest, RpcResponse,
};
use events::EventBus;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use tokio::sync::{broadcast, watch, RwLock};
use tracing::{debug, info, trace, warn};
use url::Url;

const NS_HEADER: &str = "Surreal-NS";
const DB_HEADER: &str = "Surreal-DB";

/// Client driver for a SurrealDB-compatible server over HTTP.
///
/// One instance owns one logical session. Methods take `&self`, so a
/// client wrapped in `Arc` supports concurrent in-flight calls; each
/// call carries its own correlation id and there is no ordering between
/// concurrently completing responses.
pub struct SurrealClient {
    http: reqwest::Client,
    session: RwLock<Session>,
    status: watch::Sender<Status>,
    events: EventBus,
}

impl SurrealClient {
    pub fn new() -> Self {
        SurrealClientBuilder::new().build()
    }

    pub fn builder() -> SurrealClientBuilder {
        SurrealClientBuilder::new()
    }

    pub(crate) fn with_http(http: reqwest::Client) -> Self {
        let (status, _) = watch::channel(Status::Disconnected);
        SurrealClient {
            http,
            session: RwLock::new(Session::default()),
            status,
            events: EventBus::new(),
        }
    }

    /// Records the endpoint and marks the session ready.
    ///
    /// No network handshake happens here; transport errors surface on
    /// the first rpc. Calling again overwrites the endpoint.
    pub async fn connect(&self, endpoint: Url) {
        {
            let mut session = self.session.write().await;
            session.endpoint = Some(endpoint.clone());
        }
        self.set_status(Status::Connecting);
        self.set_status(Status::Connected);
        info!(%endpoint, "connected");
    }

    /// Destroys the session and clears the readiness gate.
    ///
    /// Every session field is reset; subsequent rpc calls fail fast
    /// with [`DriverError::ConnectionUnavailable`].
    pub async fn disconnect(&self) {
        self.session.write().await.reset();
        self.set_status(Status::Disconnected);
        info!("disconnected");
    }

    /// Whether an endpoint is currently recorded. Does not imply a
    /// namespace/database selection.
    pub async fn connected(&self) -> bool {
        self.session.read().await.endpoint.is_some()
    }

    pub fn status(&self) -> Status {
        *self.status.borrow()
    }

    /// Snapshot of the current session record.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Subscribes to status transitions and rpc completions.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Performs one rpc exchange.
    ///
    /// `use`, `let` and `unset` are resolved locally against the session
    /// and return a synthetic success without touching the network;
    /// `query` has the session variables merged into its bindings before
    /// transmission; everything else is forwarded verbatim. A success
    /// response from the four auth methods rotates the session token.
    pub async fn rpc(&self, method: &str, mut params: Vec<Value>) -> Result<RpcResponse, DriverError> {
        self.wait_ready().await;

        let dispatch = Method::parse(method);
        let snapshot = self.session.read().await.clone();

        let endpoint = snapshot
            .endpoint
            .clone()
            .ok_or(DriverError::ConnectionUnavailable)?;
        if dispatch.requires_selection() && !snapshot.has_selection() {
            return Err(DriverError::MissingNamespaceDatabase);
        }

        match dispatch {
            Method::Use => return self.apply_use(&params).await,
            Method::Let => return self.apply_let(&params).await,
            Method::Unset => return self.apply_unset(&params).await,
            Method::Query => merge_query_vars(&mut params, &snapshot),
            _ => {}
        }

        // `authenticate` takes its token from the request, not the
        // response, so capture it before the params move into the
        // envelope.
        let request_token = match dispatch {
            Method::Authenticate => params
                .first()
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };

        let id = next_id();
        let request = RpcRequest {
            id,
            method: method.to_string(),
            params,
        };
        trace!(id, method, "sending rpc request");
        let body = codec::encode(&request)?;

        let mut http_request = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, codec::CBOR_MIME)
            .header(ACCEPT, codec::CBOR_MIME)
            .body(body);
        if let Some(ns) = &snapshot.namespace {
            http_request = http_request.header(NS_HEADER, ns);
        }
        if let Some(db) = &snapshot.database {
            http_request = http_request.header(DB_HEADER, db);
        }
        if let Some(token) = &snapshot.token {
            http_request = http_request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let http_response = http_request.send().await?;
        let status = http_response.status();
        if status != reqwest::StatusCode::OK {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            let body = http_response.bytes().await?.to_vec();
            let message = String::from_utf8_lossy(&body).into_owned();
            warn!(id, method, status = status.as_u16(), "rpc request rejected");
            return Err(DriverError::HttpConnection {
                status: status.as_u16(),
                reason,
                message,
                body,
            });
        }

        let bytes = http_response.bytes().await?;
        let response: RpcResponse = codec::decode(&bytes)?;

        if let RpcOutcome::Result(result) = &response.outcome {
            self.apply_auth_outcome(dispatch, result, request_token).await;
        }

        let correlation = response.id.unwrap_or(id);
        self.events.publish(Event::Completion {
            id: correlation,
            response: response.clone(),
        });
        debug!(id, method, success = response.is_success(), "rpc completed");

        Ok(response)
    }

    /// Parks the caller only while a connect is in flight; a session
    /// that was never connected (or was disconnected) falls through so
    /// the endpoint guard fails fast instead of hanging.
    async fn wait_ready(&self) {
        let mut status = self.status.subscribe();
        if matches!(*status.borrow_and_update(), Status::Connecting) {
            let _ = status
                .wait_for(|s| !matches!(s, Status::Connecting))
                .await;
        }
    }

    fn set_status(&self, status: Status) {
        self.status.send_replace(status);
        self.events.publish(Event::Status(status));
        debug!(?status, "status changed");
    }

    async fn apply_use(&self, params: &[Value]) -> Result<RpcResponse, DriverError> {
        // Validate both parameters before either field is written so a
        // bad one cannot leave the selection half-applied.
        let namespace = selection_update(params.first(), "namespace")?;
        let database = selection_update(params.get(1), "database")?;

        let mut session = self.session.write().await;
        if let Some(update) = namespace {
            session.namespace = update;
        }
        if let Some(update) = database {
            session.database = update;
        }
        debug!(
            namespace = session.namespace.as_deref(),
            database = session.database.as_deref(),
            "selection changed"
        );

        Ok(RpcResponse::result(Value::Bool(true)))
    }

    async fn apply_let(&self, params: &[Value]) -> Result<RpcResponse, DriverError> {
        let key = variable_key(params.first(), "let")?;
        let value = params.get(1).cloned().unwrap_or(Value::Null);

        self.session.write().await.variables.insert(key, value);
        Ok(RpcResponse::result(Value::Bool(true)))
    }

    async fn apply_unset(&self, params: &[Value]) -> Result<RpcResponse, DriverError> {
        let key = variable_key(params.first(), "unset")?;

        self.session.write().await.variables.remove(&key);
        Ok(RpcResponse::result(Value::Bool(true)))
    }

    async fn apply_auth_outcome(
        &self,
        dispatch: Method,
        result: &Value,
        request_token: Option<String>,
    ) {
        match dispatch {
            Method::Signin | Method::Signup => {
                let mut session = self.session.write().await;
                match result {
                    Value::String(token) => session.token = Some(token.clone()),
                    Value::Null => session.token = None,
                    _ => {}
                }
            }
            Method::Authenticate => {
                if let Some(token) = request_token {
                    self.session.write().await.token = Some(token);
                }
            }
            Method::Invalidate => {
                self.session.write().await.token = None;
            }
            _ => {}
        }
    }
}

impl Default for SurrealClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a positional `use` parameter onto a field update: absent leaves
/// the field alone, explicit null clears it, a string sets it.
fn selection_update(
    param: Option<&Value>,
    what: &str,
) -> Result<Option<Option<String>>, DriverError> {
    match param {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(other) => Err(DriverError::Protocol(format!(
            "use expects a string or null {}, got {}",
            what, other
        ))),
    }
}

fn variable_key(param: Option<&Value>, method: &str) -> Result<String, DriverError> {
    param
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            DriverError::Protocol(format!("{} expects a string variable name", method))
        })
}

/// Rewrites `params[1]` into the session variables merged with the
/// caller's bindings, caller keys winning on conflict.
fn merge_query_vars(params: &mut Vec<Value>, session: &Session) {
    let mut merged = Map::new();
    for (key, value) in &session.variables {
        merged.insert(key.clone(), value.clone());
    }
    if let Some(Value::Object(bindings)) = params.get(1) {
        for (key, value) in bindings {
            merged.insert(key.clone(), value.clone());
        }
    }

    if params.is_empty() {
        params.push(Value::Null);
    }
    if params.len() < 2 {
        params.push(Value::Object(merged));
    } else {
        params[1] = Value::Object(merged);
    }
}
