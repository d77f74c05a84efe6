use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// Connection state carried across stateless HTTP exchanges.
///
/// One instance per client; the engine is its only owner. Nothing here
/// survives a disconnect.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Server endpoint; present iff a connection attempt has been made.
    pub endpoint: Option<Url>,
    pub namespace: Option<String>,
    pub database: Option<String>,
    /// Opaque credential, mutated only by the auth method outcomes.
    pub token: Option<String>,
    /// Variables merged into every `query` call.
    pub variables: HashMap<String, Value>,
}

impl Session {
    /// Whether a namespace and database are both selected and non-empty.
    pub fn has_selection(&self) -> bool {
        self.namespace.as_deref().is_some_and(|ns| !ns.is_empty())
            && self.database.as_deref().is_some_and(|db| !db.is_empty())
    }

    pub(crate) fn reset(&mut self) {
        *self = Session::default();
    }
}

/// Logical connection status, observable through the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Disconnected,
    Connecting,
    Connected,
    /// Reserved for transport collaborators; never set by the engine.
    Error,
}
