//! The store mutation contract and the default router reducers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action type of the only mutation the synchronizer dispatches.
pub const UPDATE_LOCATION: &str = "UPDATE_LOCATION";

/// Field holding the router slice in a JSON state document.
pub const ROUTER_FIELD: &str = "router";

/// Mutation sent to the store.
///
/// Serializes as `{"type": "UPDATE_LOCATION", "payload": "/path"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RouterAction {
    #[serde(rename = "UPDATE_LOCATION")]
    UpdateLocation(String),
}

impl RouterAction {
    pub fn update_location(location: impl Into<String>) -> Self {
        Self::UpdateLocation(location.into())
    }

    /// Location carried by the action.
    pub fn location(&self) -> &str {
        match self {
            Self::UpdateLocation(location) => location,
        }
    }
}

/// Reducer for a router slice that is just the location string.
pub fn router_reducer(_state: &str, action: &RouterAction) -> String {
    match action {
        RouterAction::UpdateLocation(location) => location.clone(),
    }
}

/// Applies [`router_reducer`] to the `router` field of a JSON state document.
///
/// Other fields are left untouched. A state that is not an object is replaced
/// by an object holding only the router field.
pub fn json_router_reducer(state: &Value, action: &RouterAction) -> Value {
    let current = state
        .get(ROUTER_FIELD)
        .and_then(Value::as_str)
        .unwrap_or_default();
    let location = Value::String(router_reducer(current, action));

    match state {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            fields.insert(ROUTER_FIELD.to_string(), location);
            Value::Object(fields)
        }
        _ => serde_json::json!({ ROUTER_FIELD: location }),
    }
}

/// Default projection from a state snapshot to its recorded location.
///
/// Implement this for a state type to use `SyncOptions::default()`; states
/// keeping the location elsewhere supply a selector instead.
pub trait RouterLocation {
    /// The recorded location, or `None` when the store has none yet.
    fn router_location(&self) -> Option<String>;
}

impl RouterLocation for Value {
    fn router_location(&self) -> Option<String> {
        self.get(ROUTER_FIELD)
            .and_then(Value::as_str)
            .filter(|location| !location.is_empty())
            .map(str::to_owned)
    }
}

impl RouterLocation for String {
    fn router_location(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.clone())
    }
}
