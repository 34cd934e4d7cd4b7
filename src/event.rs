//! Event — the value delivered to listeners on each dispatch.

use serde_json::Value;

/// A dispatched event: the event name plus a caller-supplied `detail`
/// payload.
///
/// `detail` defaults to an empty JSON object when the caller omits it, so
/// listeners can always read it without a null check.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    name: String,
    detail: Value,
}

impl Event {
    /// Build an event for `name`. A `None` detail becomes `{}`.
    pub fn new(name: impl Into<String>, detail: Option<Value>) -> Self {
        Self {
            name: name.into(),
            detail: detail.unwrap_or_else(|| Value::Object(serde_json::Map::new())),
        }
    }

    /// The event name this value was dispatched under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The caller-supplied payload.
    pub fn detail(&self) -> &Value {
        &self.detail
    }
}
