//! Reservation model and the payload shapes used around it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Fields a create or update payload must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "date", "startTime", "endTime", "roomNumber"];

/// Fields owned by the server. Values for these in a payload are ignored.
pub const SERVER_MANAGED_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// Participant names, stored either as one comma-joined string or as a list.
///
/// Older clients send `"Alice, Bob"`, newer ones send `["Alice", "Bob"]`.
/// Both are accepted and written back in the shape they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attendees {
    List(Vec<String>),
    Joined(String),
}

impl Attendees {
    /// Individual names, trimmed, with blanks dropped.
    pub fn names(&self) -> Vec<String> {
        match self {
            Attendees::List(names) => names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect(),
            Attendees::Joined(joined) => split_attendees(joined),
        }
    }

    /// Names joined for display, `"Alice, Bob"`.
    pub fn joined(&self) -> String {
        self.names().join(", ")
    }
}

/// Split a comma-joined attendee string into trimmed, non-empty names.
pub fn split_attendees(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// A booking of a room for a time interval on a date.
///
/// Typed view of a [`ReservationDocument`], as read by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub room_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Attendees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Any additional fields a client stored on the document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A reservation as the server stores it: the JSON document exactly as merged
/// from client payloads plus the server-managed fields.
///
/// Field values are not type-checked; `roomNumber: 101` or an explicit
/// `"description": null` are kept as sent. Use
/// [`to_reservation`](Self::to_reservation) for a typed view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationDocument(Map<String, Value>);

impl ReservationDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The `id` field, empty if absent or not a string.
    pub fn id(&self) -> &str {
        self.str_field("id").unwrap_or_default()
    }

    pub fn created_at(&self) -> Option<&str> {
        self.str_field("createdAt")
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.str_field("updatedAt")
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Typed view. Fails if a known field holds a value of the wrong type.
    pub fn to_reservation(&self) -> Result<Reservation, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }
}

/// Incoming create/update body: an arbitrary JSON object, merged shallowly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationPatch(Map<String, Value>);

impl ReservationPatch {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Parse a raw request body. An empty body is an empty object.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(body)? {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(AppError::Malformed(
                "Request body must be a JSON object".to_string(),
            )),
        }
    }

    /// First required field that is absent or falsy.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        REQUIRED_FIELDS
            .into_iter()
            .find(|field| !self.0.get(*field).is_some_and(is_truthy))
    }

    /// Client-supplied fields with server-managed ones removed.
    pub fn into_client_fields(mut self) -> Map<String, Value> {
        for field in SERVER_MANAGED_FIELDS {
            self.0.remove(field);
        }
        self.0
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Result of a service-level delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub id: String,
    pub deleted: bool,
}

/// Body returned by `DELETE /reservations/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
    pub message: String,
}

/// Typed payload sent by the client for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationInput {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub room_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
