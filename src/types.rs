use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A whitelisted vehicle as held by the gate server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub plate: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
}

impl Vehicle {
    pub fn new(plate: impl Into<String>, note: impl Into<String>) -> Self {
        Vehicle {
            plate: plate.into(),
            note: note.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One plate read by the gate camera, newest first in `/api/recent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub plate: String,
    pub confidence: f64,
    pub allowed: bool,
    #[serde(default)]
    pub time: String,
}

impl RecognitionResult {
    pub fn status(&self) -> Status {
        if self.allowed {
            Status::Allowed
        } else {
            Status::Denied
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Allowed,
    Denied,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Allowed => "Allowed",
            Status::Denied => "Denied",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            Status::Allowed => "badge bg-success",
            Status::Denied => "badge bg-danger",
        }
    }
}

/// What an add/delete response asked the UI to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message(String),
    Error(String),
    /// Neither `message` nor `error` was present.
    Silent,
}

impl From<&Value> for Reply {
    fn from(value: &Value) -> Self {
        // Empty strings count as absent.
        let field = |name: &str| value[name].as_str().filter(|s| !s.is_empty());
        if let Some(message) = field("message") {
            Reply::Message(message.to_string())
        } else if let Some(error) = field("error") {
            Reply::Error(error.to_string())
        } else {
            Reply::Silent
        }
    }
}
