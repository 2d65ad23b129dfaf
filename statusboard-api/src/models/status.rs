use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// Token stored in the default record returned before the first write.
pub const DEFAULT_STATUS_TOKEN: &str = "unknown";

/// The three states the board understands.
///
/// Tokens are matched ignoring ASCII case, so `online`, `Online` and
/// `ONLINE` all parse to [`ServerStatus::Online`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerStatus {
    Online,
    Offline,
    Unknown,
}

impl ServerStatus {
    pub const ALL: [ServerStatus; 3] = [Self::Online, Self::Offline, Self::Unknown];

    /// Canonical upper-case token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerStatus {
    type Err = ValidationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ValidationError::UnknownStatus(token.to_string()))
    }
}

/// The single persisted status value.
///
/// This is both the stored JSON shape and the body of every successful
/// read. `status` is kept exactly as it was written so a read returns the
/// same record the last writer sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusRecord {
    pub status: String,
    pub message: String,
}

impl StatusRecord {
    /// Builds a record from a known state, using the canonical token.
    pub fn new(status: ServerStatus, message: impl Into<String>) -> Self {
        Self {
            status: status.as_str().to_string(),
            message: message.into(),
        }
    }

    /// The record reported while nothing has been stored yet.
    pub fn unset(message: impl Into<String>) -> Self {
        Self {
            status: DEFAULT_STATUS_TOKEN.to_string(),
            message: message.into(),
        }
    }

    /// Parsed state, if the stored token is one the board knows.
    pub fn server_status(&self) -> Option<ServerStatus> {
        self.status.parse().ok()
    }

    /// Decodes a value read from the key-value store.
    pub fn from_stored(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Encodes the record for the key-value store.
    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Body accepted by the write endpoint.
///
/// Both fields are optional at the parsing layer so that an absent field is
/// reported as a validation failure with a useful message instead of a
/// generic deserialization error. Only a JSON object is accepted; the
/// derived impl would also take a positional array.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct StatusUpdate {
    pub status: Option<String>,
    pub message: Option<String>,
}

impl<'de> Deserialize<'de> for StatusUpdate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        Ok(StatusUpdate {
            status: take_string_field(&mut fields, "status")?,
            message: take_string_field(&mut fields, "message")?,
        })
    }
}

/// Absent and `null` both read as `None`; any other non-string is an error.
fn take_string_field<E: de::Error>(
    fields: &mut Map<String, Value>,
    name: &str,
) -> Result<Option<String>, E> {
    match fields.remove(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(E::custom(format!("field `{}` must be a string", name))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("unrecognized status '{0}', expected one of ONLINE, OFFLINE, UNKNOWN")]
    UnknownStatus(String),
}

impl StatusUpdate {
    /// Checks the payload and turns it into the record to store.
    ///
    /// Both fields must be present and non-blank, and `status` must be one
    /// of the known tokens.
    pub fn validate(self) -> Result<StatusRecord, ValidationError> {
        let status = self.status.filter(|s| !s.trim().is_empty());
        let message = self.message.filter(|m| !m.trim().is_empty());

        let (status, message) = match (status, message) {
            (Some(status), Some(message)) => (status, message),
            (status, message) => {
                let mut missing = Vec::new();
                if status.is_none() {
                    missing.push("status");
                }
                if message.is_none() {
                    missing.push("message");
                }
                return Err(ValidationError::MissingFields(missing));
            }
        };

        status.parse::<ServerStatus>()?;

        Ok(StatusRecord { status, message })
    }
}
