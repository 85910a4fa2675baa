//! Wire types for the board-management REST API
//!
//! Every response body is wrapped in a [`ReplyEnvelope`] and uses PascalCase
//! field names. The serde renames here are the single place that casing
//! convention is spelled out; nothing above this crate sees it.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

/// Unique identifier for a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardId(u64);

impl BoardId {
    /// Create a new BoardId with the given value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Envelope wrapping every API response
///
/// Successful payloads arrive as the first element of `ReplyData`. Some
/// endpoints omit `ReplyCode` entirely; those are treated as successful.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplyEnvelope<T> {
    /// Application status code, 2xx on success
    #[serde(default = "default_reply_code")]
    pub reply_code: u16,

    /// Human-readable status text
    #[serde(default)]
    pub reply_text: String,

    /// Payload items, at most one for the endpoints used here
    // Path form: the bare attribute would bound the derived impl on
    // T: Default.
    #[serde(default = "Vec::new")]
    pub reply_data: Vec<T>,
}

fn default_reply_code() -> u16 {
    200
}

impl<T> ReplyEnvelope<T> {
    /// Unwrap the payload, surfacing envelope-level failures
    pub fn into_payload(self) -> Result<T> {
        if !(200..300).contains(&self.reply_code) {
            return Err(ApiError::Api {
                code: self.reply_code,
                text: self.reply_text,
            });
        }

        self.reply_data
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Decode("reply envelope carried no payload".to_string()))
    }
}

/// Current state of a board as reported by the board endpoint
///
/// The full response carries lanes, cards and layout; only the fields the
/// polling engine needs are decoded, the rest is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoardSummary {
    /// Board identifier
    #[serde(default)]
    pub id: Option<u64>,

    /// Board title
    #[serde(default)]
    pub title: Option<String>,

    /// Current board version, advanced by the server on every change
    pub version: u64,
}

/// One batch of change events recorded after a given board version
///
/// When `has_updates` is false the remaining fields are absent on the wire
/// and default to their empty values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UpdateBatch {
    /// Whether any events were recorded after the requested version
    pub has_updates: bool,

    /// The board version as of this batch
    pub current_board_version: u64,

    /// Raw event records in the order the server recorded them
    pub events: Vec<Map<String, Value>>,

    /// Full new board state, present only alongside board-edit events
    pub new_payload: Option<Map<String, Value>>,
}
