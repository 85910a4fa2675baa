//! Normalized board events and the channels they are delivered on

use serde::Serialize;
use serde_json::{Map, Value};

/// Channel names notifications are published under
///
/// Besides the three engine channels (`debug`, `polling`, `error`), every
/// canonical event type is its own channel, so subscribers pick exactly the
/// event kinds they care about.
pub mod channel {
    /// Diagnostic trace messages from the polling engine
    pub const DEBUG: &str = "debug";
    /// Fired immediately before each updates fetch
    pub const POLLING: &str = "polling";
    /// Fetch and discovery failures
    pub const ERROR: &str = "error";

    pub const ACTIVITY_TYPES_CHANGED: &str = "activity-types-changed";
    pub const BOARD_CARD_TYPES_CHANGED: &str = "board-card-types-changed";
    pub const BOARD_EDIT: &str = "board-edit";
    pub const ATTACHMENT_CHANGE: &str = "attachment-change";
    pub const CARD_BLOCKED: &str = "card-blocked";
    pub const COMMENT_POST: &str = "comment-post";
    pub const CARD_CREATION: &str = "card-creation";
    pub const CARD_DELETED: &str = "card-deleted";
    pub const CARD_FIELDS_CHANGED: &str = "card-fields-changed";
    pub const CARD_MOVE_FROM_BOARD: &str = "card-move-from-board";
    pub const CARD_MOVE_TO_BOARD: &str = "card-move-to-board";
    pub const CARD_MOVE: &str = "card-move";
    pub const USER_ASSIGNMENT: &str = "user-assignment";

    /// Every channel that carries board events, one per canonical event type
    pub const EVENT_CHANNELS: [&str; 13] = [
        ACTIVITY_TYPES_CHANGED,
        BOARD_CARD_TYPES_CHANGED,
        BOARD_EDIT,
        ATTACHMENT_CHANGE,
        CARD_BLOCKED,
        COMMENT_POST,
        CARD_CREATION,
        CARD_DELETED,
        CARD_FIELDS_CHANGED,
        CARD_MOVE_FROM_BOARD,
        CARD_MOVE_TO_BOARD,
        CARD_MOVE,
        USER_ASSIGNMENT,
    ];
}

/// A normalized board change event
///
/// Carries the canonical event type, the board version the event was
/// observed at, the camelCase payload fields from the wire record, and, for
/// board-edit events only, the normalized new board state. Immutable once
/// built; the notifier shares one instance across all subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEvent {
    event_type: String,
    board_version: u64,
    #[serde(flatten)]
    fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<Map<String, Value>>,
}

impl BoardEvent {
    /// Assemble an event from classified parts
    pub fn new(
        event_type: String,
        board_version: u64,
        fields: Map<String, Value>,
        board: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            event_type,
            board_version,
            fields,
            board,
        }
    }

    /// Canonical event type, which is also the channel this event is
    /// published on
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Board version this event was observed at
    pub fn board_version(&self) -> u64 {
        self.board_version
    }

    /// Server-side timestamp, passed through uninterpreted
    pub fn event_date_time(&self) -> Option<&str> {
        self.fields.get("eventDateTime").and_then(Value::as_str)
    }

    /// Look up a normalized payload field by its camelCase name
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All normalized payload fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The new board state attached to board-edit events
    pub fn board(&self) -> Option<&Map<String, Value>> {
        self.board.as_ref()
    }

    /// Render the event as the JSON object subscribers in other languages
    /// would see: payload fields plus `eventType`, `boardVersion` and, when
    /// present, `board`
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(self.fields.len() + 3);
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone());
        }
        map.insert(
            "eventType".to_string(),
            Value::String(self.event_type.clone()),
        );
        map.insert("boardVersion".to_string(), Value::from(self.board_version));
        if let Some(board) = &self.board {
            map.insert("board".to_string(), Value::Object(board.clone()));
        }
        Value::Object(map)
    }
}
