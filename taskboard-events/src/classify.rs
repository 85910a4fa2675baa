//! Turns raw wire event records into normalized [`BoardEvent`]s

use serde_json::{Map, Value};
use taskboard_api::UpdateBatch;

use crate::event::{channel, BoardEvent};
use crate::normalize::{camelize_map, kebab_key};

/// Canonicalize a wire event type to its channel name
///
/// The wire reports PascalCase type names with an `Event` suffix
/// (`ActivityTypesChangedEvent`). The canonical form is the lower-case
/// hyphenated name with one trailing `-event` stripped
/// (`activity-types-changed`). Only a trailing suffix is removed, so a type
/// with `Event` in the middle keeps it.
pub fn canonical_event_type(wire_type: &str) -> String {
    let kebab = kebab_key(wire_type);
    match kebab.strip_suffix("-event") {
        Some(stripped) => stripped.to_string(),
        None => kebab,
    }
}

/// Classify one raw event record against its batch context
///
/// The record's keys are normalized to camelCase, the `eventType` field is
/// promoted out of the payload into its canonical form, and board-edit
/// events get the batch's new board state attached.
pub fn classify_record(
    record: &Map<String, Value>,
    batch_version: u64,
    new_payload: Option<&Map<String, Value>>,
) -> BoardEvent {
    let mut fields = camelize_map(record);

    let wire_type = match fields.remove("eventType") {
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let event_type = canonical_event_type(&wire_type);

    let board = if event_type == channel::BOARD_EDIT {
        new_payload.map(camelize_map)
    } else {
        None
    };

    BoardEvent::new(event_type, batch_version, fields, board)
}

/// Classify every record in a batch, preserving server order
///
/// A batch that reports no updates yields no events regardless of what else
/// it carries.
pub fn classify_batch(batch: &UpdateBatch) -> Vec<BoardEvent> {
    if !batch.has_updates {
        return Vec::new();
    }

    batch
        .events
        .iter()
        .map(|record| {
            classify_record(
                record,
                batch.current_board_version,
                batch.new_payload.as_ref(),
            )
        })
        .collect()
}
