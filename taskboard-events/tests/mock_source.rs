//! Mock update source for testing.
//!
//! This module provides an in-memory implementation of the `UpdateSource`
//! trait that serves scripted update batches without making real HTTP calls.
//! The mock supports configurable failure modes and response latency to
//! exercise error handling and cancellation paths.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use taskboard_events::{ApiError, BoardId, BoardSummary, UpdateBatch, UpdateSource};

/// Mock source that pops scripted batches instead of calling the API.
///
/// Clones share state, so a clone handed to a session can still be inspected
/// from the test.
#[derive(Clone, Default)]
pub struct MockSource {
    board_version: Arc<AtomicU64>,
    batches: Arc<Mutex<VecDeque<UpdateBatch>>>,
    should_fail_board: Arc<AtomicBool>,
    should_fail_updates: Arc<AtomicBool>,
    board_calls: Arc<AtomicU32>,
    update_calls: Arc<AtomicU32>,
    seen_versions: Arc<Mutex<Vec<u64>>>,
    response_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockSource {
    /// Create a mock whose board reports the given current version.
    pub fn new(board_version: u64) -> Self {
        Self {
            board_version: Arc::new(AtomicU64::new(board_version)),
            ..Self::default()
        }
    }

    /// Queue a batch; each updates fetch pops the next one. When the queue
    /// is empty the mock answers with a no-updates batch.
    pub fn push_batch(&self, batch: UpdateBatch) {
        self.batches.lock().push_back(batch);
    }

    /// Configure the mock to fail board fetches.
    pub fn set_fail_board(&self, should_fail: bool) {
        self.should_fail_board.store(should_fail, Ordering::Relaxed);
    }

    /// Configure the mock to fail updates fetches.
    pub fn set_fail_updates(&self, should_fail: bool) {
        self.should_fail_updates.store(should_fail, Ordering::Relaxed);
    }

    /// Delay every response, to let tests interleave stop with an in-flight
    /// fetch.
    pub fn set_response_delay(&self, delay: Option<Duration>) {
        *self.response_delay.lock() = delay;
    }

    /// Get the number of times fetch_board was called.
    pub fn board_calls(&self) -> u32 {
        self.board_calls.load(Ordering::Relaxed)
    }

    /// Get the number of times fetch_updates_since was called.
    pub fn update_calls(&self) -> u32 {
        self.update_calls.load(Ordering::Relaxed)
    }

    /// Every `since` version the mock was asked about, in call order.
    pub fn seen_versions(&self) -> Vec<u64> {
        self.seen_versions.lock().clone()
    }

    async fn maybe_delay(&self) {
        let delay = *self.response_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl UpdateSource for MockSource {
    async fn fetch_board(&self, board_id: BoardId) -> Result<BoardSummary, ApiError> {
        self.board_calls.fetch_add(1, Ordering::Relaxed);
        self.maybe_delay().await;

        if self.should_fail_board.load(Ordering::Relaxed) {
            return Err(ApiError::Network(
                "Mock failure: board fetch disabled".to_string(),
            ));
        }

        Ok(BoardSummary {
            id: Some(board_id.as_u64()),
            title: Some("Mock Board".to_string()),
            version: self.board_version.load(Ordering::Relaxed),
        })
    }

    async fn fetch_updates_since(
        &self,
        _board_id: BoardId,
        version: u64,
    ) -> Result<UpdateBatch, ApiError> {
        self.update_calls.fetch_add(1, Ordering::Relaxed);
        self.seen_versions.lock().push(version);
        self.maybe_delay().await;

        if self.should_fail_updates.load(Ordering::Relaxed) {
            return Err(ApiError::Network(
                "Mock failure: update fetch disabled".to_string(),
            ));
        }

        let batch = self.batches.lock().pop_front();
        Ok(batch.unwrap_or_else(|| no_updates(version)))
    }
}

/// Batch reporting no changes past the given version.
pub fn no_updates(version: u64) -> UpdateBatch {
    UpdateBatch {
        has_updates: false,
        current_board_version: version,
        events: Vec::new(),
        new_payload: None,
    }
}

/// Batch carrying raw wire event records at the given board version.
pub fn batch_with_events(version: u64, events: Vec<Value>) -> UpdateBatch {
    UpdateBatch {
        has_updates: true,
        current_board_version: version,
        events: events.into_iter().map(into_record).collect(),
        new_payload: None,
    }
}

/// Batch that also carries the new board state, as board-edit batches do.
pub fn batch_with_payload(version: u64, events: Vec<Value>, payload: Value) -> UpdateBatch {
    UpdateBatch {
        has_updates: true,
        current_board_version: version,
        events: events.into_iter().map(into_record).collect(),
        new_payload: Some(into_record(payload)),
    }
}

fn into_record(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("wire records are objects, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn reports_the_configured_board_version() {
        let source = MockSource::new(7);
        let board = source.fetch_board(BoardId::new(101)).await.unwrap();

        assert_eq!(board.version, 7);
        assert_eq!(board.id, Some(101));
        assert_eq!(source.board_calls(), 1);
    }

    #[tokio::test]
    async fn board_failure_mode_returns_a_network_error() {
        let source = MockSource::new(7);
        source.set_fail_board(true);

        let result = source.fetch_board(BoardId::new(101)).await;
        assert!(result.is_err());
        assert_eq!(source.board_calls(), 1);

        match result.unwrap_err() {
            ApiError::Network(msg) => assert!(msg.contains("Mock failure")),
            other => panic!("expected Network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn pops_scripted_batches_in_order() {
        let source = MockSource::new(1);
        source.push_batch(batch_with_events(
            2,
            vec![json!({"EventType": "CardMoveEvent"})],
        ));
        source.push_batch(no_updates(2));

        let first = source
            .fetch_updates_since(BoardId::new(101), 1)
            .await
            .unwrap();
        assert!(first.has_updates);
        assert_eq!(first.current_board_version, 2);
        assert_eq!(first.events.len(), 1);

        let second = source
            .fetch_updates_since(BoardId::new(101), 2)
            .await
            .unwrap();
        assert!(!second.has_updates);

        assert_eq!(source.update_calls(), 2);
        assert_eq!(source.seen_versions(), vec![1, 2]);
    }

    #[tokio::test]
    async fn answers_no_updates_when_the_queue_is_empty() {
        let source = MockSource::new(3);
        let batch = source
            .fetch_updates_since(BoardId::new(101), 3)
            .await
            .unwrap();

        assert!(!batch.has_updates);
        assert!(batch.events.is_empty());
    }

    #[tokio::test]
    async fn update_failure_mode_returns_a_network_error() {
        let source = MockSource::new(3);
        source.set_fail_updates(true);

        let result = source.fetch_updates_since(BoardId::new(101), 3).await;
        assert!(result.is_err());

        source.set_fail_updates(false);
        assert!(source.fetch_updates_since(BoardId::new(101), 3).await.is_ok());
        assert_eq!(source.update_calls(), 2);
    }

    #[tokio::test]
    async fn response_delay_holds_the_reply() {
        let source = MockSource::new(3);
        source.set_response_delay(Some(Duration::from_millis(20)));

        let start = std::time::Instant::now();
        source
            .fetch_updates_since(BoardId::new(101), 3)
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[tokio::test]
    async fn payload_batches_carry_the_new_board_state() {
        let batch = batch_with_payload(
            2,
            vec![json!({"EventType": "BoardEditEvent"})],
            json!({"Title": "Renamed", "Version": 2}),
        );

        let payload = batch.new_payload.unwrap();
        assert_eq!(payload.get("Title"), Some(&json!("Renamed")));
    }
}
