//! Boundary between the polling engine and the remote board API

use async_trait::async_trait;
use taskboard_api::{BoardClient, BoardId, BoardSummary, UpdateBatch};

/// The two operations the polling engine needs from the remote API
///
/// [`BoardClient`] is the production implementation; tests implement this
/// trait to script poll outcomes without a server. Retry behavior lives in
/// the session, never here.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Fetch the current board state, used to discover the starting version
    async fn fetch_board(&self, board_id: BoardId) -> taskboard_api::Result<BoardSummary>;

    /// Fetch the change events recorded after the given board version
    async fn fetch_updates_since(
        &self,
        board_id: BoardId,
        version: u64,
    ) -> taskboard_api::Result<UpdateBatch>;
}

#[async_trait]
impl UpdateSource for BoardClient {
    async fn fetch_board(&self, board_id: BoardId) -> taskboard_api::Result<BoardSummary> {
        self.board(board_id).await
    }

    async fn fetch_updates_since(
        &self,
        board_id: BoardId,
        version: u64,
    ) -> taskboard_api::Result<UpdateBatch> {
        self.board_updates(board_id, version).await
    }
}
