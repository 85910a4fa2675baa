//! Typed HTTP client for the taskboard board-management REST API
//!
//! This crate wraps the remote board API behind a small typed surface: fetch a
//! board's current state, and fetch the change events recorded after a given
//! board version. Responses arrive wrapped in a reply envelope with
//! PascalCase field names; both are handled here so callers only ever see the
//! typed payloads.
//!
//! ```rust,no_run
//! use taskboard_api::{BoardClient, BoardId, Credentials};
//!
//! # async fn demo() -> taskboard_api::Result<()> {
//! let credentials = Credentials::new("acme", "kanban@example.com", "trustno1");
//! let client = BoardClient::new(credentials)?;
//!
//! let board = client.board(BoardId::new(101)).await?;
//! let updates = client.board_updates(BoardId::new(101), board.version).await?;
//!
//! if updates.has_updates {
//!     println!("{} new events", updates.events.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod types;

pub use client::BoardClient;
pub use credentials::{ClientOptions, Credentials};
pub use error::{ApiError, Result};
pub use types::{BoardId, BoardSummary, ReplyEnvelope, UpdateBatch};
