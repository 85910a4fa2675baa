//! # taskboard-events - Board Event Streaming over Polling
//!
//! Watches a taskboard board for changes and delivers them as typed
//! notifications on named channels:
//!
//! ```rust,no_run
//! use taskboard_events::{channel, BoardId, Credentials, EventSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), taskboard_events::EventsError> {
//!     let credentials = Credentials::new("acme", "user@example.com", "secret");
//!     let session = EventSession::connect(credentials, BoardId::new(101), SessionConfig::new())?;
//!
//!     let mut card_moves = session.subscribe(channel::CARD_MOVE);
//!     let mut errors = session.subscribe(channel::ERROR);
//!     session.start();
//!
//!     loop {
//!         tokio::select! {
//!             Some(notification) = card_moves.recv() => {
//!                 if let Some(event) = notification.as_event() {
//!                     println!("card moved, board now at version {}", event.board_version());
//!                 }
//!             }
//!             Some(notification) = errors.recv() => {
//!                 if let Some(error) = notification.as_error() {
//!                     eprintln!("poll failed: {}", error);
//!                 }
//!             }
//!             else => break,
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Named channels**: subscribe to exactly the event types you care about,
//!   plus the built-in `debug`, `polling`, and `error` channels
//! - **Monotonic version cursor**: each board event is delivered at most once
//!   for the life of a session
//! - **Single pending wake**: polls never stack, no matter how slow the server
//! - **Camel-cased payloads**: wire field names are normalized before delivery
//! - **Pluggable transport**: the [`UpdateSource`] trait decouples the polling
//!   engine from HTTP for testing

// Main exports
pub use config::SessionConfig;
pub use error::{EventsError, Result};
pub use session::{EventSession, Phase, SessionStats};

// Event model
pub use classify::{canonical_event_type, classify_batch, classify_record};
pub use event::{channel, BoardEvent};
pub use normalize::{camel_key, camelize, camelize_map, kebab_key};
pub use notifier::{Notification, NotificationStream, Notifier, OnceNotification, SubscriberId};
pub use source::UpdateSource;

// Re-export commonly used types from taskboard-api
pub use taskboard_api::{
    ApiError, BoardClient, BoardId, BoardSummary, ClientOptions, Credentials, UpdateBatch,
};

// Internal modules
mod classify;
mod config;
mod error;
mod event;
pub mod logging;
mod normalize;
mod notifier;
mod session;
mod source;
mod timer;
