//! Polling session lifecycle
//!
//! An [`EventSession`] tracks one board. Started, it discovers the board's
//! current version when none was supplied, then alternates between fetching
//! updates and waiting out the poll interval. Every poll advances the
//! version cursor monotonically, so an event is delivered at most once for
//! the life of the session.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use taskboard_api::{ApiError, BoardClient, BoardId, Credentials};

use crate::classify::classify_batch;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::event::{channel, BoardEvent};
use crate::notifier::{
    Notification, NotificationStream, Notifier, OnceNotification, SubscriberId,
};
use crate::source::UpdateSource;
use crate::timer::PollTimer;

/// Where the session is in its polling cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not polling. The state before `start` and after `stop`.
    Idle,
    /// Fetching the board to learn its current version
    Discovering,
    /// An update request is in flight
    Fetching,
    /// Waiting out the poll interval before the next fetch
    Waiting,
}

impl Phase {
    /// True for every phase except `Idle`
    pub fn is_active(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Discovering => "discovering",
            Phase::Fetching => "fetching",
            Phase::Waiting => "waiting",
        };
        write!(f, "{}", name)
    }
}

/// Counters and cursor state for a running session
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub board_id: BoardId,
    pub version: u64,
    pub phase: Phase,
    pub poll_count: u64,
    pub error_count: u64,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "board {}: {} at version {}, polls: {}, errors: {}",
            self.board_id, self.phase, self.version, self.poll_count, self.error_count
        )
    }
}

/// A polling session against one board
///
/// Subscribe to the channels you care about before calling [`start`], then
/// read notifications from the returned streams. Dropping the session stops
/// it.
///
/// [`start`]: EventSession::start
pub struct EventSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    source: Arc<dyn UpdateSource>,
    notifier: Notifier,
    board_id: BoardId,
    config: SessionConfig,
    version: AtomicU64,
    // Every notification is published while holding this lock, behind an
    // epoch check, so nothing lands on a channel once stop has returned.
    phase: Mutex<Phase>,
    // Bumped by stop; in-flight work from an older epoch is discarded.
    epoch: AtomicU64,
    timer: PollTimer,
    poll_count: AtomicU64,
    error_count: AtomicU64,
}

impl EventSession {
    /// Create a session over any update source
    ///
    /// Returns a configuration error if `config` fails validation. The
    /// session starts idle; nothing is fetched until [`start`] or
    /// [`check_for_updates`] is called.
    ///
    /// [`start`]: EventSession::start
    /// [`check_for_updates`]: EventSession::check_for_updates
    pub fn new(
        source: Arc<dyn UpdateSource>,
        board_id: BoardId,
        config: SessionConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(SessionInner {
                source,
                notifier: Notifier::new(),
                board_id,
                version: AtomicU64::new(config.starting_version),
                config,
                phase: Mutex::new(Phase::Idle),
                epoch: AtomicU64::new(0),
                timer: PollTimer::new(),
                poll_count: AtomicU64::new(0),
                error_count: AtomicU64::new(0),
            }),
        })
    }

    /// Create a session backed by a [`BoardClient`] built from credentials
    pub fn connect(
        credentials: Credentials,
        board_id: BoardId,
        config: SessionConfig,
    ) -> Result<Self> {
        let client = BoardClient::new(credentials)?;
        Self::new(Arc::new(client), board_id, config)
    }

    /// Begin polling
    ///
    /// Ignored unless the session is idle. With a starting version of zero
    /// the session first fetches the board to discover its current version;
    /// otherwise it polls for updates right away. Must be called from within
    /// a Tokio runtime.
    pub fn start(&self) {
        let epoch;
        let discovering;
        {
            let mut phase = self.inner.phase.lock();
            if *phase != Phase::Idle {
                tracing::debug!("start ignored: session already {}", *phase);
                return;
            }
            discovering = self.inner.version.load(Ordering::Acquire) == 0;
            *phase = if discovering {
                Phase::Discovering
            } else {
                Phase::Fetching
            };
            epoch = self.inner.epoch.load(Ordering::Acquire);
            self.inner.notify_debug(format!(
                "starting event session for board {}",
                self.inner.board_id
            ));
        }

        let inner = Arc::clone(&self.inner);
        if discovering {
            tokio::spawn(inner.run_discovery(epoch));
        } else {
            tokio::spawn(inner.run_poll(epoch));
        }
    }

    /// Stop polling
    ///
    /// Idempotent. Cancels the pending wake if one is armed, and any poll
    /// response still in flight is discarded when it lands. Subscribers
    /// receive nothing further once this returns.
    pub fn stop(&self) {
        {
            let mut phase = self.inner.phase.lock();
            if *phase == Phase::Idle {
                return;
            }
            self.inner.epoch.fetch_add(1, Ordering::AcqRel);
            self.inner.timer.cancel();
            *phase = Phase::Idle;
        }
        tracing::debug!("event session stopped for board {}", self.inner.board_id);
    }

    /// Fetch and classify updates once, outside the polling loop
    ///
    /// Advances the shared version cursor the same way polling does, but
    /// publishes nothing; the events come back to the caller. Usable whether
    /// or not the session is started.
    pub async fn check_for_updates(&self) -> Result<Vec<BoardEvent>> {
        Ok(self.inner.fetch_and_classify().await?)
    }

    /// Register a persistent subscription on a channel
    ///
    /// Channel names are the canonical event types plus the built-in
    /// `debug`, `polling`, and `error` channels. See
    /// [`channel`](crate::event::channel).
    pub fn subscribe(&self, channel: impl Into<String>) -> NotificationStream {
        self.inner.notifier.subscribe(channel)
    }

    /// Register a one-time subscription on a channel
    pub fn subscribe_once(&self, channel: impl Into<String>) -> OnceNotification {
        self.inner.notifier.subscribe_once(channel)
    }

    /// Remove a subscription from a channel
    pub fn unsubscribe(&self, channel: &str, id: SubscriberId) -> bool {
        self.inner.notifier.unsubscribe(channel, id)
    }

    /// The board this session polls
    pub fn board_id(&self) -> BoardId {
        self.inner.board_id
    }

    /// The version cursor: updates strictly newer than this are fetched next
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Current phase of the polling cycle
    pub fn phase(&self) -> Phase {
        *self.inner.phase.lock()
    }

    /// True while the session is started
    pub fn is_active(&self) -> bool {
        self.phase().is_active()
    }

    /// Snapshot of the session's counters
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            board_id: self.inner.board_id,
            version: self.version(),
            phase: self.phase(),
            poll_count: self.inner.poll_count.load(Ordering::Relaxed),
            error_count: self.inner.error_count.load(Ordering::Relaxed),
        }
    }
}

impl Drop for EventSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for EventSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSession")
            .field("board_id", &self.inner.board_id)
            .field("phase", &self.phase())
            .field("version", &self.version())
            .finish()
    }
}

impl SessionInner {
    fn epoch_is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::Acquire) == epoch
    }

    fn notify_debug(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}", message);
        self.notifier.publish(channel::DEBUG, Notification::Debug(message));
    }

    async fn run_discovery(self: Arc<Self>, epoch: u64) {
        {
            let phase = self.phase.lock();
            if !self.epoch_is_current(epoch) || *phase != Phase::Discovering {
                return;
            }
            self.notify_debug(format!(
                "discovering current version for board {}",
                self.board_id
            ));
        }

        match self.source.fetch_board(self.board_id).await {
            Ok(board) => {
                {
                    let mut phase = self.phase.lock();
                    if !self.epoch_is_current(epoch) {
                        tracing::debug!(
                            "discarding discovery response for board {} after stop",
                            self.board_id
                        );
                        return;
                    }
                    self.version.fetch_max(board.version, Ordering::AcqRel);
                    *phase = Phase::Fetching;
                    self.notify_debug(format!(
                        "board {} is at version {}",
                        self.board_id,
                        self.version.load(Ordering::Acquire)
                    ));
                }
                self.run_poll(epoch).await;
            }
            Err(error) => {
                let mut phase = self.phase.lock();
                if !self.epoch_is_current(epoch) {
                    return;
                }
                *phase = Phase::Idle;
                self.error_count.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    "version discovery failed for board {}: {}",
                    self.board_id,
                    error
                );
                self.notifier
                    .publish(channel::ERROR, Notification::Error(Arc::new(error)));
            }
        }
    }

    async fn run_poll(self: Arc<Self>, epoch: u64) {
        let since = {
            let phase = self.phase.lock();
            if !self.epoch_is_current(epoch) || *phase != Phase::Fetching {
                return;
            }
            let since = self.version.load(Ordering::Acquire);
            self.poll_count.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                "polling board {} for updates since version {}",
                self.board_id,
                since
            );
            self.notifier.publish(
                channel::POLLING,
                Notification::Polling {
                    board_id: self.board_id,
                    version: since,
                },
            );
            since
        };

        let outcome = self.source.fetch_updates_since(self.board_id, since).await;

        match outcome {
            Ok(batch) => {
                {
                    // A response landing after stop is dropped wholesale:
                    // the cursor stays put and nothing is published.
                    let phase = self.phase.lock();
                    if !self.epoch_is_current(epoch) || *phase == Phase::Idle {
                        tracing::debug!(
                            "discarding poll response for board {} after stop",
                            self.board_id
                        );
                        return;
                    }
                    if batch.has_updates {
                        self.version
                            .fetch_max(batch.current_board_version, Ordering::AcqRel);
                    }
                    let events = classify_batch(&batch);
                    if !events.is_empty() {
                        self.notify_debug(format!(
                            "board {} advanced to version {} with {} events",
                            self.board_id,
                            self.version.load(Ordering::Acquire),
                            events.len()
                        ));
                    }
                    for event in events {
                        let channel = event.event_type().to_string();
                        self.notifier
                            .publish(&channel, Notification::Event(Arc::new(event)));
                    }
                }
                self.schedule_next(epoch);
            }
            Err(error) => {
                {
                    let phase = self.phase.lock();
                    if !self.epoch_is_current(epoch) || *phase == Phase::Idle {
                        tracing::debug!(
                            "discarding poll failure for board {} after stop",
                            self.board_id
                        );
                        return;
                    }
                    self.error_count.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("poll failed for board {}: {}", self.board_id, error);
                    self.notifier
                        .publish(channel::ERROR, Notification::Error(Arc::new(error)));
                }

                if self.config.resume_after_error {
                    self.schedule_next(epoch);
                } else {
                    let mut phase = self.phase.lock();
                    if self.epoch_is_current(epoch) {
                        *phase = Phase::Idle;
                        self.notify_debug(format!(
                            "halting polling for board {} after failure",
                            self.board_id
                        ));
                    }
                }
            }
        }
    }

    /// Fetch updates past the cursor, advance it, and classify the batch
    async fn fetch_and_classify(&self) -> std::result::Result<Vec<BoardEvent>, ApiError> {
        let since = self.version.load(Ordering::Acquire);
        let batch = self.source.fetch_updates_since(self.board_id, since).await?;
        if batch.has_updates {
            self.version
                .fetch_max(batch.current_board_version, Ordering::AcqRel);
        }
        Ok(classify_batch(&batch))
    }

    fn schedule_next(self: &Arc<Self>, epoch: u64) {
        let mut phase = self.phase.lock();
        if !self.epoch_is_current(epoch) || *phase != Phase::Fetching {
            return;
        }
        *phase = Phase::Waiting;

        let inner = Arc::clone(self);
        let armed = self.timer.arm(self.config.poll_interval, move || {
            let mut phase = inner.phase.lock();
            if !inner.epoch_is_current(epoch) || *phase != Phase::Waiting {
                return;
            }
            *phase = Phase::Fetching;
            drop(phase);
            tokio::spawn(Arc::clone(&inner).run_poll(epoch));
        });

        if armed {
            self.notify_debug(format!("next poll in {:?}", self.config.poll_interval));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use taskboard_api::{BoardSummary, UpdateBatch};

    struct NullSource;

    #[async_trait::async_trait]
    impl UpdateSource for NullSource {
        async fn fetch_board(&self, _board_id: BoardId) -> taskboard_api::Result<BoardSummary> {
            Ok(BoardSummary {
                id: Some(1),
                title: None,
                version: 0,
            })
        }

        async fn fetch_updates_since(
            &self,
            _board_id: BoardId,
            version: u64,
        ) -> taskboard_api::Result<UpdateBatch> {
            Ok(UpdateBatch {
                has_updates: false,
                current_board_version: version,
                events: Vec::new(),
                new_payload: None,
            })
        }
    }

    fn session_with(config: SessionConfig) -> EventSession {
        EventSession::new(Arc::new(NullSource), BoardId::new(101), config).unwrap()
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = SessionConfig::new().with_poll_interval(Duration::ZERO);
        let result = EventSession::new(Arc::new(NullSource), BoardId::new(101), config);
        assert!(result.is_err());
    }

    #[test]
    fn starts_idle_at_the_configured_version() {
        let session = session_with(SessionConfig::new().with_starting_version(7));
        assert_eq!(session.version(), 7);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.is_active());
        assert_eq!(session.board_id(), BoardId::new(101));
    }

    #[tokio::test]
    async fn check_for_updates_works_without_starting() {
        let session = session_with(SessionConfig::new().with_starting_version(3));
        let events = session.check_for_updates().await.unwrap();
        assert!(events.is_empty());
        assert_eq!(session.version(), 3);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn stop_before_start_is_a_no_op() {
        let session = session_with(SessionConfig::new());
        session.stop();
        session.stop();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn phase_display_names() {
        assert_eq!(Phase::Idle.to_string(), "idle");
        assert_eq!(Phase::Discovering.to_string(), "discovering");
        assert_eq!(Phase::Fetching.to_string(), "fetching");
        assert_eq!(Phase::Waiting.to_string(), "waiting");
        assert!(Phase::Waiting.is_active());
        assert!(!Phase::Idle.is_active());
    }

    #[test]
    fn stats_snapshot_formats() {
        let session = session_with(SessionConfig::new().with_starting_version(42));
        let stats = session.stats();
        assert_eq!(stats.poll_count, 0);
        assert_eq!(stats.error_count, 0);
        assert_eq!(
            stats.to_string(),
            "board 101: idle at version 42, polls: 0, errors: 0"
        );
    }
}
