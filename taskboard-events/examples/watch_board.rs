//! Watch a board for card activity from the command line.
//!
//! ```sh
//! TASKBOARD_ACCOUNT=acme \
//! TASKBOARD_EMAIL=user@example.com \
//! TASKBOARD_PASSWORD=secret \
//! cargo run --example watch_board -- 101
//! ```

use std::env;

use taskboard_events::logging::{self, LoggingMode};
use taskboard_events::{
    channel, BoardId, Credentials, EventSession, EventsError, SessionConfig,
};

fn required_env(name: &str) -> Result<String, EventsError> {
    env::var(name).map_err(|_| EventsError::Configuration(format!("{} must be set", name)))
}

#[tokio::main]
async fn main() -> Result<(), EventsError> {
    logging::init_logging(LoggingMode::Development)
        .map_err(|e| EventsError::Configuration(e.to_string()))?;

    let account = required_env("TASKBOARD_ACCOUNT")?;
    let email = required_env("TASKBOARD_EMAIL")?;
    let password = required_env("TASKBOARD_PASSWORD")?;
    let board_id = env::args()
        .nth(1)
        .unwrap_or_else(|| "101".to_string())
        .parse::<u64>()
        .map_err(|e| EventsError::Configuration(format!("board id: {}", e)))?;

    let credentials = Credentials::new(account, email, password);
    let session = EventSession::connect(credentials, BoardId::new(board_id), SessionConfig::new())?;

    let mut moves = session.subscribe(channel::CARD_MOVE);
    let mut creations = session.subscribe(channel::CARD_CREATION);
    let mut errors = session.subscribe(channel::ERROR);

    session.start();
    println!("watching board {} (ctrl-c to quit)", session.board_id());

    loop {
        tokio::select! {
            Some(notification) = moves.recv() => {
                if let Some(event) = notification.as_event() {
                    println!("card moved: {}", event.to_value());
                }
            }
            Some(notification) = creations.recv() => {
                if let Some(event) = notification.as_event() {
                    println!("card created: {}", event.to_value());
                }
            }
            Some(notification) = errors.recv() => {
                if let Some(error) = notification.as_error() {
                    eprintln!("poll failed: {}", error);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                session.stop();
                break;
            }
        }
    }

    println!("{}", session.stats());
    Ok(())
}
