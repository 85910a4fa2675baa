//! Fetch a board and print its current version.
//!
//! ```sh
//! TASKBOARD_ACCOUNT=acme TASKBOARD_EMAIL=me@example.com TASKBOARD_PASSWORD=secret \
//!     cargo run --example board_snapshot -- 101
//! ```

use taskboard_api::{BoardClient, BoardId, Credentials};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let account = std::env::var("TASKBOARD_ACCOUNT")?;
    let email = std::env::var("TASKBOARD_EMAIL")?;
    let password = std::env::var("TASKBOARD_PASSWORD")?;
    let board_id: u64 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "101".to_string())
        .parse()?;

    let client = BoardClient::new(Credentials::new(account, email, password))?;
    let board = client.board(BoardId::new(board_id)).await?;

    println!(
        "board {} ({}) is at version {}",
        board_id,
        board.title.as_deref().unwrap_or("untitled"),
        board.version
    );

    let updates = client.board_updates(BoardId::new(board_id), board.version).await?;
    println!("updates since version {}: {}", board.version, updates.has_updates);

    Ok(())
}
