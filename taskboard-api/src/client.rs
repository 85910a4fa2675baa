use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::credentials::Credentials;
use crate::error::{ApiError, Result};
use crate::types::{BoardId, BoardSummary, ReplyEnvelope, UpdateBatch};

/// A client for the board-management REST API
///
/// This client owns the base URL derivation, basic-auth headers, and the
/// reply-envelope unwrapping, so callers work with typed payloads only. It
/// wraps a shared connection pool, so cloning is cheap and clones reuse
/// connections.
///
/// ```rust,no_run
/// use taskboard_api::{BoardClient, BoardId, Credentials};
///
/// # async fn demo() -> taskboard_api::Result<()> {
/// let client = BoardClient::new(Credentials::new("acme", "kanban@example.com", "trustno1"))?;
/// let board = client.board(BoardId::new(101)).await?;
/// println!("board is at version {}", board.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BoardClient {
    http: Client,
    base_url: Url,
    email: String,
    password: String,
}

impl BoardClient {
    /// Create a new client from account credentials
    ///
    /// Fails if the credentials are incomplete, the account URL does not
    /// parse, or the proxy option is malformed.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let base_url = credentials.base_url()?;

        let mut builder = Client::builder();
        if let Some(proxy) = &credentials.options.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| ApiError::Config(format!("invalid proxy {proxy:?}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(timeout) = credentials.options.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            email: credentials.email,
            password: credentials.password,
        })
    }

    /// Fetch the current state of a board
    pub async fn board(&self, board_id: BoardId) -> Result<BoardSummary> {
        let url = self.endpoint(&format!("api/boards/{}", board_id))?;
        self.get_payload(url).await
    }

    /// Fetch the change events recorded after the given board version
    pub async fn board_updates(&self, board_id: BoardId, version: u64) -> Result<UpdateBatch> {
        let url = self.endpoint(&format!("api/boards/{}/updates/since/{}", board_id, version))?;
        self.get_payload(url).await
    }

    /// The resolved base URL requests are issued against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Config(format!("invalid endpoint path {path:?}: {e}")))
    }

    async fn get_payload<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .basic_auth(&self.email, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        let envelope: ReplyEnvelope<T> = response.json().await?;
        envelope.into_payload()
    }
}
