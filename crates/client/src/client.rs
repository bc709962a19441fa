//! WebSocket client for the ingestion service's dashboard socket.
//!
//! [`DashboardClient`] holds the endpoint for one server. Call
//! [`DashboardClient::connect`] to open a live [`DashboardConnection`]
//! and [`DashboardConnection::request_snapshot`] to ask for the full
//! job listing.

use std::time::Duration;

use futures::SinkExt;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::messages::OutboundMessage;

/// How long a single connect (TCP + TLS + upgrade) may take.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The raw WebSocket stream type used by dashboard connections.
pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Connection configuration for one dashboard endpoint.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    url: Url,
}

/// A live WebSocket connection to the dashboard endpoint.
pub struct DashboardConnection {
    /// The raw WebSocket stream for reading/writing frames.
    pub ws_stream: WsStream,
}

impl DashboardClient {
    /// `url` is the full socket URL, see
    /// [`dashboard_endpoint`](crate::endpoint::dashboard_endpoint).
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Open the WebSocket connection.
    pub async fn connect(&self) -> Result<DashboardConnection, ClientError> {
        let attempt = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(self.url.as_str()));

        let (ws_stream, _response) = attempt
            .await
            .map_err(|_| ClientError::ConnectTimeout {
                url: self.url.clone(),
                timeout: CONNECT_TIMEOUT,
            })?
            .map_err(|source| ClientError::Connect {
                url: self.url.clone(),
                source: Box::new(source),
            })?;

        tracing::info!(url = %self.url, "Connected to dashboard socket");

        Ok(DashboardConnection { ws_stream })
    }
}

impl DashboardConnection {
    /// Send `{"action": "get_all_jobs"}`.
    pub async fn request_snapshot(&mut self) -> Result<(), ClientError> {
        let json = OutboundMessage::GetAllJobs.encode().map_err(ClientError::Encode)?;
        self.ws_stream
            .send(Message::Text(json))
            .await
            .map_err(|e| ClientError::SnapshotRequest(Box::new(e)))?;
        tracing::debug!("Requested job snapshot");
        Ok(())
    }
}

/// Why a dashboard session could not be opened or primed.
///
/// Every variant is recoverable: the connection manager logs it and
/// schedules the next reconnect.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server did not finish the upgrade within [`CONNECT_TIMEOUT`].
    #[error("Timed out after {}s connecting to {url}", .timeout.as_secs())]
    ConnectTimeout { url: Url, timeout: Duration },

    /// TCP connect, TLS, or the WebSocket upgrade was refused.
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: Url,
        source: Box<tungstenite::Error>,
    },

    #[error("Failed to encode snapshot request: {0}")]
    Encode(serde_json::Error),

    /// The socket opened but `get_all_jobs` could not be written, so the
    /// session is unusable.
    #[error("Failed to request snapshot: {0}")]
    SnapshotRequest(Box<tungstenite::Error>),
}
