//! Connection manager: one logical socket, reconnected forever.
//!
//! [`ConnectionManager::spawn`] starts a task that runs
//! connect -> request snapshot -> forward frames -> reconnect until its
//! [`CancellationToken`] fires. Frames and lifecycle changes are sent
//! in arrival order over an mpsc channel to the single consumer that
//! owns the job store; the connected/disconnected indicator is also
//! published on a [`watch`] channel.

use std::time::Duration;

use futures::StreamExt;
use jobwatch_core::connection::ConnectionState;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::client::{DashboardClient, WsStream};
use crate::reconnect::{Backoff, ReconnectConfig};

/// Capacity of the event channel to the dashboard loop.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// How long [`ConnectionManager::shutdown`] waits for the task.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifecycle and data events produced by the connection task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The socket is open and the snapshot request has been sent.
    Opened,
    /// One inbound text frame, undecoded.
    Frame(String),
    /// The open socket closed or errored.
    Closed,
    /// A connect attempt failed before the socket opened.
    ConnectFailed { error: String },
    /// Exactly one further attempt will be made after `delay`.
    ReconnectScheduled { attempt: u32, delay: Duration },
}

/// Handle to the running connection task.
pub struct ConnectionManager {
    state_rx: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
    task_handle: tokio::task::JoinHandle<()>,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// The server closed the socket or it failed; reconnect.
    Dropped,
    /// Cancelled, or nobody is listening any more; stop.
    Stopped,
}

impl ConnectionManager {
    /// Spawn the connection task and return it with its event stream.
    ///
    /// `cancel` stops the task, including any pending reconnect timer.
    pub fn spawn(
        client: DashboardClient,
        reconnect: ReconnectConfig,
        cancel: CancellationToken,
    ) -> (Self, mpsc::Receiver<ConnectionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let task_cancel = cancel.clone();

        let task_handle = tokio::spawn(async move {
            tracing::info!(url = %client.url(), "Starting connection task");
            run_connection_loop(&client, reconnect, &event_tx, &state_tx, &task_cancel).await;
            tracing::info!(url = %client.url(), "Connection task exited");
        });

        let manager = Self {
            state_rx,
            cancel,
            task_handle,
        };
        (manager, event_rx)
    }

    /// Subscribe to the connected/disconnected indicator.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Cancel the task and wait up to 5 seconds for it to exit.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down connection manager");
        self.cancel.cancel();
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, self.task_handle).await.is_err() {
            tracing::warn!("Connection task did not exit in time");
        }
    }
}

/// Core connection loop: connect -> process frames -> reconnect.
///
/// Attempts are strictly sequential, so at most one socket exists and
/// at most one snapshot request is outstanding. Runs until `cancel`
/// fires or the event receiver is dropped.
async fn run_connection_loop(
    client: &DashboardClient,
    reconnect: ReconnectConfig,
    events: &mpsc::Sender<ConnectionEvent>,
    state: &watch::Sender<ConnectionState>,
    cancel: &CancellationToken,
) {
    let mut backoff = Backoff::new(reconnect);

    loop {
        let connected = tokio::select! {
            _ = cancel.cancelled() => break,
            result = client.connect() => result,
        };

        let opened = match connected {
            Ok(mut conn) => conn.request_snapshot().await.map(|()| conn),
            Err(e) => Err(e),
        };

        match opened {
            Ok(conn) => {
                backoff.reset();
                state.send_replace(ConnectionState::Connected);
                if events.send(ConnectionEvent::Opened).await.is_err() {
                    break;
                }

                let end = process_frames(conn.ws_stream, events, cancel).await;

                state.send_replace(ConnectionState::Disconnected);
                let _ = events.send(ConnectionEvent::Closed).await;
                if end == SessionEnd::Stopped {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(url = %client.url(), error = %e, "Dashboard connection failed");
                let event = ConnectionEvent::ConnectFailed {
                    error: e.to_string(),
                };
                if events.send(event).await.is_err() {
                    break;
                }
            }
        }

        if cancel.is_cancelled() {
            break;
        }

        let (attempt, delay) = backoff.next_delay();
        tracing::info!(
            url = %client.url(),
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Scheduling reconnect",
        );
        if events
            .send(ConnectionEvent::ReconnectScheduled { attempt, delay })
            .await
            .is_err()
        {
            break;
        }

        // Wait before the next attempt, respecting cancellation.
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    state.send_replace(ConnectionState::Disconnected);
}

/// Forward text frames until the socket closes, errors, or `cancel` fires.
///
/// Binary frames are ignored; ping/pong is answered by tungstenite.
async fn process_frames(
    mut ws_stream: WsStream,
    events: &mpsc::Sender<ConnectionEvent>,
    cancel: &CancellationToken,
) -> SessionEnd {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => None,
            msg = ws_stream.next() => Some(msg),
        };

        let Some(msg_result) = next else {
            let _ = ws_stream.close(None).await;
            return SessionEnd::Stopped;
        };

        match msg_result {
            Some(Ok(Message::Text(text))) => {
                if events.send(ConnectionEvent::Frame(text)).await.is_err() {
                    let _ = ws_stream.close(None).await;
                    return SessionEnd::Stopped;
                }
            }
            Some(Ok(Message::Binary(_))) => {
                tracing::trace!("Ignoring binary frame");
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                // Handled automatically by tungstenite.
            }
            Some(Ok(Message::Close(frame))) => {
                tracing::info!(?frame, "Dashboard socket closed by server");
                return SessionEnd::Dropped;
            }
            Some(Ok(Message::Frame(_))) => {}
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Dashboard socket receive error");
                return SessionEnd::Dropped;
            }
            None => {
                tracing::info!("Dashboard socket stream exhausted");
                return SessionEnd::Dropped;
            }
        }
    }
}
