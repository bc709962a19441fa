#![allow(dead_code)]

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use jobwatch_core::board::{Board, BoardSurface};
use jobwatch_core::connection::ConnectionState;
use jobwatch_core::detail::JobDetail;
use jobwatch_core::log_feed::LogLine;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

/// Everything a surface was asked to display, in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub boards: Vec<Board>,
    pub connection: Vec<ConnectionState>,
    pub logs: Vec<LogLine>,
    pub details: Vec<JobDetail>,
    pub hidden: usize,
}

impl RecordingSurface {
    pub fn last_board(&self) -> &Board {
        self.boards.last().expect("at least one draw")
    }
}

impl BoardSurface for RecordingSurface {
    fn draw_board(&mut self, board: &Board) {
        self.boards.push(board.clone());
    }
    fn set_connection(&mut self, state: ConnectionState) {
        self.connection.push(state);
    }
    fn append_log(&mut self, line: &LogLine) {
        self.logs.push(line.clone());
    }
    fn show_detail(&mut self, detail: &JobDetail) {
        self.details.push(detail.clone());
    }
    fn hide_detail(&mut self) {
        self.hidden += 1;
    }
}

/// A `job_update` frame for `job_id`.
pub fn update_frame(job_id: &str, status: &str, submitted_at: &str) -> String {
    serde_json::json!({
        "type": "job_update",
        "payload": {
            "job_id": job_id,
            "status": status,
            "message": format!("{job_id} is {status}"),
            "submitted_at": submitted_at,
        }
    })
    .to_string()
}

/// An `all_jobs` frame listing `(job_id, status)` pairs.
pub fn snapshot_frame(jobs: &[(&str, &str)]) -> String {
    let payload: Vec<_> = jobs
        .iter()
        .map(|(id, status)| {
            serde_json::json!({
                "job_id": id,
                "status": status,
                "message": "",
                "submitted_at": "2025-01-01T00:00:00+00:00",
            })
        })
        .collect();
    serde_json::json!({ "type": "all_jobs", "payload": payload }).to_string()
}

/// Bind a loopback listener and return it with its `http://` origin.
pub async fn loopback_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    (listener, format!("http://{addr}"))
}

/// Accept one WebSocket client.
pub async fn accept(listener: &TcpListener) -> WebSocketStream<tokio::net::TcpStream> {
    let (stream, _) = listener.accept().await.expect("accept tcp");
    tokio_tungstenite::accept_async(stream).await.expect("ws handshake")
}

/// Read text frames until one arrives, failing after `timeout`.
pub async fn next_text(ws: &mut WebSocketStream<tokio::net::TcpStream>, timeout: Duration) -> String {
    loop {
        let msg = tokio::time::timeout(timeout, ws.next())
            .await
            .expect("frame before timeout")
            .expect("stream open")
            .expect("valid frame");
        if let Message::Text(text) = msg {
            return text;
        }
    }
}

pub async fn send_text(ws: &mut WebSocketStream<tokio::net::TcpStream>, text: String) {
    ws.send(Message::Text(text)).await.expect("send frame");
}

/// Accept one WebSocket client and report the request path it used.
pub async fn accept_with_path(
    listener: &TcpListener,
) -> (WebSocketStream<tokio::net::TcpStream>, String) {
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

    let (stream, _) = listener.accept().await.expect("accept tcp");
    let mut path = String::new();
    let ws = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, resp: Response| {
        path = req.uri().path().to_string();
        Ok::<_, ErrorResponse>(resp)
    })
    .await
    .expect("ws handshake");
    (ws, path)
}
