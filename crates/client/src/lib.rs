//! Live WebSocket synchronisation for the job dashboard.
//!
//! Provides the dashboard wire protocol, endpoint derivation, the
//! reconnecting connection manager, the frame router, and the
//! single-writer [`dashboard::Dashboard`] loop that applies everything
//! to the core job store and redraws the board.

pub mod client;
pub mod connection;
pub mod dashboard;
pub mod endpoint;
pub mod messages;
pub mod reconnect;
pub mod router;
