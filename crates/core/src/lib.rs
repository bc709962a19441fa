//! Client-side domain model for the ingestion job dashboard.
//!
//! Everything here is synchronous and free of I/O: the job record and
//! status types, the [`store::JobStore`] that mirrors the scheduler's
//! view of all jobs, the board projection drawn from it, the bounded
//! log feed, and the detail inspector. The `jobwatch-client` crate
//! drives these from the live WebSocket stream.

pub mod board;
pub mod connection;
pub mod detail;
pub mod job;
pub mod log_feed;
pub mod store;
pub mod types;
