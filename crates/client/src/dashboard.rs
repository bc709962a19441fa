//! The dashboard event loop.
//!
//! [`Dashboard`] is the only writer of the job store. Connection events
//! and operator commands are applied one at a time, in arrival order,
//! and every change to the store is followed by a full board redraw on
//! the injected [`BoardSurface`].

use jobwatch_core::board::{build_board, BoardSurface};
use jobwatch_core::connection::ConnectionState;
use jobwatch_core::detail::{inspect, DetailOverlay};
use jobwatch_core::job::JobRecord;
use jobwatch_core::log_feed::LogFeed;
use jobwatch_core::store::JobStore;
use jobwatch_core::types::JobId;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::connection::ConnectionEvent;
use crate::router::{route_frame, MessageHandler};

/// Operator interactions with the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// A card was activated.
    Inspect(JobId),
    /// The detail overlay was dismissed.
    CloseDetail,
}

pub struct Dashboard<S: BoardSurface> {
    store: JobStore,
    log: LogFeed,
    overlay: DetailOverlay,
    connection: ConnectionState,
    surface: S,
}

impl<S: BoardSurface> Dashboard<S> {
    /// Create an empty, disconnected dashboard and draw it once.
    pub fn new(surface: S, log_capacity: usize) -> Self {
        let mut dashboard = Self {
            store: JobStore::new(),
            log: LogFeed::with_capacity(log_capacity),
            overlay: DetailOverlay::default(),
            connection: ConnectionState::Disconnected,
            surface,
        };
        dashboard.surface.set_connection(ConnectionState::Disconnected);
        dashboard.redraw();
        dashboard
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn log_feed(&self) -> &LogFeed {
        &self.log
    }

    pub fn overlay(&self) -> &DetailOverlay {
        &self.overlay
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Rebuild the board from the store and replace what is displayed.
    pub fn redraw(&mut self) {
        let board = build_board(&self.store);
        self.surface.draw_board(&board);
    }

    pub fn handle_connection_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened => self.set_connection(ConnectionState::Connected),
            ConnectionEvent::Closed => self.set_connection(ConnectionState::Disconnected),
            ConnectionEvent::Frame(text) => {
                route_frame(&text, self);
            }
            ConnectionEvent::ConnectFailed { error } => {
                tracing::debug!(error = %error, "Connect attempt failed");
                self.set_connection(ConnectionState::Disconnected);
            }
            ConnectionEvent::ReconnectScheduled { attempt, delay } => {
                tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Reconnect pending");
            }
        }
    }

    pub fn handle_command(&mut self, command: UiCommand) {
        match command {
            UiCommand::Inspect(job_id) => match inspect(&self.store, &job_id) {
                Some(detail) => {
                    self.surface.show_detail(&detail);
                    self.overlay.open(detail);
                }
                None => tracing::debug!(job_id = %job_id, "Inspect of unknown job ignored"),
            },
            UiCommand::CloseDetail => {
                if self.overlay.dismiss() {
                    self.surface.hide_detail();
                }
            }
        }
    }

    /// Apply events and commands until `cancel` fires or both channels close.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<ConnectionEvent>,
        mut commands: mpsc::Receiver<UiCommand>,
        cancel: CancellationToken,
    ) -> Self {
        let mut events_open = true;
        let mut commands_open = true;

        while events_open || commands_open {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv(), if events_open => match event {
                    Some(event) => self.handle_connection_event(event),
                    None => events_open = false,
                },
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command),
                    None => commands_open = false,
                },
            }
        }

        self
    }

    fn set_connection(&mut self, state: ConnectionState) {
        if self.connection != state {
            tracing::info!(state = %state, "Connection state changed");
            self.connection = state;
            self.surface.set_connection(state);
        }
    }

    /// Keep an open overlay in step with the store: refresh it if its
    /// job changed, close it if the job is gone.
    fn sync_overlay(&mut self) {
        let Some(job_id) = self.overlay.current().map(|d| d.job_id.clone()) else {
            return;
        };
        if !self.store.contains(&job_id) {
            tracing::debug!(job_id = %job_id, "Inspected job no longer known; closing detail");
            self.overlay.dismiss();
            self.surface.hide_detail();
            return;
        }
        if let Some(detail) = inspect(&self.store, &job_id) {
            if self.overlay.current() != Some(&detail) {
                self.surface.show_detail(&detail);
                self.overlay.open(detail);
            }
        }
    }
}

impl<S: BoardSurface> MessageHandler for Dashboard<S> {
    fn on_log(&mut self, line: String) {
        let line = self.log.push(line);
        self.surface.append_log(line);
    }

    fn on_snapshot(&mut self, records: Vec<JobRecord>) {
        self.store.apply_snapshot(records);
        self.redraw();
        self.sync_overlay();
    }

    fn on_update(&mut self, record: JobRecord) {
        let job_id = record.job_id.clone();
        self.store.apply_update(record);
        self.redraw();
        if self.overlay.current().is_some_and(|d| d.job_id == job_id) {
            self.sync_overlay();
        }
    }
}
