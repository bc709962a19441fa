//! Plain-text terminal surface for the board.
//!
//! The surface keeps the last board, indicator, a tail of the log feed
//! and the open detail overlay, and repaints the whole frame on every
//! change. Nothing is patched in place.

use std::collections::VecDeque;
use std::io::Write;

use jobwatch_core::board::{Board, BoardSurface};
use jobwatch_core::connection::ConnectionState;
use jobwatch_core::detail::JobDetail;
use jobwatch_core::log_feed::{LogLevel, LogLine};

/// Log lines visible under the board.
pub const VISIBLE_LOG_LINES: usize = 12;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct TerminalSurface<W: Write> {
    out: W,
    clear_screen: bool,
    board: Option<Board>,
    connection: ConnectionState,
    log_tail: VecDeque<LogLine>,
    detail: Option<JobDetail>,
}

impl<W: Write> TerminalSurface<W> {
    /// `clear_screen` emits an ANSI clear before each repaint.
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self {
            out,
            clear_screen,
            board: None,
            connection: ConnectionState::Disconnected,
            log_tail: VecDeque::with_capacity(VISIBLE_LOG_LINES),
            detail: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The full text of the current frame.
    pub fn render_frame(&self) -> String {
        let mut frame = String::new();

        frame.push_str(&format!("== Ingestion jobs == [{}]\n", self.connection));

        if let Some(board) = &self.board {
            for bucket in &board.buckets {
                frame.push_str(&format!("\n{} ({})\n", bucket.status.label(), bucket.count()));
                for card in &bucket.cards {
                    frame.push_str(&format!(
                        "  {:<11}  {:<53}  {}\n",
                        card.short_id, card.description, card.submitted_display
                    ));
                }
            }
        }

        frame.push_str("\n-- Logs --\n");
        for line in &self.log_tail {
            frame.push_str(&format!("{} {}\n", level_tag(line.level), line.text));
        }

        if let Some(detail) = &self.detail {
            frame.push_str(&format!("\n+-- {} --\n", detail.title));
            frame.push_str(&detail.body);
            frame.push_str("\n+-- `close` to dismiss --\n");
        }

        frame.push_str("\n> inspect <job_id> | close | quit\n");
        frame
    }

    fn repaint(&mut self) {
        let frame = self.render_frame();
        let prefix = if self.clear_screen { CLEAR_SCREEN } else { "" };
        let written = write!(self.out, "{prefix}{frame}").and_then(|()| self.out.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "Failed to paint dashboard");
        }
    }
}

fn level_tag(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "[ERROR]",
        LogLevel::Warning => "[WARN] ",
        LogLevel::Info => "[INFO] ",
    }
}

impl<W: Write> BoardSurface for TerminalSurface<W> {
    fn draw_board(&mut self, board: &Board) {
        self.board = Some(board.clone());
        self.repaint();
    }

    fn set_connection(&mut self, state: ConnectionState) {
        self.connection = state;
        self.repaint();
    }

    fn append_log(&mut self, line: &LogLine) {
        if self.log_tail.len() == VISIBLE_LOG_LINES {
            self.log_tail.pop_front();
        }
        self.log_tail.push_back(line.clone());
        self.repaint();
    }

    fn show_detail(&mut self, detail: &JobDetail) {
        self.detail = Some(detail.clone());
        self.repaint();
    }

    fn hide_detail(&mut self) {
        self.detail = None;
        self.repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobwatch_core::board::build_board;
    use jobwatch_core::job::{JobRecord, JobStatus};
    use jobwatch_core::store::JobStore;

    fn surface() -> TerminalSurface<Vec<u8>> {
        TerminalSurface::new(Vec::new(), false)
    }

    #[test]
    fn frame_lists_buckets_with_counts() {
        let mut store = JobStore::new();
        store.apply_update(
            JobRecord::new("abcdef0123456789", JobStatus::Completed)
                .with_submitted_at("2025-01-01T00:00:00Z")
                .with_processing_time(4.0),
        );
        let mut surface = surface();
        surface.draw_board(&build_board(&store));

        let frame = surface.render_frame();
        assert!(frame.contains("Pending (0)"));
        assert!(frame.contains("Completed (1)"));
        assert!(frame.contains("abcdef01..."));
        assert!(frame.contains("Completed in 4s"));
        assert!(frame.contains("2025-01-01 00:00:00"));
        assert!(!frame.contains("abcdef0123456789"));
    }

    #[test]
    fn redraw_replaces_previous_board() {
        let mut store = JobStore::new();
        store.apply_update(JobRecord::new("first-job", JobStatus::Pending));
        let mut surface = surface();
        surface.draw_board(&build_board(&store));

        store.apply_snapshot(Vec::new());
        surface.draw_board(&build_board(&store));
        assert!(!surface.render_frame().contains("first-jo..."));
    }

    #[test]
    fn log_tail_is_bounded() {
        let mut surface = surface();
        for i in 0..(VISIBLE_LOG_LINES + 3) {
            surface.append_log(&LogLine {
                level: LogLevel::Info,
                text: format!("line-{i:02}"),
            });
        }
        let frame = surface.render_frame();
        assert!(!frame.contains("line-00"));
        assert!(frame.contains(&format!("line-{:02}", VISIBLE_LOG_LINES + 2)));
    }

    #[test]
    fn indicator_and_detail_render() {
        let mut surface = surface();
        surface.set_connection(ConnectionState::Connected);
        surface.show_detail(&JobDetail {
            job_id: "a".into(),
            title: "Job Details: a".into(),
            body: "{\n  \"job_id\": \"a\"\n}".into(),
        });
        let frame = surface.render_frame();
        assert!(frame.contains("[Connected]"));
        assert!(frame.contains("+-- Job Details: a --"));

        surface.hide_detail();
        assert!(!surface.render_frame().contains("Job Details"));
    }

    #[test]
    fn repaint_writes_to_output() {
        let mut surface = surface();
        surface.append_log(&LogLine {
            level: LogLevel::Error,
            text: "boom".into(),
        });
        let written = String::from_utf8(surface.into_inner()).unwrap();
        assert!(written.contains("[ERROR] boom"));
    }
}
