//! Bounded feed of server log lines with severity classification.

use std::collections::VecDeque;

/// Lines retained when no capacity is configured.
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Severity inferred from the text of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Classify by case-sensitive substring: `ERROR` or `CRITICAL` first,
    /// then `WARNING`, otherwise info.
    pub fn classify(line: &str) -> Self {
        if line.contains("ERROR") || line.contains("CRITICAL") {
            LogLevel::Error
        } else if line.contains("WARNING") {
            LogLevel::Warning
        } else {
            LogLevel::Info
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
}

/// Transient log display. Oldest lines are evicted once `capacity` is
/// reached; nothing is deduplicated or persisted.
#[derive(Debug)]
pub struct LogFeed {
    lines: VecDeque<LogLine>,
    capacity: usize,
    dropped: u64,
}

impl Default for LogFeed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl LogFeed {
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
            dropped: 0,
        }
    }

    /// Append a line and return it as classified.
    pub fn push(&mut self, text: impl Into<String>) -> &LogLine {
        let text = text.into();
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.dropped += 1;
        }
        self.lines.push_back(LogLine {
            level: LogLevel::classify(&text),
            text,
        });
        &self.lines[self.lines.len() - 1]
    }

    /// The line the view should be scrolled to.
    pub fn newest(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lines evicted so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
