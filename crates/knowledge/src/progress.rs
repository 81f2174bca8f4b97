//! Ingestion progress: which phase a build is in and which rows it has covered.

use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestPhase {
    /// Rows rendered into documents.
    Render,
    /// One embedding batch finished.
    Embed,
    /// Semantic index assembled.
    Index,
}

impl IngestPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestPhase::Render => "render",
            IngestPhase::Embed => "embed",
            IngestPhase::Index => "index",
        }
    }
}

impl fmt::Display for IngestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub phase: IngestPhase,

    /// Rows this event covers. For `Embed` it is the batch that just finished.
    pub rows: Range<usize>,

    /// Rows finished in this phase so far.
    pub completed: usize,

    pub total: usize,

    /// Time since the reporter was created.
    pub elapsed: Duration,
}

impl ProgressEvent {
    /// Share of the dataset finished in this phase, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }

    /// One line for a terminal, e.g. `[embed] rows 3-4 | 4/5 (80%)`.
    pub fn format_simple(&self) -> String {
        let rows = match self.rows.len() {
            0 => "no rows".to_string(),
            1 => format!("row {}", self.rows.start + 1),
            _ => format!("rows {}-{}", self.rows.start + 1, self.rows.end),
        };

        format!(
            "[{}] {} | {}/{} ({:.0}%)",
            self.phase,
            rows,
            self.completed,
            self.total,
            self.fraction() * 100.0
        )
    }
}

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Cheap to clone; clones share the callback and the start instant.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    started: Instant,
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
            started: Instant::now(),
        }
    }

    /// Reporter that drops every event.
    pub fn noop() -> Self {
        Self {
            callback: None,
            started: Instant::now(),
        }
    }

    fn emit(&self, phase: IngestPhase, rows: Range<usize>, completed: usize, total: usize) {
        let Some(callback) = &self.callback else {
            return;
        };

        let event = ProgressEvent {
            phase,
            rows,
            completed,
            total,
            elapsed: self.started.elapsed(),
        };

        tracing::debug!(
            phase = %event.phase,
            rows = ?event.rows,
            completed = event.completed,
            total = event.total,
            "Ingestion progress"
        );

        callback(event);
    }

    /// All `total` rows have been rendered.
    pub fn rendered(&self, total: usize) {
        self.emit(IngestPhase::Render, 0..total, total, total);
    }

    /// The batch covering `rows` is embedded; `completed` rows are done overall.
    pub fn embedded(&self, rows: Range<usize>, completed: usize, total: usize) {
        self.emit(IngestPhase::Embed, rows, completed, total);
    }

    /// The index over all `total` rows is built.
    pub fn indexed(&self, total: usize) {
        self.emit(IngestPhase::Index, 0..total, total, total);
    }
}
