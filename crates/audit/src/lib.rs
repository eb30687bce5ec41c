//! # Meridian Audit Crate
//!
//! An append-only record of everything the client did: every request
//! attempt, every response, every error. The sink is opened once per run and
//! injected into the components as a shared handle; nothing in the core ever
//! reads it back. Records are flushed before `append` returns so a crash
//! right after a network call cannot silently lose the record of having made
//! it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

pub mod error;

pub use error::AuditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// A single line in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub component: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
}

impl AuditRecord {
    pub fn new(severity: Severity, component: &str, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            component: component.to_string(),
            message: message.into(),
            method: None,
            path: None,
            status_code: None,
            attempt: None,
        }
    }

    pub fn info(component: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, component, message)
    }

    pub fn warn(component: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, component, message)
    }

    pub fn error(component: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, component, message)
    }

    pub fn with_request(mut self, method: &str, path: &str) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(path.to_string());
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }
}

/// The append-only boundary every component writes through.
///
/// Records appear in the sink in call order; there is deliberately no read
/// or query API.
pub trait AuditSink: Send + Sync {
    fn append(&self, record: AuditRecord) -> Result<(), AuditError>;
}

/// The production sink: one JSON object per line, flushed per append.
pub struct FileAuditSink {
    writer: Mutex<BufWriter<File>>,
}

impl FileAuditSink {
    /// Opens (or creates) the audit file in append mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        let line = serde_json::to_string(&record)?;
        let mut writer = self.writer.lock().expect("audit writer poisoned");
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

/// An in-memory sink for tests: everything appended can be inspected.
#[derive(Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}
