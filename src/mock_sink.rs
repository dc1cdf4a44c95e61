//! A telemetry sink for unit tests which records everything the driver publishes.

use std::collections::HashMap;

use crate::sink::TelemetrySink;

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub values: HashMap<String, String>,
    pub status: Vec<String>,
    pending_status: Option<Vec<String>>,
    pub alarms: Vec<String>,
    pending_alarms: Option<Vec<String>>,
    /// `Some(true)` after the last `mark_stale`, `Some(false)` after the last `mark_ok`.
    pub stale: Option<bool>,
    pub status_commits: usize,
    pub alarm_commits: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose committed status is already `tokens`.
    pub fn with_status(tokens: &[&str]) -> Self {
        Self {
            status: tokens.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl TelemetrySink for RecordingSink {
    fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    fn mark_stale(&mut self) {
        self.stale = Some(true);
    }

    fn mark_ok(&mut self) {
        self.stale = Some(false);
    }

    fn begin_alarms(&mut self) {
        self.pending_alarms = Some(Vec::new());
    }

    fn raise_alarm(&mut self, name: &str) {
        if let Some(pending) = self.pending_alarms.as_mut() {
            pending.push(name.to_string());
        }
    }

    fn commit_alarms(&mut self) {
        self.alarms = self.pending_alarms.take().unwrap_or_default();
        self.alarm_commits += 1;
    }

    fn begin_status(&mut self) {
        self.pending_status = Some(Vec::new());
    }

    fn set_status(&mut self, token: &str) {
        if let Some(pending) = self.pending_status.as_mut() {
            pending.push(token.to_string());
        }
    }

    fn commit_status(&mut self) {
        self.status = self.pending_status.take().unwrap_or_default();
        self.status_commits += 1;
    }

    fn get_status(&self, token: &str) -> bool {
        self.status.iter().any(|t| t == token)
    }
}
