//! Per-request lifecycle logging

use std::time::Instant;

use uuid::Uuid;

use super::logger::Logger;

/// Logs the lifecycle of one request or operation.
///
/// - `{NAME}_BEGIN` on creation (INFO)
/// - `{NAME}_COMPLETE` with `elapsed_ms` on [`complete`](Self::complete) (INFO)
/// - `{NAME}_FAILED` with `reason` on [`fail`](Self::fail) (ERROR)
/// - `{NAME}_INCOMPLETE` when dropped without either (WARN)
///
/// Every event of one scope carries the same random `request_id`.
pub struct RequestScope {
    name: String,
    fields: Vec<(&'static str, String)>,
    timer: Timer,
    finished: bool,
}

impl RequestScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_fields(name, Vec::new())
    }

    pub fn with_fields(name: impl Into<String>, mut fields: Vec<(&'static str, String)>) -> Self {
        fields.push(("request_id", Uuid::new_v4().to_string()));
        let scope = Self {
            name: name.into(),
            fields,
            timer: Timer::new(),
            finished: false,
        };
        Logger::info(&scope.event("BEGIN"), &scope.field_refs());
        scope
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.timer.elapsed_ms();
        let mut fields = self.field_refs();
        fields.push(("elapsed_ms", elapsed.as_str()));
        fields.extend_from_slice(extra);
        Logger::info(&self.event("COMPLETE"), &fields);
    }

    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        let mut fields = self.field_refs();
        fields.push(("reason", reason));
        Logger::error(&self.event("FAILED"), &fields);
    }

    fn event(&self, suffix: &str) -> String {
        format!("{}_{}", self.name, suffix)
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        if !self.finished {
            let mut fields = self.field_refs();
            fields.push(("reason", "scope dropped without completion"));
            Logger::warn(&self.event("INCOMPLETE"), &fields);
        }
    }
}

/// Wall-clock timer for elapsed-time fields
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds as a log field value
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
