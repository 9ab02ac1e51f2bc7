use std::sync::Arc;

use tracing::{debug, warn};

use crate::event_log_ports::{EventLogRepository, NewEventLogEntry};

/// Best-effort writer for event log entries.
///
/// The append is awaited so entries land in order with the mutation that
/// produced them, but a failed append is only logged. Callers never see it.
#[derive(Clone)]
pub struct AuditDispatcher {
    repository: Arc<dyn EventLogRepository>,
}

impl AuditDispatcher {
    /// Creates a dispatcher over an event log repository.
    #[must_use]
    pub fn new(repository: Arc<dyn EventLogRepository>) -> Self {
        Self { repository }
    }

    /// Appends one entry, swallowing and logging any failure.
    pub async fn record(&self, entry: NewEventLogEntry) {
        let event_id = entry.event_id;

        match self.repository.append_entry(entry).await {
            Ok(stored) => {
                debug!(event_id = %event_id, entry_id = %stored.id, "event log entry appended");
            }
            Err(error) => {
                warn!(event_id = %event_id, error = %error, "failed to append event log entry");
            }
        }
    }
}
