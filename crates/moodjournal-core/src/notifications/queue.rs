//! Notification services that keep requests in memory or in the store.

use super::{NotificationRequest, NotificationService};
use crate::error::NotificationError;
use crate::storage::{keys, Database};

/// Persists pending requests under `scheduled_notifications`.
///
/// Used by the command-line front end, which has no notification centre
/// of its own; `moodjournal reminders list` reads the queue back.
pub struct KvNotificationQueue<'a> {
    db: &'a Database,
}

impl<'a> KvNotificationQueue<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Pending requests. Unreadable queues read as empty.
    pub fn pending(&self) -> Vec<NotificationRequest> {
        self.db.load_list(keys::SCHEDULED_NOTIFICATIONS)
    }

    fn write(
        &self,
        requests: &[NotificationRequest],
        identifier: &str,
        cancel: bool,
    ) -> Result<(), NotificationError> {
        self.db
            .store_json(keys::SCHEDULED_NOTIFICATIONS, requests)
            .map_err(|e| {
                let identifier = identifier.to_string();
                let message = e.to_string();
                if cancel {
                    NotificationError::CancelFailed { identifier, message }
                } else {
                    NotificationError::ScheduleFailed { identifier, message }
                }
            })
    }
}

impl NotificationService for KvNotificationQueue<'_> {
    fn scheduled_identifiers(&self) -> Result<Vec<String>, NotificationError> {
        let requests: Vec<NotificationRequest> = self
            .db
            .load_json(keys::SCHEDULED_NOTIFICATIONS)
            .map_err(|e| NotificationError::QueryFailed(e.to_string()))?
            .unwrap_or_default();
        Ok(requests.into_iter().map(|r| r.identifier).collect())
    }

    fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotificationError> {
        let mut requests = self.pending();
        requests.retain(|r| r.identifier != request.identifier);
        let identifier = request.identifier.clone();
        requests.push(request);
        self.write(&requests, &identifier, false)?;
        tracing::debug!(identifier, "queued notification");
        Ok(())
    }

    fn cancel(&mut self, identifier: &str) -> Result<(), NotificationError> {
        let mut requests = self.pending();
        let before = requests.len();
        requests.retain(|r| r.identifier != identifier);
        if requests.len() == before {
            return Ok(());
        }
        self.write(&requests, identifier, true)?;
        tracing::debug!(identifier, "cancelled notification");
        Ok(())
    }
}

/// In-process service, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryNotifications {
    requests: Vec<NotificationRequest>,
}

impl MemoryNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[NotificationRequest] {
        &self.requests
    }
}

impl NotificationService for MemoryNotifications {
    fn scheduled_identifiers(&self) -> Result<Vec<String>, NotificationError> {
        Ok(self.requests.iter().map(|r| r.identifier.clone()).collect())
    }

    fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotificationError> {
        self.requests.retain(|r| r.identifier != request.identifier);
        self.requests.push(request);
        Ok(())
    }

    fn cancel(&mut self, identifier: &str) -> Result<(), NotificationError> {
        self.requests.retain(|r| r.identifier != identifier);
        Ok(())
    }
}
