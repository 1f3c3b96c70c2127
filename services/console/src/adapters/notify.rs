//! services/console/src/adapters/notify.rs
//!
//! The console's toast sink: every notification is logged and kept in a
//! bounded backlog until the browser drains it.

use std::collections::VecDeque;
use std::sync::Mutex;

use tracing::{info, warn};
use wonderpay_core::ports::Notifier;
use wonderpay_core::{Notification, NotificationKind};

const DEFAULT_CAPACITY: usize = 64;

pub struct NotificationLog {
    backlog: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NotificationLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            backlog: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Removes and returns every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.backlog
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                info!(title = %notification.title, "{}", notification.description)
            }
            NotificationKind::Destructive => {
                warn!(title = %notification.title, "{}", notification.description)
            }
        }
        let mut backlog = self.backlog.lock().unwrap_or_else(|e| e.into_inner());
        if backlog.len() == self.capacity {
            backlog.pop_front();
        }
        backlog.push_back(notification);
    }
}
