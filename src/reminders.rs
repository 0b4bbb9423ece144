//! Due-date reminders.
//!
//! The store decides when a reminder is needed; delivering it is up to the
//! host (local notifications on a phone, nothing at all in a CLI).

use std::time::SystemTime;

use uuid::Uuid;

use crate::models::Item;

const EMPTY_BODY: &str = "Task due";

/// A one-shot reminder for an item's due date
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct Reminder {
    /// Item id, also the identifier used to cancel the reminder
    pub item_id: String,
    /// Title of the document holding the item
    pub title: String,
    pub body: String,
    pub due: SystemTime,
}

impl Reminder {
    /// Reminder for `item` in the document called `title`, or `None` when
    /// the item has no due date
    #[must_use]
    pub fn for_item(item: &Item, title: &str) -> Option<Self> {
        let due = item.due_date?;
        let body = if item.text.is_empty() {
            EMPTY_BODY.to_string()
        } else {
            item.text.clone()
        };
        Some(Self {
            item_id: item.id.to_string(),
            title: title.to_string(),
            body,
            due: due.into(),
        })
    }
}

/// Delivers reminders; implemented by the host
#[uniffi::export(with_foreign)]
pub trait ReminderScheduler: Send + Sync {
    /// Schedule `reminder`, replacing any pending one for the same item
    fn schedule(&self, reminder: Reminder);

    /// Drop the pending reminder for an item, if any
    fn cancel(&self, item_id: String);
}

/// Scheduler that drops every request
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReminders;

impl ReminderScheduler for NoReminders {
    fn schedule(&self, _reminder: Reminder) {}

    fn cancel(&self, _item_id: String) {}
}

pub(crate) fn cancel_item(scheduler: &dyn ReminderScheduler, id: Uuid) {
    scheduler.cancel(id.to_string());
}
