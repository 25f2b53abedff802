//! In-app notification inbox

use crate::error::{LeagueError, Result};
use crate::types::{Notification, NotificationId, NotificationIntent};
use crate::utils::generate_id;
use std::sync::RwLock;

/// Notifications kept per recipient unless configured otherwise
pub const DEFAULT_INBOX_LIMIT: usize = 200;

/// Stores delivered notifications per recipient.
///
/// Each recipient keeps at most `limit` notifications; storing one more
/// evicts that recipient's oldest.
#[derive(Debug)]
pub struct NotificationInbox {
    notifications: RwLock<Vec<Notification>>,
    limit: usize,
}

impl Default for NotificationInbox {
    fn default() -> Self {
        Self::with_limit(DEFAULT_INBOX_LIMIT)
    }
}

impl NotificationInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
            limit: limit.max(1),
        }
    }

    /// Turn an intent into a stored, unread notification
    pub fn store(&self, intent: NotificationIntent) -> Result<Notification> {
        let notification = Notification {
            id: generate_id(),
            recipient: intent.recipient,
            kind: intent.kind,
            title: intent.title,
            message: intent.message,
            related_link: intent.related_link,
            is_read: false,
            created_at: intent.created_at,
        };

        let mut notifications = self
            .notifications
            .write()
            .map_err(|_| LeagueError::internal("Failed to acquire inbox write lock"))?;
        notifications.push(notification.clone());

        // Stored in arrival order, so the first match is the oldest
        let kept = notifications
            .iter()
            .filter(|n| n.recipient == notification.recipient)
            .count();
        if kept > self.limit {
            if let Some(oldest) = notifications
                .iter()
                .position(|n| n.recipient == notification.recipient)
            {
                notifications.remove(oldest);
            }
        }

        Ok(notification)
    }

    /// Notifications of one recipient, newest first
    pub fn list_for(&self, recipient: &str) -> Result<Vec<Notification>> {
        let notifications = self
            .notifications
            .read()
            .map_err(|_| LeagueError::internal("Failed to acquire inbox read lock"))?;

        let mut mine: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.recipient == recipient)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    pub fn unread_count(&self, recipient: &str) -> Result<usize> {
        let notifications = self
            .notifications
            .read()
            .map_err(|_| LeagueError::internal("Failed to acquire inbox read lock"))?;

        Ok(notifications
            .iter()
            .filter(|n| n.recipient == recipient && !n.is_read)
            .count())
    }

    /// Mark one of the recipient's notifications as read
    pub fn mark_read(&self, recipient: &str, id: NotificationId) -> Result<()> {
        let mut notifications = self
            .notifications
            .write()
            .map_err(|_| LeagueError::internal("Failed to acquire inbox write lock"))?;

        // Someone else's notification looks exactly like a missing one
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient == recipient)
            .ok_or_else(|| LeagueError::not_found("Notification", id))?;
        notification.is_read = true;

        Ok(())
    }

    /// Mark everything for the recipient as read, returning how many changed
    pub fn mark_all_read(&self, recipient: &str) -> Result<usize> {
        let mut notifications = self
            .notifications
            .write()
            .map_err(|_| LeagueError::internal("Failed to acquire inbox write lock"))?;

        let mut changed = 0;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.recipient == recipient && !n.is_read)
        {
            notification.is_read = true;
            changed += 1;
        }

        Ok(changed)
    }

    /// Every stored notification in arrival order
    pub fn all(&self) -> Result<Vec<Notification>> {
        let notifications = self
            .notifications
            .read()
            .map_err(|_| LeagueError::internal("Failed to acquire inbox read lock"))?;
        Ok(notifications.clone())
    }

    pub fn len(&self) -> usize {
        self.notifications.read().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::messages::system_notice;

    #[test]
    fn test_store_and_list() {
        let inbox = NotificationInbox::new();
        inbox.store(system_notice("alice", "One", "first")).unwrap();
        inbox.store(system_notice("bob", "Two", "second")).unwrap();
        inbox.store(system_notice("alice", "Three", "third")).unwrap();

        let alice = inbox.list_for("alice").unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|n| !n.is_read));
        assert!(alice[0].created_at >= alice[1].created_at);
        assert_eq!(inbox.len(), 3);
    }

    #[test]
    fn test_unread_count_and_mark_read() {
        let inbox = NotificationInbox::new();
        let first = inbox.store(system_notice("alice", "t", "m")).unwrap();
        inbox.store(system_notice("alice", "t", "m")).unwrap();

        assert_eq!(inbox.unread_count("alice").unwrap(), 2);
        inbox.mark_read("alice", first.id).unwrap();
        assert_eq!(inbox.unread_count("alice").unwrap(), 1);
    }

    #[test]
    fn test_mark_read_of_foreign_notification_is_not_found() {
        let inbox = NotificationInbox::new();
        let n = inbox.store(system_notice("alice", "t", "m")).unwrap();

        let err = inbox.mark_read("mallory", n.id).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(inbox.unread_count("alice").unwrap(), 1);
    }

    #[test]
    fn test_limit_evicts_oldest_of_same_recipient() {
        let inbox = NotificationInbox::with_limit(2);
        let first = inbox.store(system_notice("alice", "1", "m")).unwrap();
        inbox.store(system_notice("bob", "b", "m")).unwrap();
        inbox.store(system_notice("alice", "2", "m")).unwrap();
        inbox.store(system_notice("alice", "3", "m")).unwrap();

        let alice = inbox.list_for("alice").unwrap();
        let titles: Vec<&str> = alice.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(alice.len(), 2);
        assert!(!titles.contains(&"1"));
        assert!(inbox.mark_read("alice", first.id).unwrap_err().is_not_found());
        assert_eq!(inbox.list_for("bob").unwrap().len(), 1);
        assert_eq!(inbox.len(), 3);

        let order: Vec<String> = inbox.all().unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(order, vec!["b", "2", "3"]);
    }

    #[test]
    fn test_mark_all_read() {
        let inbox = NotificationInbox::new();
        inbox.store(system_notice("alice", "t", "m")).unwrap();
        inbox.store(system_notice("alice", "t", "m")).unwrap();
        inbox.store(system_notice("bob", "t", "m")).unwrap();

        assert_eq!(inbox.mark_all_read("alice").unwrap(), 2);
        assert_eq!(inbox.mark_all_read("alice").unwrap(), 0);
        assert_eq!(inbox.unread_count("bob").unwrap(), 1);
    }
}
