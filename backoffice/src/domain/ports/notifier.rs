//! Port for the toast/alert surface.
//!
//! The data layer emits `{title, description, variant}`-shaped messages;
//! rendering them is the host application's concern. The contract is one
//! notification per failed mutation, so tests assert on counts as well
//! as content.

use std::sync::Mutex;

/// Visual style of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    /// Confirmation of a completed action.
    Success,
    /// A failed or partially failed action.
    Destructive,
}

/// A single user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// Supporting detail, often the error message.
    pub description: String,
    /// Visual style.
    pub variant: ToastVariant,
}

impl Notification {
    /// Build a success notification.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Success,
        }
    }

    /// Build a destructive notification.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }
}

/// Outbound port for raising notifications.
pub trait Notifier: Send + Sync {
    /// Raise one notification. Infallible by contract: a broken toast
    /// surface must never fail a mutation.
    fn notify(&self, notification: Notification);
}

/// Notifier that drops everything, for callers without a toast surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Test double recording every notification in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications raised so far, oldest first.
    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().expect("notifier records poisoned").clone()
    }

    /// Number of notifications raised so far.
    pub fn count(&self) -> usize {
        self.seen.lock().expect("notifier records poisoned").len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .expect("notifier records poisoned")
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_preserves_order_and_variants() {
        let recorder = RecordingNotifier::new();
        recorder.notify(Notification::success("Saved", "user updated"));
        recorder.notify(Notification::destructive("Failed", "permission denied"));

        let seen = recorder.seen();
        assert_eq!(recorder.count(), 2);
        assert_eq!(
            seen.iter().map(|n| n.variant).collect::<Vec<_>>(),
            vec![ToastVariant::Success, ToastVariant::Destructive]
        );
    }
}
