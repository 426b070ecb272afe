//! Notification port.
//!
//! After each successful mutation the store hands a [`Notice`] to its
//! notifier. Rendering (toasts, terminal output) belongs to the
//! presentation layer.

use gathering_types::Notice;

/// Receives a notice after each successful mutation.
pub trait Notifier {
    /// Deliver one notice.
    fn notify(&self, notice: &Notice);
}

/// Logs notices through `tracing`. The default notifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::info!(
            title = %notice.title,
            description = %notice.description,
            "Notice"
        );
    }
}

/// Notice texts for each mutation.
pub mod notices {
    use gathering_types::Notice;

    /// After a successful create.
    pub fn created() -> Notice {
        Notice::new("Event Created", "New event has been successfully created.")
    }

    /// After a successful update.
    pub fn updated() -> Notice {
        Notice::new("Event Updated", "The event has been successfully updated.")
    }

    /// After a successful delete.
    pub fn deleted() -> Notice {
        Notice::new("Event Deleted", "The event has been successfully removed.")
    }

    /// After a pin toggle; `pinned` is the new state.
    pub fn pin_toggled(pinned: bool) -> Notice {
        let verb = if pinned { "pinned" } else { "unpinned" };
        Notice::new("Event Updated", format!("Event {verb} successfully."))
    }
}
