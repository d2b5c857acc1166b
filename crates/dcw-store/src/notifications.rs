use dcw_types::models::Category;

use crate::{Store, StoreState};

/// Text queued for a student when their complaint is resolved.
pub fn resolution_message(category: Category) -> String {
    format!("Your complaint '{category}' has been resolved ✅")
}

impl Store {
    /// Messages queued for `identifier`, oldest first. Never cleared.
    pub fn notifications_for(&self, identifier: &str) -> Vec<String> {
        self.with_state(|s| s.notifications.get(identifier).cloned().unwrap_or_default())
    }
}

impl StoreState {
    pub(crate) fn push_notification(&mut self, identifier: &str, message: String) {
        self.notifications
            .entry(identifier.to_string())
            .or_default()
            .push(message);
    }
}
