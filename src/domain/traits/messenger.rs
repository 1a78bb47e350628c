use crate::domain::entities::Principal;

/// Delivers formatted text to a principal
pub trait Messenger: Send + Sync {
    fn send(&self, principal: &Principal, text: &str);

    /// Send the same text to each recipient
    fn broadcast(&self, recipients: &[Principal], text: &str) {
        for recipient in recipients {
            self.send(recipient, text);
        }
    }
}
