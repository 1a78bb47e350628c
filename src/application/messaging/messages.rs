//! User-facing dispatch messages

use serde::{Deserialize, Serialize};

use crate::domain::entities::PrincipalKind;

/// Texts the dispatcher sends back to a principal
///
/// Colour codes (`&c` and friends) are left in place for the host's
/// formatter to render.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Messages {
    pub invalid_command: String,
    pub permission_denied: String,
    pub players_only: String,
    pub console_only: String,
    pub internal_error: String,
    /// Prepended to the text of a handler's command error
    pub error_prefix: String,
}

impl Messages {
    /// Message for a principal whose kind a command shape refuses
    pub fn sender_rejected(&self, kind: PrincipalKind) -> &str {
        match kind {
            PrincipalKind::Console => &self.players_only,
            PrincipalKind::Player => &self.console_only,
        }
    }

    pub fn command_error(&self, text: &str) -> String {
        format!("{}{}", self.error_prefix, text)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            invalid_command: "&cInvalid command! Type /help for some help!".to_string(),
            permission_denied: "&cSorry, you don't have permission to do that!".to_string(),
            players_only: "&cSorry, that command is for players only".to_string(),
            console_only: "&cSorry, that command is for the console only".to_string(),
            internal_error: "&cSomething went wrong! Alert an administrator!".to_string(),
            error_prefix: "&c".to_string(),
        }
    }
}
