//! Command line parser - splits raw text into label and tokens

use crate::domain::entities::CommandLine;

/// Parses typed text such as `/slap bob` into a [`CommandLine`]
#[derive(Debug, Clone)]
pub struct CommandParser {
    command_prefix: String,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Parse a line of text; returns `None` for blank input
    ///
    /// The prefix is optional so console input without a slash still works.
    /// Tokens are whitespace-delimited with no quoting rules.
    pub fn parse(&self, text: &str) -> Option<CommandLine> {
        let text = text.trim();
        let cmd_text = if !self.command_prefix.is_empty() && text.starts_with(&self.command_prefix) {
            &text[self.command_prefix.len()..]
        } else {
            text.trim_start_matches('/')
        };

        let mut parts = cmd_text.split_whitespace();
        let name = parts.next()?;
        let args = parts.map(str::to_string).collect();
        Some(CommandLine::new(name, args))
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new("/")
    }
}
