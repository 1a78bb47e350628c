use chrono::{DateTime, Utc};

/// A command line as typed by a principal, split into label and raw tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub id: String,
    /// The name or alias that was typed, lowercased, without the leading slash
    pub label: String,
    pub args: Vec<String>,
    pub received_at: DateTime<Utc>,
}

impl CommandLine {
    pub fn new(label: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.into().to_lowercase(),
            args,
            received_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }
}
