use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use super::{Args, Principal, PrincipalKind, SignatureKey};
use crate::application::errors::HandlerError;

/// Command handler function type
///
/// The principal is always the first argument and the result is the
/// success/failure flag reported back to the host.
pub type CommandHandler =
    Arc<dyn Fn(&Principal, &Args) -> Result<bool, HandlerError> + Send + Sync>;

/// Type of one positional parameter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    Integer,
    Float,
    String,
    /// Captures every remaining token; only legal as the last slot
    StringTail,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Integer => "int",
            ParamKind::Float => "float",
            ParamKind::String => "string",
            ParamKind::StringTail => "string...",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" | "i32" => Ok(ParamKind::Integer),
            "float" | "f32" => Ok(ParamKind::Float),
            "string" | "str" => Ok(ParamKind::String),
            "string..." | "string[]" | "tail" => Ok(ParamKind::StringTail),
            other => Err(other.to_string()),
        }
    }
}

/// Which principal kinds may invoke a command shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SenderKind {
    #[default]
    Any,
    PlayerOnly,
    ConsoleOnly,
}

impl SenderKind {
    pub fn admits(&self, kind: PrincipalKind) -> bool {
        match self {
            SenderKind::Any => true,
            SenderKind::PlayerOnly => kind == PrincipalKind::Player,
            SenderKind::ConsoleOnly => kind == PrincipalKind::Console,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SenderKind::Any => "any",
            SenderKind::PlayerOnly => "player-only",
            SenderKind::ConsoleOnly => "console-only",
        }
    }
}

/// Command metadata declared by a module, before validation
pub struct CommandSpec {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub arguments: Vec<String>,
    /// Permission suffixes; qualified with the module prefix at discovery
    pub permissions: Vec<String>,
    pub player_only: bool,
    pub console_only: bool,
    pub params: Vec<ParamKind>,
    pub handler: Option<CommandHandler>,
    pub(crate) unsupported_params: Vec<String>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            arguments: Vec::new(),
            permissions: Vec::new(),
            player_only: false,
            console_only: false,
            params: Vec::new(),
            handler: None,
            unsupported_params: Vec::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Human readable label for the next argument, shown in usage text
    pub fn with_argument(mut self, label: impl Into<String>) -> Self {
        self.arguments.push(label.into());
        self
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    pub fn player_only(mut self) -> Self {
        self.player_only = true;
        self
    }

    pub fn console_only(mut self) -> Self {
        self.console_only = true;
        self
    }

    pub fn with_param(mut self, kind: ParamKind) -> Self {
        self.params.push(kind);
        self
    }

    /// Declare the parameter list from text, e.g. `"string int string..."`
    ///
    /// Unknown type names are kept aside and reported when the command is
    /// validated.
    pub fn with_signature(mut self, signature: &str) -> Self {
        for token in signature.split_whitespace() {
            match token.parse::<ParamKind>() {
                Ok(kind) => self.params.push(kind),
                Err(unknown) => self.unsupported_params.push(unknown),
            }
        }
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Principal, &Args) -> Result<bool, HandlerError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("params", &self.params)
            .field("player_only", &self.player_only)
            .field("console_only", &self.console_only)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// A validated command shape, ready for the command table
#[derive(Clone)]
pub struct Descriptor {
    pub module: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub arguments: Vec<String>,
    pub sender: SenderKind,
    pub params: Vec<ParamKind>,
    pub permissions: Vec<String>,
    pub handler: CommandHandler,
}

impl Descriptor {
    pub fn signature(&self) -> SignatureKey {
        SignatureKey::of(self)
    }

    /// Number of tokens required before any tail slot
    pub fn required_tokens(&self) -> usize {
        self.params
            .iter()
            .filter(|p| **p != ParamKind::StringTail)
            .count()
    }

    pub fn usage(&self) -> String {
        let mut usage = format!("/{}", self.name);
        if self.arguments.is_empty() {
            for param in &self.params {
                usage.push_str(&format!(" <{}>", param));
            }
        } else {
            for label in &self.arguments {
                usage.push_str(&format!(" <{}>", label));
            }
        }
        usage
    }

    pub fn info(&self) -> CommandInfo {
        CommandInfo {
            module: self.module.clone(),
            name: self.name.clone(),
            aliases: self.aliases.clone(),
            usage: self.usage(),
            description: self.description.clone().unwrap_or_default(),
            sender: self.sender,
            params: self.params.clone(),
            permissions: self.permissions.clone(),
        }
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("module", &self.module)
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("sender", &self.sender)
            .field("params", &self.params)
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Serializable summary of a descriptor, used for help listings
#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub module: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub usage: String,
    pub description: String,
    pub sender: SenderKind,
    pub params: Vec<ParamKind>,
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_kind_admission() {
        assert!(SenderKind::Any.admits(PrincipalKind::Player));
        assert!(SenderKind::Any.admits(PrincipalKind::Console));
        assert!(SenderKind::PlayerOnly.admits(PrincipalKind::Player));
        assert!(!SenderKind::PlayerOnly.admits(PrincipalKind::Console));
        assert!(SenderKind::ConsoleOnly.admits(PrincipalKind::Console));
        assert!(!SenderKind::ConsoleOnly.admits(PrincipalKind::Player));
    }

    #[test]
    fn signature_text_keeps_unknown_types_aside() {
        let spec = CommandSpec::new("give").with_signature("string int vector string...");
        assert_eq!(
            spec.params,
            vec![ParamKind::String, ParamKind::Integer, ParamKind::StringTail]
        );
        assert_eq!(spec.unsupported_params, vec!["vector".to_string()]);
    }

    #[test]
    fn usage_prefers_argument_labels() {
        let descriptor = Descriptor {
            module: "fun".into(),
            name: "slap".into(),
            aliases: vec![],
            description: None,
            arguments: vec!["target player[s]".into()],
            sender: SenderKind::Any,
            params: vec![ParamKind::String],
            permissions: vec![],
            handler: Arc::new(|_, _| Ok(true)),
        };
        assert_eq!(descriptor.usage(), "/slap <target player[s]>");

        let bare = Descriptor {
            arguments: vec![],
            params: vec![ParamKind::Integer, ParamKind::StringTail],
            ..descriptor
        };
        assert_eq!(bare.usage(), "/slap <int> <string...>");
        assert_eq!(bare.required_tokens(), 1);
    }
}
