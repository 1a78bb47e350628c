use std::fmt;

/// Which kind of entity issued a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    Player,
    Console,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Player => "player",
            PrincipalKind::Console => "console",
        }
    }
}

/// A connected player
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Player {
    pub name: String,
    pub display_name: Option<String>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// The entity issuing a command: a restricted player or the unrestricted console
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
    Console,
    Player(Player),
}

impl Principal {
    pub fn console() -> Self {
        Principal::Console
    }

    pub fn player(name: impl Into<String>) -> Self {
        Principal::Player(Player::new(name))
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Console => PrincipalKind::Console,
            Principal::Player(_) => PrincipalKind::Player,
        }
    }

    /// Name used when addressing or mentioning the principal
    pub fn name(&self) -> &str {
        match self {
            Principal::Console => "CONSOLE",
            Principal::Player(player) => &player.name,
        }
    }

    /// Restricted principals are subject to permission checks
    pub fn is_restricted(&self) -> bool {
        matches!(self, Principal::Player(_))
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Principal::Player(player) => Some(player),
            Principal::Console => None,
        }
    }

    /// Whether this principal is the player with the given name (case-insensitive)
    pub fn is_player_named(&self, name: &str) -> bool {
        self.as_player()
            .map(|p| p.name.eq_ignore_ascii_case(name))
            .unwrap_or(false)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::Console => write!(f, "CONSOLE"),
            Principal::Player(player) => write!(f, "{}", player.display_name()),
        }
    }
}

impl From<Player> for Principal {
    fn from(player: Player) -> Self {
        Principal::Player(player)
    }
}
