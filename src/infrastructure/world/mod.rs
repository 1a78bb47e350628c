//! In-memory game world used by the console host

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::domain::traits::{GameWorld, Vector3};

pub const MAX_HEALTH: f32 = 20.0;

/// State the feature modules can observe and mutate
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub name: String,
    pub velocity: Vector3,
    pub fire_ticks: u32,
    pub health: f32,
    pub online: bool,
}

impl PlayerState {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            velocity: Vector3::default(),
            fire_ticks: 0,
            health: MAX_HEALTH,
            online: true,
        }
    }
}

/// Players keyed by lowercased name
#[derive(Default)]
pub struct InMemoryWorld {
    players: RwLock<BTreeMap<String, PlayerState>>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let world = Self::new();
        for name in names {
            world.join(name);
        }
        world
    }

    /// Bring a player online, creating them on first join
    pub fn join(&self, name: impl Into<String>) {
        let name = name.into();
        if let Ok(mut players) = self.players.write() {
            players
                .entry(name.to_lowercase())
                .and_modify(|p| p.online = true)
                .or_insert_with(|| PlayerState::new(name));
        }
    }

    pub fn leave(&self, name: &str) {
        if let Ok(mut players) = self.players.write() {
            if let Some(player) = players.get_mut(&name.to_lowercase()) {
                player.online = false;
            }
        }
    }

    pub fn player(&self, name: &str) -> Option<PlayerState> {
        self.players.read().ok()?.get(&name.to_lowercase()).cloned()
    }

    pub fn set_health(&self, name: &str, health: f32) {
        self.update(name, |p| p.health = health.clamp(0.0, MAX_HEALTH));
    }

    pub fn players(&self) -> Vec<PlayerState> {
        self.players
            .read()
            .ok()
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default()
    }

    fn update(&self, name: &str, f: impl FnOnce(&mut PlayerState)) -> bool {
        let Ok(mut players) = self.players.write() else {
            return false;
        };
        match players.get_mut(&name.to_lowercase()) {
            Some(player) if player.online => {
                f(player);
                true
            }
            _ => false,
        }
    }
}

impl GameWorld for InMemoryWorld {
    fn online_players(&self) -> Vec<String> {
        self.players
            .read()
            .ok()
            .map(|p| p.values().filter(|p| p.online).map(|p| p.name.clone()).collect())
            .unwrap_or_default()
    }

    /// `*` selects everyone online; otherwise a comma separated list of exact
    /// (case-insensitive) names
    fn select_players_exact(&self, selector: &str) -> Vec<String> {
        let selector = selector.trim();
        if selector == "*" {
            return self.online_players();
        }

        let Ok(players) = self.players.read() else {
            return Vec::new();
        };
        let mut selected: Vec<String> = Vec::new();
        for wanted in selector.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(player) = players.get(&wanted.to_lowercase()) {
                if player.online && !selected.contains(&player.name) {
                    selected.push(player.name.clone());
                }
            }
        }
        selected
    }

    fn set_velocity(&self, player: &str, velocity: Vector3) {
        self.update(player, |p| p.velocity = velocity);
    }

    fn set_fire_ticks(&self, player: &str, ticks: u32) {
        self.update(player, |p| p.fire_ticks = ticks);
    }

    fn heal(&self, player: &str) -> bool {
        self.update(player, |p| {
            p.health = MAX_HEALTH;
            p.fire_ticks = 0;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_exact_names_only() {
        let world = InMemoryWorld::with_players(["Alice", "bob", "bobby"]);
        assert_eq!(world.select_players_exact("bob"), vec!["bob".to_string()]);
        assert_eq!(world.select_players_exact("ALICE, bob,alice"), vec!["Alice".to_string(), "bob".to_string()]);
        assert!(world.select_players_exact("bo").is_empty());
        assert_eq!(world.select_players_exact("*").len(), 3);
    }

    #[test]
    fn offline_players_are_untouched() {
        let world = InMemoryWorld::with_players(["alice"]);
        world.leave("alice");
        assert!(world.select_players_exact("alice").is_empty());
        world.set_fire_ticks("alice", 100);
        assert_eq!(world.player("alice").unwrap().fire_ticks, 0);
        assert!(!world.heal("alice"));
    }

    #[test]
    fn heal_restores_health_and_puts_out_fire() {
        let world = InMemoryWorld::with_players(["alice"]);
        world.set_health("alice", 3.0);
        world.set_fire_ticks("alice", 240);
        assert!(world.heal("alice"));
        let alice = world.player("alice").unwrap();
        assert_eq!(alice.health, MAX_HEALTH);
        assert_eq!(alice.fire_ticks, 0);
    }
}
