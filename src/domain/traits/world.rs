/// Simple 3D vector for velocities
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The slice of game state feature modules act on
pub trait GameWorld: Send + Sync {
    /// Names of every online player
    fn online_players(&self) -> Vec<String>;

    /// Resolve a selector to online player names, matching names exactly
    fn select_players_exact(&self, selector: &str) -> Vec<String>;

    fn set_velocity(&self, player: &str, velocity: Vector3);

    fn set_fire_ticks(&self, player: &str, ticks: u32);

    /// Restore a player to full health; false if the player is not online
    fn heal(&self, player: &str) -> bool;
}
