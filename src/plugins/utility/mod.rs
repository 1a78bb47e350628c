//! Utility module - everyday server commands
//!
//! `whoami` registers a console-only and a player-only shape under the same
//! name. Self-healing lives under its own name: surplus tokens are ignored,
//! so a zero-argument `heal` overload would swallow `/heal <target>`.

use std::sync::Arc;

use rand::Rng;

use crate::application::errors::HandlerError;
use crate::domain::entities::{Args, CommandSpec, ParamKind, Principal};
use crate::domain::traits::{GameWorld, Messenger, Vector3};
use crate::plugins::trait_def::Module;

#[derive(Clone)]
struct Utility {
    world: Arc<dyn GameWorld>,
    messenger: Arc<dyn Messenger>,
}

impl Utility {
    fn broadcast(&self, sender: &Principal, args: &Args) -> Result<bool, HandlerError> {
        let message = args.phrase(0)?;
        if message.trim().is_empty() {
            return Err(HandlerError::command("You have to say something!"));
        }

        let mut recipients: Vec<Principal> = self
            .world
            .online_players()
            .into_iter()
            .map(Principal::player)
            .collect();
        recipients.push(Principal::console());
        self.messenger.broadcast(
            &recipients,
            &format!("&6[{}] &f{}", sender.name(), message),
        );
        Ok(true)
    }

    fn heal_other(&self, sender: &Principal, args: &Args) -> Result<bool, HandlerError> {
        let target = args.string(0)?;
        let Some(name) = self.world.select_players_exact(target).into_iter().next() else {
            return Err(HandlerError::command("Target not found"));
        };
        if !self.world.heal(&name) {
            return Err(HandlerError::command("Target not found"));
        }

        if !sender.is_player_named(&name) {
            self.messenger.send(&Principal::player(name.clone()), "&aYou have been healed!");
        }
        self.messenger.send(sender, &format!("&aHealed {}", name));
        Ok(true)
    }

    fn heal_self(&self, sender: &Principal) -> Result<bool, HandlerError> {
        if !self.world.heal(sender.name()) {
            return Err(HandlerError::internal(format!(
                "player {} is not in the world",
                sender.name()
            )));
        }
        self.messenger.send(sender, "&aYou have been healed!");
        Ok(true)
    }

    fn roll(&self, sender: &Principal, args: &Args) -> Result<bool, HandlerError> {
        let sides = args.int(0)?;
        if sides < 1 {
            return Err(HandlerError::command("A die needs at least one side"));
        }
        let rolled = rand::thread_rng().gen_range(1..=sides);
        self.messenger
            .send(sender, &format!("&e{} rolled {} (d{})", sender.name(), rolled, sides));
        Ok(true)
    }

    fn launch(&self, sender: &Principal, args: &Args) -> Result<bool, HandlerError> {
        let target = args.string(0)?;
        let power = args.float(1)?;
        let Some(name) = self.world.select_players_exact(target).into_iter().next() else {
            return Err(HandlerError::command("Target not found"));
        };
        self.world
            .set_velocity(&name, Vector3::new(0.0, f64::from(power), 0.0));
        self.messenger
            .send(sender, &format!("&eLaunched {} with power {}", name, power));
        Ok(true)
    }
}

pub struct UtilityModule {
    utility: Utility,
}

impl UtilityModule {
    pub fn new(world: Arc<dyn GameWorld>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            utility: Utility { world, messenger },
        }
    }
}

impl Module for UtilityModule {
    fn name(&self) -> &str {
        "utility"
    }

    fn description(&self) -> &str {
        "Broadcasts, healing, dice and friends"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        let u = &self.utility;
        let (broadcast, heal_other, heal_self) = (u.clone(), u.clone(), u.clone());
        let (console, whoami, roll, launch) = (u.clone(), u.clone(), u.clone(), u.clone());

        vec![
            CommandSpec::new("broadcast")
                .with_aliases(["bc"])
                .with_description("Announce a message to everyone")
                .with_argument("message...")
                .with_permission("broadcast")
                .with_param(ParamKind::StringTail)
                .with_handler(move |sender, args| broadcast.broadcast(sender, args)),
            CommandSpec::new("heal")
                .with_description("Heal another player")
                .with_argument("target")
                .with_permission("heal.other")
                .with_param(ParamKind::String)
                .with_handler(move |sender, args| heal_other.heal_other(sender, args)),
            CommandSpec::new("healme")
                .with_description("Heal yourself")
                .with_permission("heal.self")
                .player_only()
                .with_handler(move |sender, _| heal_self.heal_self(sender)),
            CommandSpec::new("whoami")
                .with_description("Show who you are")
                .console_only()
                .with_handler(move |sender, _| {
                    console.messenger.send(sender, "&7You are the console");
                    Ok(true)
                }),
            CommandSpec::new("whoami")
                .with_description("Show who you are")
                .player_only()
                .with_handler(move |sender, _| {
                    let name = sender
                        .as_player()
                        .map(|p| p.display_name().to_string())
                        .unwrap_or_else(|| sender.name().to_string());
                    whoami.messenger.send(sender, &format!("&7You are {}", name));
                    Ok(true)
                }),
            CommandSpec::new("roll")
                .with_aliases(["dice"])
                .with_description("Roll a die")
                .with_argument("sides")
                .with_signature("int")
                .with_handler(move |sender, args| roll.roll(sender, args)),
            CommandSpec::new("launch")
                .with_description("Throw a player upwards")
                .with_argument("target")
                .with_argument("power")
                .with_permission("launch")
                .with_signature("string float")
                .with_handler(move |sender, args| launch.launch(sender, args)),
        ]
    }
}
