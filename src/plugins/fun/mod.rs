//! Fun module - slap, rocket and immolate players

use std::sync::Arc;

use rand::Rng;

use crate::application::errors::HandlerError;
use crate::domain::entities::{Args, CommandSpec, ParamKind, Principal};
use crate::domain::traits::{GameWorld, Messenger, Vector3};
use crate::infrastructure::config::FunConfig;
use crate::plugins::trait_def::Module;

const TARGET: &str = "target player[s]";

/// What happens to each target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    Slap,
    Rocket,
    Immolate,
}

impl Effect {
    fn verb(self) -> &'static str {
        match self {
            Effect::Slap => "slap",
            Effect::Rocket => "rocket",
            Effect::Immolate => "immolate",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Effect::Slap => "slapped",
            Effect::Rocket => "rocketed",
            Effect::Immolate => "immolated",
        }
    }
}

#[derive(Clone)]
struct Fun {
    world: Arc<dyn GameWorld>,
    messenger: Arc<dyn Messenger>,
    settings: FunConfig,
}

impl Fun {
    fn apply(&self, effect: Effect, sender: &Principal, args: &Args) -> Result<bool, HandlerError> {
        let selector = args.string(0)?;
        let targets = self.world.select_players_exact(selector);
        if targets.is_empty() {
            return Err(HandlerError::command(format!(
                "I couldn't find / parse target player[s] '{}' to {}!",
                selector,
                effect.verb()
            )));
        }

        let limit = self.settings.broadcast_limit;
        let mut count = 0;
        for target in &targets {
            self.affect(effect, target);

            let victim = Principal::player(target.clone());
            if sender.is_player_named(target) {
                self.messenger
                    .send(&victim, &format!("&eYou {} yourself!", effect.past()));
            } else {
                self.messenger.send(
                    &victim,
                    &format!("&eYou were {} by {}!", effect.past(), sender.name()),
                );
            }

            if self.settings.broadcast && count < limit {
                let bystanders: Vec<Principal> = self
                    .world
                    .online_players()
                    .into_iter()
                    .filter(|p| p != target && !sender.is_player_named(p))
                    .map(Principal::player)
                    .collect();
                self.messenger.broadcast(
                    &bystanders,
                    &format!("&e{} was {} by {}!", target, effect.past(), sender.name()),
                );
            }
            count += 1;
        }

        // only when some targets went unannounced
        if count > limit {
            let everyone: Vec<Principal> = self
                .world
                .online_players()
                .into_iter()
                .map(Principal::player)
                .collect();
            self.messenger.broadcast(&everyone, "&eand many more people...");
        }

        Ok(true)
    }

    fn affect(&self, effect: Effect, target: &str) {
        match effect {
            Effect::Slap => {
                let mut rng = rand::thread_rng();
                let velocity = Vector3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(0.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                self.world.set_velocity(target, velocity);
            }
            Effect::Rocket => {
                self.world
                    .set_velocity(target, Vector3::new(0.0, self.settings.rocket_velocity, 0.0));
            }
            Effect::Immolate => self.world.set_fire_ticks(target, self.settings.fire_ticks),
        }
    }
}

/// Player pranks, each taking a target selector (`bob`, `bob,alice` or `*`)
pub struct FunModule {
    fun: Fun,
}

impl FunModule {
    pub fn new(world: Arc<dyn GameWorld>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            fun: Fun {
                world,
                messenger,
                settings: FunConfig::default(),
            },
        }
    }

    pub fn with_settings(mut self, settings: FunConfig) -> Self {
        self.fun.settings = settings;
        self
    }

    fn command(&self, effect: Effect) -> CommandSpec {
        let fun = self.fun.clone();
        CommandSpec::new(effect.verb())
            .with_argument(TARGET)
            .with_description(format!("{}s {}", effect.verb(), TARGET))
            .with_permission(effect.verb())
            .with_param(ParamKind::String)
            .with_handler(move |sender, args| fun.apply(effect, sender, args))
    }
}

impl Module for FunModule {
    fn name(&self) -> &str {
        "fun"
    }

    fn description(&self) -> &str {
        "Slap, rocket and immolate players"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            self.command(Effect::Slap),
            self.command(Effect::Rocket),
            self.command(Effect::Immolate),
        ]
    }
}
