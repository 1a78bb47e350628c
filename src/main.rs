use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use commandeer::application::errors::EngineError;
use commandeer::application::services::CommandService;
use commandeer::domain::traits::{GameWorld, Messenger};
use commandeer::infrastructure::adapters::ConsoleServer;
use commandeer::infrastructure::config::Config;
use commandeer::plugins::{FunModule, ModuleManager, UtilityModule};

#[derive(Parser)]
#[command(name = "commandeer")]
#[command(about = "Command registration and dispatch for game-server modules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml", env = "COMMANDEER_CONFIG")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the console server
    Run,
    /// List every registered command
    Commands {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_server(&cli.config),
        Commands::Commands { json } => list_commands(&cli.config, json),
        Commands::Version => {
            println!("commandeer v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn read_config(config_path: &str) -> Result<Config, EngineError> {
    if !Path::new(config_path).exists() {
        return Ok(Config::load_env());
    }
    let mut config = Config::load(config_path)?;
    config.apply_env();
    Ok(config)
}

fn load_config(config_path: &str) -> Config {
    read_config(config_path).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}, using defaults", e);
        Config::load_env()
    })
}

/// Everything a running console server holds on to
struct Session {
    server: ConsoleServer,
    commands: CommandService,
}

impl Session {
    fn start(config: &Config) -> Self {
        let server = ConsoleServer::from_config(config)
            .with_unknown_command(config.messages.invalid_command.clone());
        let commands = CommandService::new(
            server.host(),
            server.permissions(),
            server.messenger(),
            config.messages.clone(),
        )
        .with_prefix(config.server.prefix.clone());

        let mut session = Self { server, commands };
        session.load(config);
        session
    }

    fn modules(&self, config: &Config) -> ModuleManager {
        let world: Arc<dyn GameWorld> = self.server.world();
        let messenger: Arc<dyn Messenger> = self.server.messenger();

        let mut modules = ModuleManager::new();
        let fun = FunModule::new(world.clone(), messenger.clone()).with_settings(config.fun.clone());
        if let Err(e) = modules.register(fun) {
            tracing::error!("Failed to register fun module: {}", e);
        }
        if let Err(e) = modules.register(UtilityModule::new(world, messenger)) {
            tracing::error!("Failed to register utility module: {}", e);
        }
        config.apply_modules(&mut modules);
        modules
    }

    fn load(&mut self, config: &Config) {
        let modules = self.modules(config);
        self.commands.set_messages(config.messages.clone());
        let report = self.commands.reload(&modules);
        tracing::info!(
            "{} modules, {} commands installed",
            modules.list_modules().iter().filter(|m| m.enabled).count(),
            report.installed
        );
    }
}

fn run_server(config_path: &str) -> Result<(), EngineError> {
    let config = load_config(config_path);
    tracing::info!("Starting commandeer: {}", config.server.name);

    let mut session = Session::start(&config);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        run_console(&mut session, config_path).await;
    });
    Ok(())
}

async fn run_console(session: &mut Session, config_path: &str) {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type /<command> to run as the console, @<player> /<command> to run as a player.");
    println!("Other inputs: help [command], players, reload, quit");

    loop {
        let _ = stdout.write_all(b"> ").await;
        let _ = stdout.flush().await;

        let input = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "quit" | "exit" => break,
            "players" => {
                for player in session.server.world().players() {
                    println!(
                        "{} {} health={} fire={} velocity=({:.2}, {:.2}, {:.2}) perms=[{}]",
                        if player.online { "*" } else { " " },
                        player.name,
                        player.health,
                        player.fire_ticks,
                        player.velocity.x,
                        player.velocity.y,
                        player.velocity.z,
                        session.server.permissions().granted(&player.name).join(", ")
                    );
                }
            }
            "reload" => {
                let config = load_config(config_path);
                session.load(&config);
            }
            _ => {
                let (principal, text) = ConsoleServer::parse_input(input);
                let mut words = text.trim_start_matches('/').split_whitespace();
                if words.next() == Some("help") {
                    println!("{}", session.commands.get_help(words.next()));
                    continue;
                }
                let handled = session.server.execute(&principal, text);
                tracing::debug!("{} ran '{}' (handled: {})", principal, text, handled);
            }
        }

        // echoed as they happened; nothing reads the backlog
        session.server.messenger().take();
    }

    tracing::info!("Console closed");
}

fn list_commands(config_path: &str, json: bool) -> Result<(), EngineError> {
    let mut config = read_config(config_path)?;
    config.console.echo = false;
    let session = Session::start(&config);

    if json {
        let out = serde_json::to_string_pretty(&session.commands.list())
            .map_err(|e| EngineError::Internal(format!("Failed to serialize commands: {}", e)))?;
        println!("{}", out);
    } else {
        print!("{}", session.commands.get_help(None));
    }
    Ok(())
}

fn init_config() -> Result<(), EngineError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
