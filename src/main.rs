//! Binary entrypoint for the Mystic Realms CLI.
//!
//! Commands:
//! - `play [--class <c>] [--name <n>] [--seed <s>]` - interactive game over stdin/stdout
//! - `init` - write a starter `config.toml`
//! - `world [--json]` - print the canonical room graph
//!
//! See the library crate docs for module-level details: `mystic_realms::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::Path;

use mystic_realms::config::Config;
use mystic_realms::game::{parse_command, CharacterClass, GameSession, PlayerCommand, World};
use mystic_realms::logutil::{single_line, LOG_PREVIEW};

#[derive(Parser)]
#[command(name = "mystic-realms")]
#[command(about = "A turn-based fantasy adventure in the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game on this terminal
    Play {
        /// Character class: knight, mage or archer
        #[arg(long)]
        class: Option<CharacterClass>,
        /// Character name
        #[arg(short, long)]
        name: Option<String>,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write a default configuration file
    Init,
    /// Print the rooms and exits of the standard map
    World {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            info!("Initializing new game configuration");
            if Path::new(&cli.config).exists() {
                warn!("{} already exists; leaving it untouched", cli.config);
                return Ok(());
            }
            Config::create_default(&cli.config)?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::World { json } => {
            let config = load_config(&cli.config)?;
            init_logging(&Some(config), cli.verbose);
            let world = World::canonical()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&world.summary())?);
            } else {
                for room in world.summary() {
                    let exits: Vec<String> = room
                        .exits
                        .iter()
                        .map(|(dir, to)| format!("{} -> {}", dir, to))
                        .collect();
                    let secret = if room.is_secret { " (secret)" } else { "" };
                    println!("{} [{:?}]{}", room.name, room.room_type, secret);
                    for exit in exits {
                        println!("  {}", exit);
                    }
                }
            }
        }
        Commands::Play { class, name, seed } => {
            let mut config = load_config(&cli.config)?;
            init_logging(&Some(config.clone()), cli.verbose);
            if seed.is_some() {
                config.game.seed = seed;
            }
            let class = class.unwrap_or(config.game.player_class);
            let name = name.unwrap_or_else(|| config.game.player_name.clone());
            info!("Starting Mystic Realms v{}", env!("CARGO_PKG_VERSION"));
            run_repl(GameSession::new(config.game), class, &name)?;
        }
    }

    Ok(())
}

/// Missing file means defaults; an unreadable or malformed one is an error.
fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        Config::load(path)
    } else {
        Ok(Config::default())
    }
}

fn run_repl(mut session: GameSession, class: CharacterClass, name: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "{}", session.start_new_game(class, name)?)?;
    writeln!(stdout, "Type 'help' for commands.")?;

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                writeln!(stdout, "{}", e)?;
                continue;
            }
        };
        let quitting = command == PlayerCommand::Quit;
        match session.dispatch(command) {
            Ok(text) => writeln!(stdout, "{}", text)?,
            Err(e) => {
                info!("command '{}' rejected: {}", single_line(line.trim(), LOG_PREVIEW), e);
                writeln!(stdout, "{}", e)?;
            }
        }
        if quitting {
            break;
        }
    }
    info!("session {} ended", session.id());
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Warn),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    if let Some(file) = log_file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Mutex::new(f);

            // Echo to the console only when stderr goes to a terminal
            let is_tty = atty::is(atty::Stream::Stderr);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
            let _ = builder.try_init();
            return;
        }
    }
    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    let _ = builder.try_init();
}
