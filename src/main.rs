//! Binary entrypoint for the raidledger CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml` and seed the raid catalog
//! - `add` - validate a nickname and add a character to the roster
//! - `remove` - remove a character (and its portrait) by name
//! - `list` - print the roster in the persisted sort order
//! - `overview` - print account-wide gold and mission totals
//! - `status` - print data dir, roster size, and reset stamps
//!
//! See the library crate docs for module-level details: `raidledger::`.
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use raidledger::config::Config;
use raidledger::roster::{
    compute_overview, CharacterStore, CharacterStoreBuilder, LocalPortraitStore, NewCharacter,
    SettingsStore,
};
use raidledger::storage::{keys, KvStore};
use raidledger::validation::{
    parse_separated_number, validate_nickname, NicknameValidation, NICKNAME_MAX_CHARS,
};

#[derive(Parser)]
#[command(name = "raidledger")]
#[command(about = "Weekly raid and gold tracker for online game rosters")]
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
    /// Initialize a new tracker configuration and data directory
    Init,
    /// Add a character to the roster
    Add {
        /// In-game nickname (letters, digits, Hangul; max 12 chars)
        name: String,
        /// Class name
        #[arg(long, default_value = "")]
        class: String,
        /// Server name
        #[arg(long, default_value = "")]
        server: String,
        /// Item level, separators allowed (e.g. "1,540")
        #[arg(long, default_value = "0")]
        item_level: String,
        /// Local source image for the portrait
        #[arg(long)]
        portrait: Option<String>,
    },
    /// Remove a character by name
    Remove { name: String },
    /// List the roster in the persisted sort order
    List,
    /// Show the raid tiers selectable at an item level
    Raids {
        /// Item level to gate against, separators allowed (e.g. "1,540")
        item_level: String,
    },
    /// Print account-wide gold and mission totals
    Overview,
    /// Show tracker status and reset stamps
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes it)
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            info!("Initializing new tracker configuration");
            let config = Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);

            // Opening the store seeds the raid catalog on first run.
            let (_kv, _store) = open_store(&config).await?;
            info!("Data directory ready at {}", config.storage.data_dir);
        }
        Commands::Add {
            name,
            class,
            server,
            item_level,
            portrait,
        } => {
            match validate_nickname(&name) {
                NicknameValidation::Valid(nickname) => {
                    let config = require_config(pre_config, &cli.config).await?;
                    let (kv, store) = open_store(&config).await?;
                    let settings = SettingsStore::new(kv).load().await;
                    let character = store
                        .add(
                            NewCharacter {
                                name: nickname,
                                class_name: class,
                                server_name: server,
                                item_level,
                                portrait_source: portrait,
                                ..Default::default()
                            },
                            settings.sort_order,
                        )
                        .await?;
                    println!("Added {} ({})", character.name, character.id);
                }
                NicknameValidation::Empty => println!("Error: nickname is empty."),
                NicknameValidation::ExceedsLimit(len) => println!(
                    "Error: nickname is {} characters (max {}).",
                    len, NICKNAME_MAX_CHARS
                ),
                NicknameValidation::Invalid => {
                    println!("Error: nickname may only contain letters, digits, and Hangul.")
                }
            }
        }
        Commands::Remove { name } => {
            let config = require_config(pre_config, &cli.config).await?;
            let (_kv, store) = open_store(&config).await?;
            let roster = store.characters().await;
            match roster.iter().find(|c| c.name == name) {
                Some(character) => {
                    let id = character.id.clone();
                    store.remove(&id).await?;
                    println!("Removed {}", name);
                }
                None => println!("No character named '{}'", name),
            }
        }
        Commands::List => {
            let config = require_config(pre_config, &cli.config).await?;
            let (_kv, store) = open_store(&config).await?;
            let roster = store.characters().await;
            if roster.is_empty() {
                println!("Roster is empty. Add a character with `raidledger add <name>`.");
            }
            for character in roster {
                let bookmark = if character.is_bookmarked { "*" } else { " " };
                println!(
                    "{} {:<14} {:<12} {:<10} ilvl {}",
                    bookmark,
                    character.name,
                    character.class_name,
                    character.server_group(),
                    character.item_level
                );
            }
        }
        Commands::Raids { item_level } => {
            let config = require_config(pre_config, &cli.config).await?;
            let (_kv, store) = open_store(&config).await?;
            let Some(level) = parse_separated_number(&item_level) else {
                println!("Error: '{}' is not an item level.", item_level);
                return Ok(());
            };
            let tiers = store.catalog().selectable(level);
            if tiers.is_empty() {
                println!("No raid tiers selectable at item level {}.", item_level);
            }
            for tier in tiers {
                let stages = tier.difficulty.stages.len();
                let gold: i64 = tier.difficulty.stages.iter().map(|s| s.gold).sum();
                println!(
                    "{:<14} {:<8} {} stage(s), {} gold (min ilvl {})",
                    tier.raid_name, tier.difficulty.difficulty, stages, gold,
                    tier.difficulty.min_item_level
                );
            }
        }
        Commands::Overview => {
            let config = require_config(pre_config, &cli.config).await?;
            let (_kv, store) = open_store(&config).await?;
            let overview = compute_overview(&store.characters().await);
            println!("Gold this week:      {}", overview.total_gold);
            println!("Potential raid gold: {}", overview.selected_raid_total_gold);
            println!("Gold last week:      {}", overview.last_week_total_gold);
            println!(
                "Daily missions:      {}/{}",
                overview.daily_missions.cleared, overview.daily_missions.total
            );
            println!(
                "Weekly missions:     {}/{}",
                overview.weekly_missions.cleared, overview.weekly_missions.total
            );
            println!(
                "Account missions:    {}/{}",
                overview.account_missions.cleared, overview.account_missions.total
            );
        }
        Commands::Status => {
            let config = require_config(pre_config, &cli.config).await?;
            let (kv, store) = open_store(&config).await?;
            let settings = SettingsStore::new(kv.clone()).load().await;
            println!("Tracker:   {}", config.tracker.name);
            println!("Data dir:  {}", config.storage.data_dir);
            println!("Sort:      {}", settings.sort_order.as_str());
            println!("Roster:    {} character(s)", store.characters().await.len());
            let daily: Option<chrono::DateTime<chrono::Utc>> =
                kv.get_json(keys::LAST_DAILY_RESET).await.unwrap_or(None);
            let weekly: Option<chrono::DateTime<chrono::Utc>> =
                kv.get_json(keys::LAST_WEEKLY_RESET).await.unwrap_or(None);
            println!(
                "Daily reset:  {}",
                daily.map_or("never".to_string(), |t| t.to_rfc3339())
            );
            println!(
                "Weekly reset: {}",
                weekly.map_or("never".to_string(), |t| t.to_rfc3339())
            );
        }
    }

    Ok(())
}

async fn require_config(pre_config: Option<Config>, path: &str) -> Result<Config> {
    match pre_config {
        Some(config) => Ok(config),
        None => Config::load(path).await,
    }
}

/// Open the KV store and run startup reconciliation. The store is ready for
/// readers once this returns.
async fn open_store(config: &Config) -> Result<(Arc<KvStore>, CharacterStore)> {
    let data_dir = std::path::Path::new(&config.storage.data_dir);
    let kv = Arc::new(KvStore::open(data_dir.join("kv"))?);
    let cropper = Arc::new(LocalPortraitStore::new(data_dir.join("portraits")));
    let schedule = config.reset.schedule()?;
    let store = CharacterStoreBuilder::new(kv.clone())
        .with_cropper(cropper)
        .with_schedule(schedule)
        .open()
        .await?;
    Ok((kv, store))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Some(cfg) = config {
        if let Some(ref file) = cfg.logging.file {
            if let Ok(f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
            {
                let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
                let write_mutex = mutex.clone();

                // When stdout is a terminal, mirror log lines to the console
                // alongside the file sink.
                let is_tty = atty::is(atty::Stream::Stdout);

                builder.format(move |_fmt, record| {
                    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                    let line = format!("{} [{}] {}", ts, record.level(), record.args());

                    if let Ok(mut guard) = write_mutex.lock() {
                        let _ = writeln!(guard, "{}", line);
                    }
                    if is_tty {
                        println!("{}", line);
                    }
                    Ok(())
                });
            } else {
                eprintln!("could not open log file {}, logging to console only", file);
            }
        }
    }
    let _ = builder.try_init();
}
