use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::journal::{DiaryAction, ReflectArgs};
use cli::quest::QuestAction;
use cli::AppContext;

#[derive(Parser)]
#[command(name = "questline")]
#[command(about = "Questline - level up your life with quests, stats and achievements")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.questline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, XP, stats and streak
    Status,

    /// Manage quests
    Quest {
        #[command(subcommand)]
        action: QuestAction,
    },

    /// Ask the oracle for new quests
    Generate {
        /// Add the suggested quests to the active list
        #[arg(long)]
        accept: bool,
    },

    /// Record how you feel today
    Reflect {
        text: String,

        /// Skip emotional analysis and use this mood
        #[arg(long)]
        mood: Option<String>,

        /// Motivation level (1-10)
        #[arg(long)]
        motivation: Option<u8>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Diary entries
    Diary {
        #[command(subcommand)]
        action: DiaryAction,
    },

    /// Show achievements and progress towards locked ones
    Achievements,

    /// Show streaks, realm balance and mood trends
    Analytics {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Custom attributes (level 10+, costs one skill point)
    Attribute {
        #[command(subcommand)]
        action: AttributeAction,
    },

    /// Export all progress to a JSON file
    Export { output: PathBuf },

    /// Replace all progress with an exported JSON file
    Import {
        input: PathBuf,

        #[arg(long)]
        yes: bool,
    },

    /// Delete all progress for the configured player
    Reset {
        #[arg(long)]
        yes: bool,
    },

    /// Create a default ~/.questline/config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum AttributeAction {
    /// Create a custom attribute
    Create { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Init never reads the existing file, so a broken config can be replaced
    if let Some(Commands::Init { force }) = cli.command {
        return cli::init::init_command(&cli::config_file(cli.config), force);
    }

    let ctx = AppContext::load(cli.config)?;

    match cli.command {
        Some(Commands::Status) | None => cli::status::status_command(&ctx)?,
        Some(Commands::Quest { action }) => cli::quest::quest_command(&ctx, action)?,
        Some(Commands::Generate { accept }) => cli::generate::generate_command(&ctx, accept)?,
        Some(Commands::Reflect {
            text,
            mood,
            motivation,
            notes,
        }) => cli::journal::reflect_command(
            &ctx,
            ReflectArgs {
                text,
                mood,
                motivation,
                notes,
            },
        )?,
        Some(Commands::Diary { action }) => cli::journal::diary_command(&ctx, action)?,
        Some(Commands::Achievements) => cli::achievements::achievements_command(&ctx)?,
        Some(Commands::Analytics { json }) => cli::achievements::analytics_command(&ctx, json)?,
        Some(Commands::Attribute {
            action: AttributeAction::Create { name },
        }) => cli::snapshot::attribute_create_command(&ctx, &name)?,
        Some(Commands::Export { output }) => cli::snapshot::export_command(&ctx, &output)?,
        Some(Commands::Import { input, yes }) => cli::snapshot::import_command(&ctx, &input, yes)?,
        Some(Commands::Reset { yes }) => cli::snapshot::reset_command(&ctx, yes)?,
        Some(Commands::Init { .. }) => unreachable!("init runs before the config is loaded"),
    }

    Ok(())
}
