use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "lingua-progress")]
#[command(about = "Track lesson progress, achievements and lesson unlocks")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.lingua-progress/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the progress database (overrides [storage] path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a completed lesson or watched video, then check achievements
    Record {
        #[arg(long)]
        user: String,

        /// Lesson (or video) id
        #[arg(long)]
        lesson: String,

        #[arg(long)]
        module: String,

        /// Score from 0 to 100 (lessons only)
        #[arg(long, conflicts_with = "video")]
        score: Option<u32>,

        /// Record a watched video instead of a lesson
        #[arg(long)]
        video: bool,
    },

    /// Re-run the achievement check for a user
    Check {
        #[arg(long)]
        user: String,
    },

    /// Show aggregated statistics for a user
    Stats {
        #[arg(long)]
        user: String,
    },

    /// Show the lock state of every lesson in a module
    Gate {
        #[arg(long)]
        user: String,

        #[arg(long)]
        module: String,
    },

    /// Import lessons from a JSON array file into the catalog
    ImportLessons {
        file: PathBuf,
    },

    /// List achievements with unlock state and progress
    Achievements {
        #[arg(long)]
        user: String,
    },

    /// Show a user's point total
    Points {
        #[arg(long)]
        user: String,
    },

    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    if let Commands::Init { force } = cli.command {
        return cli::init::init_command(cli.config.as_deref(), force);
    }

    let app = cli::App::open(cli.config.as_deref(), cli.db.as_deref())?;

    match cli.command {
        Commands::Record {
            user,
            lesson,
            module,
            score,
            video,
        } => {
            cli::record::record_command(&app, &user, &lesson, &module, score, video).await?;
        }
        Commands::Check { user } => {
            cli::check::check_command(&app, &user).await?;
        }
        Commands::Stats { user } => {
            cli::stats::stats_command(&app, &user).await?;
        }
        Commands::Gate { user, module } => {
            cli::gate::gate_command(&app, &user, &module).await?;
        }
        Commands::ImportLessons { file } => {
            cli::import::import_lessons_command(&app, &file)?;
        }
        Commands::Achievements { user } => {
            cli::achievements::achievements_command(&app, &user).await?;
        }
        Commands::Points { user } => {
            cli::achievements::points_command(&app, &user).await?;
        }
        Commands::Init { .. } => {}
    }

    Ok(())
}
