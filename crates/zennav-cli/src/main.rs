//! ZenNav CLI
//!
//! Command-line interface for ZenNav - a start page of categorized links,
//! backed up to a GitHub Gist.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use zennav_core::{Config, GistClient, LocalPersistence, SearchEngine, SyncCoordinator};

mod commands;
mod output;

use commands::link::NewLink;
use commands::Coordinator;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "zennav")]
#[command(about = "ZenNav - A calm start page for your links")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Admin password for commands that change the configuration
    #[arg(long, global = true, env = "ZENNAV_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all categories and links (default)
    Show,
    /// Edit the site title, description or password
    Site {
        #[command(subcommand)]
        command: SiteCommands,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Search the web or your own links
    Search {
        /// Search query
        query: String,
        /// Engine: google, baidu, bing, github or site
        #[arg(short, long, default_value = "google")]
        engine: SearchEngine,
    },
    /// Show or change the color theme
    Theme {
        /// light, dark or toggle
        mode: Option<String>,
    },
    /// Manage the GitHub token used for sync
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
    /// Push to or pull from the cloud snapshot
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Export the configuration as JSON
    Export {
        /// Output file (stdout when omitted)
        path: Option<PathBuf>,
    },
    /// Restore the default configuration
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set application configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum SiteCommands {
    /// Set title, description or password (empty password restores the default)
    Set { field: String, value: String },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Add a category
    Add { title: String },
    /// Rename a category (by position, id or title)
    Rename { category: String, title: String },
    /// Delete a category and its links
    #[command(alias = "delete")]
    Rm { category: String },
    /// Move a category to a position (1-based)
    Move { category: String, position: usize },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Add a link; without --title the page is analysed
    Add {
        /// Category (position, id or title)
        category: String,
        /// URL to save
        url: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        icon: Option<String>,
        /// Analyse the page even when a title is given
        #[arg(long)]
        analyze: bool,
    },
    /// Set a link field (title, url, description, icon)
    Edit {
        category: String,
        link: String,
        field: String,
        value: String,
    },
    /// Delete a link
    #[command(alias = "delete")]
    Rm { category: String, link: String },
    /// Move a link to a position (1-based) within its category
    Move {
        category: String,
        link: String,
        position: usize,
    },
    /// Fill in a link's details from its page
    Analyze { category: String, link: String },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Store a token
    Set { token: String },
    /// Show the stored token (masked)
    Show,
    /// Remove the stored token
    Clear,
    /// Check the token against GitHub
    Verify,
}

#[derive(Subcommand)]
enum SyncCommands {
    /// Upload the saved configuration
    Push,
    /// Download the cloud configuration
    Pull {
        /// Save the downloaded configuration locally (and mirror it back)
        #[arg(long)]
        save: bool,
    },
    /// Show token and snapshot status
    Status,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, gist_api_url, admin_password, lookup_failure, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let command = cli.command.unwrap_or(Commands::Show);

    // Config commands don't need the store
    if let Commands::Config { command } = command {
        return handle_config_command(command, cli.config.as_ref(), &output);
    }

    let config =
        Config::load_with_cli_override(cli.config.as_ref()).context("Failed to load configuration")?;
    init_logging(&config);

    let remote = GistClient::from_config(&config)?;
    let mut coordinator = SyncCoordinator::open(LocalPersistence::from_config(&config), remote)
        .with_lookup_policy(config.lookup_failure);
    let password = cli.password.as_deref();

    match command {
        Commands::Show => commands::site::show(&coordinator, &output),
        Commands::Site { command } => match command {
            SiteCommands::Set { field, value } => {
                commands::site::set(&mut coordinator, password, field, value, &output).await
            }
        },
        Commands::Category { command } => {
            handle_category_command(command, &mut coordinator, password, &output).await
        }
        Commands::Link { command } => {
            handle_link_command(command, &mut coordinator, password, &output).await
        }
        Commands::Search { query, engine } => {
            commands::search::search(&coordinator, engine, query, &output)
        }
        Commands::Theme { mode } => commands::theme::theme(&coordinator, mode, &output),
        Commands::Token { command } => match command {
            TokenCommands::Set { token } => {
                commands::token::set(&coordinator, password, token, &output)
            }
            TokenCommands::Show => commands::token::show(&coordinator, &output),
            TokenCommands::Clear => commands::token::clear(&coordinator, password, &output),
            TokenCommands::Verify => commands::token::verify(&coordinator, &output).await,
        },
        Commands::Sync { command } => match command {
            SyncCommands::Push => commands::sync::push(&mut coordinator, password, &output).await,
            SyncCommands::Pull { save } => {
                commands::sync::pull(&mut coordinator, password, save, &output).await
            }
            SyncCommands::Status => commands::sync::status(&coordinator, &output).await,
        },
        Commands::Export { path } => {
            commands::site::export(&coordinator, password, path, &output)
        }
        Commands::Reset { yes } => {
            commands::site::reset(&mut coordinator, password, yes, &output)
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

async fn handle_category_command(
    command: CategoryCommands,
    coordinator: &mut Coordinator,
    password: Option<&str>,
    output: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::Add { title } => {
            commands::category::add(coordinator, password, title, output).await
        }
        CategoryCommands::Rename { category, title } => {
            commands::category::rename(coordinator, password, category, title, output).await
        }
        CategoryCommands::Rm { category } => {
            commands::category::delete(coordinator, password, category, output).await
        }
        CategoryCommands::Move { category, position } => {
            commands::category::move_to(coordinator, password, category, position, output).await
        }
    }
}

async fn handle_link_command(
    command: LinkCommands,
    coordinator: &mut Coordinator,
    password: Option<&str>,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::Add {
            category,
            url,
            title,
            description,
            icon,
            analyze,
        } => {
            let new = NewLink {
                url,
                title,
                description,
                icon,
                analyze,
            };
            commands::link::add(coordinator, password, category, new, output).await
        }
        LinkCommands::Edit {
            category,
            link,
            field,
            value,
        } => commands::link::edit(coordinator, password, category, link, field, value, output).await,
        LinkCommands::Rm { category, link } => {
            commands::link::delete(coordinator, password, category, link, output).await
        }
        LinkCommands::Move {
            category,
            link,
            position,
        } => commands::link::move_to(coordinator, password, category, link, position, output).await,
        LinkCommands::Analyze { category, link } => {
            commands::link::analyze(coordinator, password, category, link, output).await
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Install a tracing subscriber when ZENNAV_LOG is set
///
/// Logs go to the configured log file, or stderr when none is set.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("ZENNAV_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "zennav_core={},zennav_cli={}",
        log_level, log_level
    ));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };
            // Ignore error if already initialized
            let _ = builder.with_ansi(false).with_writer(log_file).try_init();
            info!("Logging initialized to {:?}", log_path);
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
