// CLI interface
pub mod commands;

use crate::error::Result;
use crate::listings::StatusFilter;
use crate::models::{parse_instant, parse_user_id, AccountStatus, SubscriptionStatus};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "agentdesk")]
#[command(about = "Subscription tooling for the agent portal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Local JSON file of profile rows, used instead of the hosted backend
    #[arg(long, global = true, env = "AGENTDESK_PROFILES_FILE")]
    pub profiles_file: Option<PathBuf>,

    /// Local JSON file of listing rows, used instead of the hosted backend
    #[arg(long, global = true, env = "AGENTDESK_LISTINGS_FILE")]
    pub listings_file: Option<PathBuf>,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the time left until a subscription end date
    Remaining {
        /// Subscription end (ISO-8601 timestamp or YYYY-MM-DD)
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,

        /// Evaluate at this instant instead of the current time
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,

        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the subscription indicator of an agent
    Status {
        /// User id of the agent
        #[arg(long, value_parser = parse_user_id)]
        user: Uuid,

        /// Evaluate at this instant instead of the current time
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,

        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Edit a user as an admin (names, account status, plan)
    EditUser(EditUserArgs),

    /// List listings for moderation, newest first
    Listings {
        /// Only show listings with this status
        #[arg(long, value_enum, default_value = "all")]
        status: StatusFilter,

        /// Case-insensitive match on title, location, description or owner name
        #[arg(long)]
        search: Option<String>,

        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completion scripts
    ///
    /// INSTALLATION:
    ///
    /// Bash:
    ///   eval "$(agentdesk completions bash)"    # Add to ~/.bashrc
    ///
    /// Zsh:
    ///   eval "$(agentdesk completions zsh)"     # Add to ~/.zshrc
    ///
    /// Fish:
    ///   agentdesk completions fish > ~/.config/fish/completions/agentdesk.fish
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct EditUserArgs {
    /// User id to edit
    #[arg(long, value_parser = parse_user_id)]
    pub user: Uuid,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub career: Option<String>,

    /// Account status
    #[arg(long, value_enum)]
    pub status: Option<AccountStatus>,

    /// Subscription plan; switching free to pro starts a one-month term
    #[arg(long, value_enum)]
    pub plan: Option<SubscriptionStatus>,

    /// Subscription end for pro users who stay on pro
    #[arg(long, value_parser = parse_instant)]
    pub end: Option<DateTime<Utc>>,

    /// Use this instant as the current time
    #[arg(long, value_parser = parse_instant)]
    pub now: Option<DateTime<Utc>>,

    /// Output in JSON format for scripting
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Create a sample config file
    Init,
    /// Show the config file location and whether it is usable
    Path,
}

#[derive(Debug, Clone, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

pub fn execute(args: Cli) -> Result<()> {
    match args.command {
        Commands::Remaining { end, now, json } => commands::remaining::execute(end, now, json),
        Commands::Status { user, now, json } => {
            commands::status::execute(args.profiles_file, user, now, json)
        }
        Commands::EditUser(edit) => commands::edit_user::execute(args.profiles_file, edit),
        Commands::Listings {
            status,
            search,
            json,
        } => commands::listings::execute(args.profiles_file, args.listings_file, status, search, json),
        Commands::Config { command } => commands::config::execute(command),
        Commands::Completions { shell } => {
            commands::completions::execute(shell);
            Ok(())
        }
    }
}
