//! Status board administrative CLI.
//!
//! Reads and writes the status record either straight in the service's
//! SQLite database, through the same ORM functions the service uses, or
//! over HTTP against a running instance. Run with `--help` for usage.

use clap::{Parser, Subcommand};

mod admin_cli;
use admin_cli::remote_commands::{RemoteAction, handle_remote_command};
use admin_cli::status_commands::{StatusAction, handle_status_command_with_conn};
use admin_cli::utils::{ServiceSettings, init_tracing};

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "statusboard-admin")]
#[command(about = "Administrative CLI for the server status board")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Print detailed version information")]
    version_info: bool,
    #[arg(short, long, global = true, help = "SQLite database URL (defaults to the service configuration: STATUS_DATABASE_URL, Rocket.toml, then status.sqlite)")]
    database: Option<String>,
    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Read or write the status directly in the database")]
    Status {
        #[command(subcommand)]
        action: StatusAction,
    },
    #[command(about = "Read or publish the status through a running service")]
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },
}

fn print_version_info() {
    println!("statusboard-admin {}", built_info::PKG_VERSION);
    println!("Built: {}", built_info::BUILT_TIME_UTC);
    if let Some(commit) = built_info::GIT_COMMIT_HASH {
        println!("Git commit: {}", commit);
    }
    println!("Target: {}", built_info::TARGET);
    println!("Profile: {}", built_info::PROFILE);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.version_info {
        print_version_info();
        return;
    }

    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Commands::Status { action }) => {
            let settings = ServiceSettings::load(cli.database);
            tracing::debug!(database_url = %settings.database_url, key = %settings.board.status_key, "opening status database");
            match statusboard_api::orm::establish_connection(&settings.database_url) {
                Ok(mut conn) => handle_status_command_with_conn(&mut conn, action, &settings.board),
                Err(e) => Err(format!("Failed to open {}: {}", settings.database_url, e).into()),
            }
        }
        Some(Commands::Remote { action }) => handle_remote_command(action).await,
        None => {
            eprintln!("No command given. Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
