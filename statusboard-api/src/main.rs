//! Status board API server.
//!
//! Configuration is read from `Rocket.toml`, `ROCKET_*` variables and the
//! `STATUS_DATABASE_URL` / `STATUSBOARD_STATIC_DIR` overrides; see
//! `statusboard_api::config`.

use clap::Parser;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "statusboard-api")]
#[command(about = "Status board API server: publishes one live server status")]
#[command(version)]
struct Cli {
    /// Show build time, commit and target alongside the version
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,
}

fn print_version_info() {
    println!("statusboard-api {}", built_info::PKG_VERSION);
    println!("Built: {}", built_info::BUILT_TIME_UTC);
    if let Some(commit) = built_info::GIT_COMMIT_HASH {
        println!("Git commit: {}", commit);
    }
    println!("Target: {} ({})", built_info::TARGET, built_info::PROFILE);
}

#[rocket::main]
async fn main() {
    if Cli::parse().version_info {
        print_version_info();
        return;
    }

    rocket::info!("Status board API v{} starting", built_info::PKG_VERSION);

    if let Err(e) = statusboard_api::rocket().launch().await {
        rocket::error!("Status board failed to launch: {}", e);
        std::process::exit(1);
    }
}
