mod cli;
mod commands;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use commands::check::CheckOptions;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Init { target } => commands::init::init(target).map(|_| 0),
        Commands::Add { name, url, version } => commands::add::add(name, url, version).map(|_| 0),
        Commands::Check {
            target,
            json,
            output,
            no_browser,
        } => {
            commands::check::check(CheckOptions {
                target,
                json,
                output,
                no_browser,
            })
            .await
        }
        Commands::Compare { a, b } => {
            commands::inspect::compare(&a, &b);
            Ok(0)
        }
        Commands::Parse { text } => Ok(commands::inspect::parse(&text)),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::error(&format!("{:#}", e));
            std::process::exit(2);
        }
    }
}
