//! # SQL Review
//!
//! Static risk review for database change scripts.
//!
//! `sql-review` reads a MySQL, PostgreSQL or MongoDB script, splits it into
//! statements and runs the engine's rule catalog over it. Each finding carries
//! a severity, a stable rule code and a suggestion; the report ends with
//! advice on whether the script is safe to run unattended.
//!
//! # Quick Start
//!
//! ```bash
//! # Review a MySQL migration
//! sql-review check -i deploy.sql
//!
//! # PostgreSQL, JSON output, one rule disabled
//! sql-review check -e pg -i deploy.sql -f json -d pg_select_star
//!
//! # Stream a Mongo script from stdin
//! cat cleanup.js | sql-review check -e mongo
//!
//! # List the catalog with effective rule state
//! sql-review rules -e postgresql
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`SQL_REVIEW_ENGINE`, `SQL_REVIEW_DISABLED_RULES`)
//! 3. `.sql-review.toml` in current directory
//! 4. `~/.config/sql-review/config.toml`
//!
//! Logging goes to stderr and is controlled by `SQL_REVIEW_LOG`
//! (`warn` by default, e.g. `SQL_REVIEW_LOG=debug`).
//!
//! # Exit Codes
//!
//! - `0` - No issues or only informational ones
//! - `1` - Warnings found
//! - `2` - Errors found
//!
//! Invalid input, configuration or I/O failures print `Error: ...` and exit
//! with `1`.

use std::process;

use clap::Parser;
use sql_review::{
    app::{CheckParams, RulesParams, run_check, run_engines, run_rules},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    init_tracing();
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SQL_REVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let output = match cli.command {
        Commands::Check {
            engine,
            input,
            disable,
            output_format,
            verbose,
            no_color
        } => run_check(
            CheckParams {
                engine,
                input: input.display().to_string(),
                disabled: disable,
                output_format,
                verbose,
                no_color
            },
            &config
        )?,
        Commands::Rules {
            engine,
            disable,
            output_format,
            no_color
        } => run_rules(
            RulesParams {
                engine,
                disabled: disable,
                output_format,
                no_color
            },
            &config
        ),
        Commands::Engines {
            output_format
        } => run_engines(output_format)
    };

    print!("{}", output.stdout);
    if !output.stdout.ends_with('\n') {
        println!();
    }
    Ok(output.exit_code)
}
