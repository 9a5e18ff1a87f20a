use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL Review - Risk review for MySQL, PostgreSQL and MongoDB change scripts
#[derive(Parser, Debug)]
#[command(name = "sql-review")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review a script and report risky statements
    Check {
        /// Engine: mysql, postgresql (pg, postgres) or mongodb (mongo)
        #[arg(short, long)]
        engine: Option<String>,

        /// Path to the script file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Rule codes to disable, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        disable: Vec<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Show offending statement text for each issue
        #[arg(short, long)]
        verbose: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// List the rule catalog of an engine
    Rules {
        /// Engine: mysql, postgresql (pg, postgres) or mongodb (mongo)
        #[arg(short, long)]
        engine: Option<String>,

        /// Rule codes to show as disabled, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        disable: Vec<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// List supported engines
    Engines {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
