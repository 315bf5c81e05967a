use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// API OAuth access token; without one GitHub grants 60 req/hr and
    /// 10 searches/min instead of 5000 req/hr and 30 searches/min
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Directory holding saved profiles
    #[clap(long, env, default_value = "profiles")]
    pub profile_dir: PathBuf,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch GitHub data and build a developer profile
    Build { username: String },
    /// Display a saved profile
    Show { username: String },
    /// List all saved profiles
    List,
    /// Export a saved profile to JSON or Markdown
    Export {
        username: String,

        /// Output format
        #[clap(short, long, default_value = "json")]
        format: ExportFormat,

        /// Output file path; prints to stdout when omitted
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-fetch and update an existing profile
    Refresh { username: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Md,
}
