use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    config::Region,
    harvester::DEFAULT_MATCH_COUNT,
    reference::{DEFAULT_CACHE_DIR, DEFAULT_LANGUAGE},
};

#[derive(Parser)]
pub struct Args {
    #[arg(long, value_enum, default_value_t = Region::Americas)]
    pub region: Region,
    #[arg(long)]
    pub proxy: Option<String>,
    /// Give up after this many rate-limit retries of one request (default: never)
    #[arg(long)]
    pub max_retries: Option<u32>,
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save ranked matches of the given players that were played on a patch
    Matches {
        #[arg(long, env = "RIOT_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Patch prefix such as 14.10
        #[arg(long)]
        patch: String,
        #[arg(long, default_value_t = DEFAULT_MATCH_COUNT)]
        count: u32,
        #[arg(required = true)]
        puuids: Vec<String>,
    },
    /// Download static champion data of a patch
    Champions {
        /// Full Data Dragon version such as 14.10.1
        #[arg(long)]
        patch: String,
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        language: String,
        /// Also print the details of one champion
        #[arg(long)]
        champion: Option<String>,
    },
}
