//! Command line and environment configuration

use std::path::PathBuf;

use clap::Parser;
use tui_dispatch_debug::DebugCliArgs;

use crate::api::DEFAULT_API_BASE;

pub const DEFAULT_PAGE_SIZE: u16 = 20;

/// Pokedex TUI backed by PokeAPI
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse PokeAPI from the terminal")]
pub struct Args {
    /// PokeAPI root URL
    #[arg(long, env = "POKEDEX_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Entries requested by the first page
    #[arg(
        long,
        env = "POKEDEX_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u16).range(1..=200)
    )]
    pub page_size: u16,

    /// Open the detail screen for this id or name on start
    #[arg(long)]
    pub pokemon: Option<String>,

    /// Log file (defaults to the user cache directory)
    #[arg(long, env = "POKEDEX_LOG")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub debug: DebugCliArgs,
}

impl Args {
    pub fn into_parts(self) -> (Config, DebugCliArgs) {
        let Args {
            api_base,
            page_size,
            pokemon,
            log_file,
            debug,
        } = self;
        let config = Config {
            api_base,
            page_size,
            start_pokemon: pokemon
                .map(|target| target.trim().to_string())
                .filter(|target| !target.is_empty()),
            log_file: log_file.unwrap_or_else(Config::default_log_file),
        };
        (config, debug)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub page_size: u16,
    pub start_pokemon: Option<String>,
    pub log_file: PathBuf,
}

impl Config {
    pub fn default_log_file() -> PathBuf {
        dirs_next::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("pokedex")
            .join("pokedex.log")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            start_pokemon: None,
            log_file: Self::default_log_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let args = Args::parse_from(["pokedex"]);
        let (config, _) = args.into_parts();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.start_pokemon, None);
        assert!(config.log_file.ends_with("pokedex.log"));
    }

    #[test]
    fn start_pokemon_is_trimmed() {
        let args = Args::parse_from(["pokedex", "--pokemon", " 25 ", "--page-size", "50"]);
        let (config, _) = args.into_parts();
        assert_eq!(config.start_pokemon.as_deref(), Some("25"));
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn page_size_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["pokedex", "--page-size", "0"]).is_err());
        assert!(Args::try_parse_from(["pokedex", "--page-size", "500"]).is_err());
    }
}
