//! Server configuration
//!
//! CLI arguments with environment fallbacks; a `.env` file is honoured by
//! the binary before parsing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::data::CacheSettings;

/// Zoo guide web server
#[derive(Parser, Debug, Clone)]
#[command(name = "zoo_server")]
#[command(about = "Zoo information website: animal catalog, search, map, routes and quizzes")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Directory holding animals.json, zones.json, routes.json and quizzes.json
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory served under /static
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Absolute lifetime of a cached data file, in seconds
    #[arg(long, env = "CACHE_TTL_SECS", default_value = "300")]
    pub cache_ttl_secs: u64,

    /// Idle expiry of a cached data file, in seconds
    #[arg(long, env = "CACHE_IDLE_SECS", default_value = "120")]
    pub cache_idle_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Load every data file at start-up and refuse to start on malformed data
    #[arg(long, env = "WARM_CACHE", default_value = "true", action = clap::ArgAction::Set)]
    pub warm_cache: bool,
}

impl Args {
    pub fn settings(&self) -> AppSettings {
        AppSettings {
            data_dir: self.data_dir.clone(),
            static_dir: self.static_dir.clone(),
            cache: CacheSettings {
                time_to_live: Duration::from_secs(self.cache_ttl_secs),
                time_to_idle: Duration::from_secs(self.cache_idle_secs),
            },
            warm_cache: self.warm_cache,
        }
    }
}

/// Settings needed to build the application state
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub cache: CacheSettings,
    pub warm_cache: bool,
}

impl AppSettings {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
            cache: CacheSettings::default(),
            warm_cache: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["zoo_server"]).unwrap();
        assert_eq!(args.listen, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(args.log_level, "info");

        let settings = args.settings();
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.cache.time_to_live, Duration::from_secs(300));
        assert_eq!(settings.cache.time_to_idle, Duration::from_secs(120));
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::try_parse_from([
            "zoo_server",
            "--data-dir",
            "/srv/zoo/data",
            "--cache-ttl-secs",
            "60",
            "--warm-cache",
            "false",
        ])
        .unwrap();

        let settings = args.settings();
        assert_eq!(settings.data_dir, PathBuf::from("/srv/zoo/data"));
        assert_eq!(settings.cache.time_to_live, Duration::from_secs(60));
        assert!(!settings.warm_cache);
    }
}
