//! Dispatch configuration from environment.

use std::env;
use std::path::PathBuf;

use dronz_core::planner::RoutePlannerConfig;

pub const DEFAULT_REST_URL: &str = "https://ilp-rest-2023.azurewebsites.net";

#[derive(Debug, Clone)]
pub struct Config {
    pub rest_url: String,
    pub output_dir: PathBuf,
    /// Expansion budget for each route search.
    pub max_expansions: usize,
    /// Attempts per REST fetch before giving up.
    pub fetch_retries: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            rest_url: env::var("DRONZ_REST_URL").unwrap_or_else(|_| DEFAULT_REST_URL.to_string()),
            output_dir: env::var("DRONZ_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("resultfiles")),
            max_expansions: env::var("DRONZ_MAX_EXPANSIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| RoutePlannerConfig::default().max_expansions),
            fetch_retries: env::var("DRONZ_FETCH_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(3),
        }
    }

    pub fn planner_config(&self) -> RoutePlannerConfig {
        RoutePlannerConfig {
            max_expansions: self.max_expansions,
        }
    }
}
