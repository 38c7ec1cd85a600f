use serde::Deserialize;
use std::env;

use crate::scoring::ScoringModel;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub radar: RadarConfig,
    pub insights: InsightConfig,
    pub pairing: PairingConfig,
    pub signals: SignalsConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
    pub busy_timeout_ms: u64,
    pub journal_mode: String,
    pub synchronous: String,
}

impl DatabaseConfig {
    /// Local file (or `:memory:`) database with default pragmas.
    pub fn local(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 5000,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
        }
    }
}

/// Sizing and lifetimes for the pulse and profile caches.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub pulse_ttl_secs: u64,
    pub pulse_max_entries: usize,
    pub profile_ttl_secs: u64,
    pub profile_max_entries: usize,
    /// TTL for profiles built from a partial snapshot.
    pub partial_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RadarConfig {
    pub default_top_n: usize,
    pub max_top_n: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsightConfig {
    /// Insights kept per user after each generation run.
    pub retention: usize,
    /// Upper bound on scored candidates loaded per run.
    pub population_limit: usize,
    pub list_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairingConfig {
    pub min_compatibility: f64,
    pub max_roster_size: usize,
    pub concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalsConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub refresh_interval_secs: u64,
    pub batch_size: usize,
    pub model: ScoringModel,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            pulse_ttl_secs: 300,
            pulse_max_entries: 16,
            profile_ttl_secs: 1800,
            profile_max_entries: 500,
            partial_ttl_secs: 60,
            sweep_interval_secs: 300,
        }
    }
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            default_top_n: 10,
            max_top_n: 20,
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            retention: 50,
            population_limit: 500,
            list_limit: 20,
        }
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            min_compatibility: 0.5,
            max_roster_size: 50,
            concurrency: 8,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("RADAR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("RADAR_PORT", 3000),
                api_keys: env::var("RADAR_API_KEYS")
                    .map(|keys| {
                        keys.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:radar.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
                busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
                journal_mode: env::var("DATABASE_JOURNAL_MODE")
                    .unwrap_or_else(|_| "WAL".to_string()),
                synchronous: env::var("DATABASE_SYNCHRONOUS")
                    .unwrap_or_else(|_| "NORMAL".to_string()),
            },
            cache: {
                let defaults = CacheConfig::default();
                CacheConfig {
                    pulse_ttl_secs: parse_env_or("PULSE_CACHE_TTL_SECS", defaults.pulse_ttl_secs),
                    pulse_max_entries: parse_env_or(
                        "PULSE_CACHE_MAX_ENTRIES",
                        defaults.pulse_max_entries,
                    ),
                    profile_ttl_secs: parse_env_or(
                        "PROFILE_CACHE_TTL_SECS",
                        defaults.profile_ttl_secs,
                    ),
                    profile_max_entries: parse_env_or(
                        "PROFILE_CACHE_MAX_ENTRIES",
                        defaults.profile_max_entries,
                    ),
                    partial_ttl_secs: parse_env_or(
                        "PARTIAL_PROFILE_TTL_SECS",
                        defaults.partial_ttl_secs,
                    ),
                    sweep_interval_secs: parse_env_or(
                        "CACHE_SWEEP_INTERVAL_SECS",
                        defaults.sweep_interval_secs,
                    ),
                }
            },
            radar: RadarConfig {
                default_top_n: parse_env_or("PULSE_DEFAULT_TOP_N", 10),
                max_top_n: parse_env_or("PULSE_MAX_TOP_N", 20),
            },
            insights: InsightConfig {
                retention: parse_env_or("INSIGHT_RETENTION", 50),
                population_limit: parse_env_or("INSIGHT_POPULATION_LIMIT", 500),
                list_limit: parse_env_or("INSIGHT_LIST_LIMIT", 20),
            },
            pairing: PairingConfig {
                min_compatibility: parse_env_or("PAIRING_MIN_COMPATIBILITY", 0.5),
                max_roster_size: parse_env_or("PAIRING_MAX_ROSTER_SIZE", 50),
                concurrency: parse_env_or("PAIRING_CONCURRENCY", 8),
            },
            signals: SignalsConfig {
                base_url: env::var("SIGNALS_BASE_URL").ok(),
                api_key: env::var("SIGNALS_API_KEY").ok(),
                timeout_ms: parse_env_or("SIGNALS_TIMEOUT_MS", 2500),
            },
            scoring: ScoringConfig {
                refresh_interval_secs: parse_env_or("SCORE_REFRESH_INTERVAL_SECS", 21600),
                batch_size: parse_env_or("SCORE_REFRESH_BATCH_SIZE", 10),
                model: scoring_model_from_env(),
            },
        }
    }
}

/// Risk and tier thresholds are empirical, so each can be tuned per
/// deployment without a rebuild. Weights stay fixed.
fn scoring_model_from_env() -> ScoringModel {
    let mut model = ScoringModel::default();
    let t = &mut model.thresholds;

    if let Some(v) = parse_env_opt("MOMENTUM_RISING_THRESHOLD") {
        t.momentum_rising = v;
    }
    if let Some(v) = parse_env_opt("MOMENTUM_LOW_THRESHOLD") {
        t.momentum_low = v;
    }
    if let Some(v) = parse_env_opt("BREAKOUT_HIGH_THRESHOLD") {
        t.breakout_high = v;
    }
    if let Some(v) = parse_env_opt("RISK_HIGH_THRESHOLD") {
        t.risk_high = v;
    }
    if let Some(v) = parse_env_opt("CREATIVE_SHIFT_LOW_THRESHOLD") {
        t.creative_shift_low = v;
    }
    if let Some(v) = parse_env_opt("IDENTITY_LOW_THRESHOLD") {
        t.identity_low = v;
    }
    if let Some(v) = parse_env_opt("COVERAGE_VELOCITY_LOW_THRESHOLD") {
        t.coverage_velocity_low = v;
    }

    model
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
