use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct Config {
    pub web: Web,
    pub database: Database,
    pub redis: Redis,
    #[serde(default)]
    pub ranking: Ranking,
}

#[derive(Clone, Deserialize)]
pub struct Web {
    pub port: u16,
    #[serde(default = "host_default")]
    pub host: String,
}

#[derive(Clone, Deserialize)]
pub struct Database {
    pub uri: String,
}

#[derive(Clone, Deserialize)]
pub struct Redis {
    pub uri: String,
    /// TTL of cached like counters, refreshed on every read hit.
    #[serde(default = "counter_ttl_default")]
    pub counter_ttl: i64,
    /// Budget for a single cache operation before the caller degrades
    /// to Postgres.
    #[serde(default = "op_timeout_ms_default")]
    pub op_timeout_ms: u64,
}

/// Trending heuristics. The deltas, the best-ledger threshold and the
/// set of board categories that count towards trending are deployment
/// tunables, not fixed constants.
#[derive(Clone, Deserialize)]
pub struct Ranking {
    #[serde(default = "like_delta_default")]
    pub like_delta: f64,
    #[serde(default = "comment_delta_default")]
    pub comment_delta: f64,
    #[serde(default = "best_threshold_default")]
    pub best_threshold: f64,
    /// Post categories whose likes feed the trending score; an empty
    /// list makes every category eligible.
    #[serde(default)]
    pub trending_categories: Vec<String>,
}

impl Default for Ranking {
    fn default() -> Self {
        Ranking {
            like_delta: like_delta_default(),
            comment_delta: comment_delta_default(),
            best_threshold: best_threshold_default(),
            trending_categories: Vec::new(),
        }
    }
}

fn host_default() -> String {
    String::from("0.0.0.0")
}

fn counter_ttl_default() -> i64 {
    60 * 60 * 24
}

fn op_timeout_ms_default() -> u64 {
    300
}

fn like_delta_default() -> f64 {
    2.0
}

fn comment_delta_default() -> f64 {
    1.0
}

fn best_threshold_default() -> f64 {
    10.0
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [web]
            port = 8081

            [database]
            uri = "postgres://localhost/campus"

            [redis]
            uri = "redis://localhost"
            "#,
        )
        .unwrap();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.redis.counter_ttl, 86400);
        assert_eq!(config.redis.op_timeout_ms, 300);
        assert_eq!(config.ranking.best_threshold, 10.0);
        assert!(config.ranking.trending_categories.is_empty());
    }
}
