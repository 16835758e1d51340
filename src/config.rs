use web::config::Config;

/// Loads `config.toml` from the working directory. Database, Redis and
/// ranking tunables all live there; unset ranking keys fall back to
/// their defaults.
pub fn process_config() -> anyhow::Result<Config> {
    let config = std::fs::read_to_string("config.toml")?;
    Ok(toml::from_str(&config)?)
}
