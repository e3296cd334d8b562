use std::env;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding the JSON collection files.
    pub data_dir: PathBuf,
    pub bind_addr: String,
    /// Single shared administrator secret, checked by the admin guard.
    pub admin_token: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let data_dir = settings
            .get_string("server.data_dir")
            .or_else(|_| env::var("DATA_DIR"))
            .unwrap_or_else(|_| "data".to_string());

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let admin_token = settings
            .get_string("auth.admin_token")
            .or_else(|_| env::var("ADMIN_TOKEN"))
            .unwrap_or_else(|_| {
                if env == "prod" {
                    panic!("FATAL: ADMIN_TOKEN must be set in production!");
                }
                eprintln!("WARNING: Using default ADMIN_TOKEN (dev mode only!)");
                "admin123".to_string()
            });

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            bind_addr,
            admin_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn load_honors_env_overrides() {
        env::set_var("DATA_DIR", "/tmp/quizlan-test-data");
        env::set_var("BIND_ADDR", "127.0.0.1:9999");
        env::set_var("ADMIN_TOKEN", "sekrit");

        let config = Config::load().expect("config should load");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/quizlan-test-data"));
        assert_eq!(config.bind_addr, "127.0.0.1:9999");
        assert_eq!(config.admin_token, "sekrit");

        env::remove_var("DATA_DIR");
        env::remove_var("BIND_ADDR");
        env::remove_var("ADMIN_TOKEN");
    }

    #[test]
    #[serial]
    fn load_falls_back_to_defaults() {
        env::remove_var("DATA_DIR");
        env::remove_var("BIND_ADDR");
        env::remove_var("ADMIN_TOKEN");

        let config = Config::load().expect("config should load");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }
}
