use core_config::{ConfigError, Environment, FromEnv, env_or_default};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL including the API prefix
    pub api_url: String,
    pub environment: Environment,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: env_or_default("TASKBOARD_API_URL", DEFAULT_API_URL),
            environment: Environment::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_url() {
        temp_env::with_var_unset("TASKBOARD_API_URL", || {
            assert_eq!(Config::from_env().unwrap().api_url, DEFAULT_API_URL);
        });
    }

    #[test]
    fn test_api_url_override() {
        temp_env::with_var("TASKBOARD_API_URL", Some("http://tasks:8080/api/v1"), || {
            assert_eq!(
                Config::from_env().unwrap().api_url,
                "http://tasks:8080/api/v1"
            );
        });
    }
}
