use core_config::{AppInfo, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `core_config` and `database` libraries
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Global route prefix, e.g. `api/v1`
    pub api_prefix: String,
    /// Browser origin allowed by CORS
    pub frontend_url: String,
    /// Apply pending migrations at startup
    pub db_synchronize: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=3000

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            api_prefix: env_or_default("API_PREFIX", "api/v1"),
            frontend_url: env_or_default("FRONTEND_URL", "http://localhost:5173"),
            db_synchronize: env_parse("DB_SYNCHRONIZE", "false")?,
        })
    }
}
